use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core_types::IdentityKey;

/// Login request body
#[derive(Clone, Deserialize)]
pub struct Login {
    pub cpf: IdentityKey,
    pub secret: String,
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("cpf", &self.cpf)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
