use serde::{Deserialize, Serialize};

use crate::core_types::AccountId;

/// Credential lifetime: `exp = iat + CREDENTIAL_TTL_SECS`
pub const CREDENTIAL_TTL_SECS: i64 = 30 * 60;

/// JWT claim set carried by every credential
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    /// Correlation id (hex)
    pub jti: String,
    pub client_id: AccountId,
}
