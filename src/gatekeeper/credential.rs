use serde::{Deserialize, Serialize};
use std::fmt;

use super::correlation::CorrelationId;
use crate::core_types::AccountId;

/// A signed proof of identity.
///
/// Persisted as `{id, client_id, digest}`; `id` is the correlation id.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(rename = "id")]
    pub correlation_id: CorrelationId,
    pub client_id: AccountId,
    pub digest: String,
}

// Digest is a bearer secret; keep it out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("correlation_id", &self.correlation_id)
            .field("client_id", &self.client_id)
            .field("digest", &"<redacted>")
            .finish()
    }
}
