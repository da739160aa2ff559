use thiserror::Error;

use crate::error::ErrorKind;
use crate::gatekeeper::{SigningError, VerificationError};
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown identity key or wrong secret; deliberately indistinguishable
    #[error("invalid login credentials")]
    InvalidLogin,

    #[error("access denied: {0}")]
    AccessDenied(#[source] VerificationError),

    #[error("failed to sign credential: {0}")]
    Signing(#[from] SigningError),

    #[error("credential store failure: {0}")]
    Store(#[source] StoreError),

    #[error("stored secret hash is unusable: {0}")]
    Hash(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidLogin => ErrorKind::InvalidLogin,
            AuthError::AccessDenied(_) => ErrorKind::AccessDenied,
            AuthError::Signing(_) | AuthError::Store(_) | AuthError::Hash(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidLogin => "INVALID_LOGIN",
            AuthError::AccessDenied(_) => "ACCESS_DENIED",
            AuthError::Signing(_) => "SIGNING_ERROR",
            AuthError::Store(_) => "STORE_ERROR",
            AuthError::Hash(_) => "HASH_ERROR",
        }
    }
}

impl From<VerificationError> for AuthError {
    fn from(e: VerificationError) -> Self {
        AuthError::AccessDenied(e)
    }
}
