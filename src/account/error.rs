use thiserror::Error;

use super::validation::ValidationError;
use crate::auth::AuthError;
use crate::error::ErrorKind;
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("this cpf could not be inserted")]
    DuplicateCpf,

    #[error("no account was found with the given filter parameters")]
    NotFound,

    #[error("failed to hash secret: {0}")]
    Hash(#[source] AuthError),

    #[error("account store failure: {0}")]
    Store(#[source] StoreError),
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::Invalid(_) | AccountError::DuplicateCpf => ErrorKind::InvalidInput,
            AccountError::NotFound => ErrorKind::NotFound,
            AccountError::Hash(_) | AccountError::Store(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AccountError::Invalid(_) => "INVALID_ACCOUNT",
            AccountError::DuplicateCpf => "DUPLICATE_CPF",
            AccountError::NotFound => "ACCOUNT_NOT_FOUND",
            AccountError::Hash(_) => "HASH_ERROR",
            AccountError::Store(_) => "STORE_ERROR",
        }
    }
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AccountError::NotFound,
            StoreError::Duplicate => AccountError::DuplicateCpf,
            other => AccountError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_store_errors_classified() {
        assert_eq!(AccountError::from(StoreError::NotFound).kind(), ErrorKind::NotFound);
        assert_eq!(AccountError::from(StoreError::Duplicate).kind(), ErrorKind::InvalidInput);
        assert_eq!(
            AccountError::from(StoreError::Timeout(Duration::from_secs(15))).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            AccountError::from(ValidationError::CpfChecksum).kind(),
            ErrorKind::InvalidInput
        );
    }
}
