//! Transfer error types

use thiserror::Error;

use crate::auth::AuthError;
use crate::balance::BalanceError;
use crate::core_types::AccountId;
use crate::error::ErrorKind;
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("access denied: {0}")]
    AccessDenied(#[source] AuthError),

    // === Input errors ===
    #[error("destination account id must not be empty")]
    MissingDestination,

    #[error("origin and destination account cannot be the same")]
    SameAccount,

    #[error("destination account was not found")]
    DestinationNotFound,

    #[error(transparent)]
    InsufficientBalance(#[from] BalanceError),

    // === Concurrency ===
    /// A balance moved between read and write; nothing is left half-applied
    #[error("balance of account {account_id} changed concurrently")]
    BalanceChanged { account_id: AccountId },

    // === System errors ===
    #[error("origin account {0} was not found")]
    OriginNotFound(AccountId),

    #[error("store failure at {step}: {source}")]
    Store {
        step: &'static str,
        #[source]
        source: StoreError,
    },

    /// Origin already written when a later step failed and was not undone
    #[error("transfer partially applied, failed at {step}: {source}")]
    PartialCommit {
        step: &'static str,
        #[source]
        source: StoreError,
    },
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::AccessDenied(_) => ErrorKind::AccessDenied,
            TransferError::MissingDestination
            | TransferError::SameAccount
            | TransferError::DestinationNotFound
            | TransferError::InsufficientBalance(_) => ErrorKind::InvalidInput,
            TransferError::BalanceChanged { .. } => ErrorKind::Conflict,
            TransferError::OriginNotFound(_)
            | TransferError::Store { .. }
            | TransferError::PartialCommit { .. } => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TransferError::AccessDenied(_) => "ACCESS_DENIED",
            TransferError::MissingDestination => "MISSING_DESTINATION",
            TransferError::SameAccount => "SAME_ACCOUNT",
            TransferError::DestinationNotFound => "DESTINATION_NOT_FOUND",
            TransferError::InsufficientBalance(_) => "INSUFFICIENT_BALANCE",
            TransferError::BalanceChanged { .. } => "BALANCE_CHANGED",
            TransferError::OriginNotFound(_) => "ORIGIN_NOT_FOUND",
            TransferError::Store { .. } => "STORE_ERROR",
            TransferError::PartialCommit { .. } => "PARTIAL_COMMIT",
        }
    }

    #[inline]
    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }
}
