//! Storage - credential store, account ledger and transfer record store
//!
//! Each concern is a trait so the orchestrator and the auth service can run
//! against [`MemoryStore`] or [`PgStore`] alike.

pub mod db;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::gatekeeper::{CorrelationId, Credential};

pub use db::Database;
pub use memory::MemoryStore;
pub use models::{
    Account, LoginRecord, NewTransfer, TransferRecord, new_account_id, new_transfer_id,
};
pub use postgres::PgStore;

/// Default upper bound for a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no record was found with the given filter parameters")]
    NotFound,

    #[error("record already exists")]
    Duplicate,

    /// Compare-and-swap precondition did not hold
    #[error("record was modified concurrently")]
    Conflict,

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Issued credentials keyed by correlation id
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn insert_credential(&self, credential: &Credential) -> Result<(), StoreError>;

    async fn find_credential(&self, id: &CorrelationId) -> Result<Credential, StoreError>;

    async fn delete_credential(&self, id: &CorrelationId) -> Result<(), StoreError>;
}

/// Accounts: balances, login secrets and provisioning
#[async_trait]
pub trait AccountLedger: Send + Sync {
    /// `Duplicate` if the id or the cpf is taken.
    async fn create_account(&self, account: Account) -> Result<(), StoreError>;

    async fn get_account(&self, account_id: &str) -> Result<Account, StoreError>;

    /// Oldest first
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    async fn get_balance(&self, account_id: &str) -> Result<Decimal, StoreError>;

    /// Write `new` only if the stored balance still equals `expected`.
    ///
    /// `NotFound` if the account is gone, `Conflict` if the balance moved.
    async fn update_balance(
        &self,
        account_id: &str,
        expected: Decimal,
        new: Decimal,
    ) -> Result<(), StoreError>;

    async fn find_login(&self, cpf: &str) -> Result<LoginRecord, StoreError>;
}

/// Append-only transfer log
#[async_trait]
pub trait TransferRecordStore: Send + Sync {
    async fn append_transfer(&self, transfer: NewTransfer) -> Result<TransferRecord, StoreError>;

    /// Transfers with `account_id` on either side, oldest first
    async fn list_transfers(&self, account_id: &str) -> Result<Vec<TransferRecord>, StoreError>;
}

/// Bound `fut` by `limit`; elapsed time becomes [`StoreError::Timeout`].
///
/// Dropping the returned future drops `fut` with it.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}
