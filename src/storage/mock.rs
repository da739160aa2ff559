//! Failure-injecting store wrapper for tests

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::memory::MemoryStore;
use super::models::{Account, LoginRecord, NewTransfer, TransferRecord};
use super::{AccountLedger, CredentialStore, StoreError, TransferRecordStore};
use crate::gatekeeper::{CorrelationId, Credential};

/// Delegates to a [`MemoryStore`] unless told to fail.
pub struct MockStore {
    inner: Arc<MemoryStore>,
    update_count: AtomicUsize,
    append_count: AtomicUsize,
    fail_get_balance: Mutex<Option<String>>,
    fail_update: Mutex<Option<String>>,
    fail_append: Mutex<bool>,
    fail_credentials: Mutex<bool>,
    fail_list: Mutex<bool>,
    /// Account whose balance is moved by a "concurrent writer" right before our write
    interleave: Mutex<Option<(String, Decimal)>>,
    stall: Mutex<Option<Duration>>,
}

impl MockStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            update_count: AtomicUsize::new(0),
            append_count: AtomicUsize::new(0),
            fail_get_balance: Mutex::new(None),
            fail_update: Mutex::new(None),
            fail_append: Mutex::new(false),
            fail_credentials: Mutex::new(false),
            fail_list: Mutex::new(false),
            interleave: Mutex::new(None),
            stall: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn set_fail_get_balance(&self, account_id: Option<&str>) {
        *self.fail_get_balance.lock().unwrap() = account_id.map(str::to_string);
    }

    pub fn set_fail_update(&self, account_id: Option<&str>) {
        *self.fail_update.lock().unwrap() = account_id.map(str::to_string);
    }

    pub fn set_fail_append(&self, fail: bool) {
        *self.fail_append.lock().unwrap() = fail;
    }

    pub fn set_fail_credentials(&self, fail: bool) {
        *self.fail_credentials.lock().unwrap() = fail;
    }

    /// Fail every listing call (accounts and transfers).
    pub fn set_fail_list(&self, fail: bool) {
        *self.fail_list.lock().unwrap() = fail;
    }

    /// Once, before the next write to `account_id`, add `delta` to its balance.
    pub fn set_interleaved_write(&self, account_id: &str, delta: Decimal) {
        *self.interleave.lock().unwrap() = Some((account_id.to_string(), delta));
    }

    /// Make every ledger call sleep for `by` first.
    pub fn set_stall(&self, by: Option<Duration>) {
        *self.stall.lock().unwrap() = by;
    }

    pub fn update_count(&self) -> usize {
        self.update_count.load(Ordering::SeqCst)
    }

    pub fn append_count(&self) -> usize {
        self.append_count.load(Ordering::SeqCst)
    }

    async fn maybe_stall(&self) {
        let stall = *self.stall.lock().unwrap();
        if let Some(by) = stall {
            tokio::time::sleep(by).await;
        }
    }

    fn injected() -> StoreError {
        StoreError::Corrupt("injected failure".to_string())
    }
}

#[async_trait]
impl CredentialStore for MockStore {
    async fn insert_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        if *self.fail_credentials.lock().unwrap() {
            return Err(Self::injected());
        }
        self.inner.insert_credential(credential).await
    }

    async fn find_credential(&self, id: &CorrelationId) -> Result<Credential, StoreError> {
        if *self.fail_credentials.lock().unwrap() {
            return Err(Self::injected());
        }
        self.inner.find_credential(id).await
    }

    async fn delete_credential(&self, id: &CorrelationId) -> Result<(), StoreError> {
        self.inner.delete_credential(id).await
    }
}

#[async_trait]
impl AccountLedger for MockStore {
    async fn create_account(&self, account: Account) -> Result<(), StoreError> {
        self.inner.create_account(account).await
    }

    async fn get_account(&self, account_id: &str) -> Result<Account, StoreError> {
        self.inner.get_account(account_id).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        self.maybe_stall().await;
        if *self.fail_list.lock().unwrap() {
            return Err(Self::injected());
        }
        self.inner.list_accounts().await
    }

    async fn get_balance(&self, account_id: &str) -> Result<Decimal, StoreError> {
        self.maybe_stall().await;
        if self.fail_get_balance.lock().unwrap().as_deref() == Some(account_id) {
            return Err(Self::injected());
        }
        self.inner.get_balance(account_id).await
    }

    async fn update_balance(
        &self,
        account_id: &str,
        expected: Decimal,
        new: Decimal,
    ) -> Result<(), StoreError> {
        self.maybe_stall().await;
        self.update_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.lock().unwrap().as_deref() == Some(account_id) {
            return Err(Self::injected());
        }

        let interleaved = {
            let mut slot = self.interleave.lock().unwrap();
            match slot.as_ref() {
                Some((id, _)) if id == account_id => slot.take(),
                _ => None,
            }
        };
        if let Some((_, delta)) = interleaved {
            let current = self.inner.get_balance(account_id).await?;
            self.inner
                .update_balance(account_id, current, current + delta)
                .await?;
        }

        self.inner.update_balance(account_id, expected, new).await
    }

    async fn find_login(&self, cpf: &str) -> Result<LoginRecord, StoreError> {
        self.inner.find_login(cpf).await
    }
}

#[async_trait]
impl TransferRecordStore for MockStore {
    async fn append_transfer(&self, transfer: NewTransfer) -> Result<TransferRecord, StoreError> {
        self.append_count.fetch_add(1, Ordering::SeqCst);
        if *self.fail_append.lock().unwrap() {
            return Err(Self::injected());
        }
        self.inner.append_transfer(transfer).await
    }

    async fn list_transfers(&self, account_id: &str) -> Result<Vec<TransferRecord>, StoreError> {
        if *self.fail_list.lock().unwrap() {
            return Err(Self::injected());
        }
        self.inner.list_transfers(account_id).await
    }
}
