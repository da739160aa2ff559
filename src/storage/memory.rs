//! In-memory stores backed by `DashMap`
//!
//! Used by the `memory` backend and throughout the tests. Every balance
//! write holds the account's shard lock across compare and set.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;

use super::models::{Account, LoginRecord, NewTransfer, TransferRecord, new_transfer_id};
use super::{AccountLedger, CredentialStore, StoreError, TransferRecordStore};
use crate::core_types::{AccountId, IdentityKey, TransferId};
use crate::gatekeeper::{CorrelationId, Credential};

#[derive(Default)]
pub struct MemoryStore {
    credentials: DashMap<CorrelationId, Credential>,
    accounts: DashMap<AccountId, Account>,
    cpf_index: DashMap<IdentityKey, AccountId>,
    transfers: DashMap<TransferId, TransferRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account. Fails on a duplicate id or cpf.
    pub fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        // id slot stays locked until the cpf is claimed
        let Entry::Vacant(slot) = self.accounts.entry(account.id.clone()) else {
            return Err(StoreError::Duplicate);
        };
        match self.cpf_index.entry(account.cpf.clone()) {
            Entry::Occupied(_) => return Err(StoreError::Duplicate),
            Entry::Vacant(v) => {
                v.insert(account.id.clone());
            }
        }
        slot.insert(account);
        Ok(())
    }

    pub fn account(&self, account_id: &str) -> Option<Account> {
        self.accounts.get(account_id).map(|a| a.clone())
    }

    pub fn balance_of(&self, account_id: &str) -> Option<Decimal> {
        self.accounts.get(account_id).map(|a| a.balance)
    }

    /// All appended transfers, oldest first
    pub fn transfers(&self) -> Vec<TransferRecord> {
        let mut all: Vec<TransferRecord> = self.transfers.iter().map(|t| t.clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        all
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        match self.credentials.entry(credential.correlation_id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(v) => {
                v.insert(credential.clone());
                Ok(())
            }
        }
    }

    async fn find_credential(&self, id: &CorrelationId) -> Result<Credential, StoreError> {
        self.credentials
            .get(id)
            .map(|c| c.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn delete_credential(&self, id: &CorrelationId) -> Result<(), StoreError> {
        self.credentials
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl AccountLedger for MemoryStore {
    async fn create_account(&self, account: Account) -> Result<(), StoreError> {
        self.insert_account(account)
    }

    async fn get_account(&self, account_id: &str) -> Result<Account, StoreError> {
        self.account(account_id).ok_or(StoreError::NotFound)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut all: Vec<Account> = self.accounts.iter().map(|a| a.clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn get_balance(&self, account_id: &str) -> Result<Decimal, StoreError> {
        self.balance_of(account_id).ok_or(StoreError::NotFound)
    }

    async fn update_balance(
        &self,
        account_id: &str,
        expected: Decimal,
        new: Decimal,
    ) -> Result<(), StoreError> {
        let mut account = self
            .accounts
            .get_mut(account_id)
            .ok_or(StoreError::NotFound)?;
        if account.balance != expected {
            return Err(StoreError::Conflict);
        }
        account.balance = new;
        Ok(())
    }

    async fn find_login(&self, cpf: &str) -> Result<LoginRecord, StoreError> {
        let account_id = self
            .cpf_index
            .get(cpf)
            .map(|id| id.clone())
            .ok_or(StoreError::NotFound)?;
        let account = self.accounts.get(&account_id).ok_or(StoreError::NotFound)?;
        Ok(LoginRecord {
            account_id: account.id.clone(),
            secret_hash: account.secret_hash.clone(),
        })
    }
}

#[async_trait]
impl TransferRecordStore for MemoryStore {
    async fn append_transfer(&self, transfer: NewTransfer) -> Result<TransferRecord, StoreError> {
        let record = TransferRecord::from_new(new_transfer_id(), transfer, Utc::now());
        self.transfers.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn list_transfers(&self, account_id: &str) -> Result<Vec<TransferRecord>, StoreError> {
        Ok(self
            .transfers()
            .into_iter()
            .filter(|t| t.origin_account_id == account_id || t.destination_account_id == account_id)
            .collect())
    }
}
