//! Persisted shapes shared by the stores

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core_types::{AccountId, IdentityKey, TransferId};

/// Ledger account
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub cpf: IdentityKey,
    /// argon2 PHC string of the quote-framed secret
    pub secret_hash: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("cpf", &self.cpf)
            .field("balance", &self.balance)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// What login needs to know about an account
#[derive(Clone)]
pub struct LoginRecord {
    pub account_id: AccountId,
    pub secret_hash: String,
}

impl fmt::Debug for LoginRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRecord")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

/// A transfer about to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransfer {
    pub origin_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
}

/// Appended transfer, as returned by the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: TransferId,
    pub origin_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    pub fn from_new(id: TransferId, new: NewTransfer, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            origin_account_id: new.origin_account_id,
            destination_account_id: new.destination_account_id,
            amount: new.amount,
            created_at,
        }
    }
}

fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Fresh transfer id: uuid v4 without hyphens
pub fn new_transfer_id() -> TransferId {
    new_record_id()
}

/// Fresh account id, same shape as transfer ids
pub fn new_account_id() -> AccountId {
    new_record_id()
}
