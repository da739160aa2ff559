use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core_types::{AccountId, IdentityKey};
use crate::storage::{Account, TransferRecord};

/// Account creation request body
#[derive(Clone, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub cpf: IdentityKey,
    pub secret: String,
    /// Opening balance; accepted as JSON number or string
    #[serde(default)]
    pub balance: Decimal,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("cpf", &self.cpf)
            .field("secret", &"<redacted>")
            .field("balance", &self.balance)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAccount {
    pub id: AccountId,
}

/// Public view of an account. Never carries the secret hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub name: String,
    pub cpf: IdentityKey,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            name: a.name,
            cpf: a.cpf,
            balance: a.balance,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceView {
    pub balance: Decimal,
}

/// Transfer history of one account, split by direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTransfers {
    pub sent: Vec<TransferRecord>,
    pub received: Vec<TransferRecord>,
}

impl AccountTransfers {
    pub fn split(account_id: &str, records: Vec<TransferRecord>) -> Self {
        let (sent, received) = records
            .into_iter()
            .partition(|t| t.origin_account_id == account_id);
        Self { sent, received }
    }
}
