use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::{AccountId, TransferId};
use crate::money::Amount;
use crate::storage::TransferRecord;

/// Transfer request body. The origin is never part of it.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    pub account_destination_id: AccountId,
    pub amount: Amount,
}

/// What the caller gets back after `Recorded`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferReceipt {
    pub transfer_id: TransferId,
    pub origin_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    /// Caller's balance after the transfer
    pub origin_balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl TransferReceipt {
    pub fn new(record: TransferRecord, origin_balance: Decimal) -> Self {
        Self {
            transfer_id: record.id,
            origin_account_id: record.origin_account_id,
            destination_account_id: record.destination_account_id,
            amount: record.amount,
            origin_balance,
            created_at: record.created_at,
        }
    }
}
