//! PostgreSQL implementation of the three stores
//!
//! Balance writes are a single conditional UPDATE; a zero row count is
//! resolved into `NotFound` or `Conflict` with one follow-up read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::models::{Account, LoginRecord, NewTransfer, TransferRecord, new_transfer_id};
use super::{AccountLedger, CredentialStore, StoreError, TransferRecordStore};
use crate::gatekeeper::{CorrelationId, Credential};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const ACCOUNT_COLUMNS: &str = "account_id, name, cpf, secret_hash, balance, created_at";

fn account_from_row(row: &PgRow) -> Account {
    Account {
        id: row.get("account_id"),
        name: row.get("name"),
        cpf: row.get("cpf"),
        secret_hash: row.get("secret_hash"),
        balance: row.get("balance"),
        created_at: row.get("created_at"),
    }
}

fn transfer_from_row(row: &PgRow) -> TransferRecord {
    TransferRecord {
        id: row.get("transfer_id"),
        origin_account_id: row.get("origin_account_id"),
        destination_account_id: row.get("destination_account_id"),
        amount: row.get("amount"),
        created_at: row.get("created_at"),
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn insert_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO tokens_tb (correlation_id, client_id, digest) VALUES ($1, $2, $3)")
            .bind(credential.correlation_id.to_hex())
            .bind(&credential.client_id)
            .bind(&credential.digest)
            .execute(&self.pool)
            .await
            .map_err(map_insert_error)?;
        Ok(())
    }

    async fn find_credential(&self, id: &CorrelationId) -> Result<Credential, StoreError> {
        let row = sqlx::query(
            "SELECT correlation_id, client_id, digest FROM tokens_tb WHERE correlation_id = $1",
        )
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let stored: String = row.get("correlation_id");
        let correlation_id = stored
            .trim()
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("tokens_tb.correlation_id: {}", e)))?;
        Ok(Credential {
            correlation_id,
            client_id: row.get("client_id"),
            digest: row.get("digest"),
        })
    }

    async fn delete_credential(&self, id: &CorrelationId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tokens_tb WHERE correlation_id = $1")
            .bind(id.to_hex())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl AccountLedger for PgStore {
    /// Balance is stored with two decimal places.
    async fn create_account(&self, account: Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts_tb (account_id, name, cpf, secret_hash, balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&account.id)
        .bind(&account.name)
        .bind(&account.cpf)
        .bind(&account.secret_hash)
        .bind(account.balance)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;
        Ok(())
    }

    async fn get_account(&self, account_id: &str) -> Result<Account, StoreError> {
        let sql = format!("SELECT {} FROM accounts_tb WHERE account_id = $1", ACCOUNT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(account_from_row(&row))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let sql = format!(
            "SELECT {} FROM accounts_tb ORDER BY created_at, account_id",
            ACCOUNT_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(account_from_row).collect())
    }

    async fn get_balance(&self, account_id: &str) -> Result<Decimal, StoreError> {
        let balance = sqlx::query_scalar::<_, Decimal>(
            "SELECT balance FROM accounts_tb WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        balance.ok_or(StoreError::NotFound)
    }

    async fn update_balance(
        &self,
        account_id: &str,
        expected: Decimal,
        new: Decimal,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE accounts_tb SET balance = $1 WHERE account_id = $2 AND balance = $3",
        )
        .bind(new)
        .bind(account_id)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts_tb WHERE account_id = $1)",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;
        if exists {
            Err(StoreError::Conflict)
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn find_login(&self, cpf: &str) -> Result<LoginRecord, StoreError> {
        let row = sqlx::query("SELECT account_id, secret_hash FROM accounts_tb WHERE cpf = $1")
            .bind(cpf)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(LoginRecord {
            account_id: row.get("account_id"),
            secret_hash: row.get("secret_hash"),
        })
    }
}

#[async_trait]
impl TransferRecordStore for PgStore {
    async fn append_transfer(&self, transfer: NewTransfer) -> Result<TransferRecord, StoreError> {
        let id = new_transfer_id();
        let created_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO transfers_tb
                (transfer_id, origin_account_id, destination_account_id, amount, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING created_at
            "#,
        )
        .bind(&id)
        .bind(&transfer.origin_account_id)
        .bind(&transfer.destination_account_id)
        .bind(transfer.amount)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(TransferRecord::from_new(id, transfer, created_at))
    }

    async fn list_transfers(&self, account_id: &str) -> Result<Vec<TransferRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT transfer_id, origin_account_id, destination_account_id, amount, created_at
            FROM transfers_tb
            WHERE origin_account_id = $1 OR destination_account_id = $1
            ORDER BY created_at, transfer_id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(transfer_from_row).collect())
    }
}
