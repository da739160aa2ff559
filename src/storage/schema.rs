//! Table bootstrap for the PostgreSQL backend

use sqlx::PgPool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS accounts_tb (
        account_id   TEXT PRIMARY KEY,
        name         TEXT NOT NULL DEFAULT '',
        cpf          TEXT NOT NULL UNIQUE,
        secret_hash  TEXT NOT NULL,
        balance      NUMERIC(20, 2) NOT NULL DEFAULT 0,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tokens_tb (
        correlation_id  CHAR(24) PRIMARY KEY,
        client_id       TEXT NOT NULL,
        digest          TEXT NOT NULL,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transfers_tb (
        transfer_id             TEXT PRIMARY KEY,
        origin_account_id       TEXT NOT NULL,
        destination_account_id  TEXT NOT NULL,
        amount                  NUMERIC(20, 2) NOT NULL,
        created_at              TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "ALTER TABLE accounts_tb ADD COLUMN IF NOT EXISTS name TEXT NOT NULL DEFAULT ''",
    "CREATE INDEX IF NOT EXISTS idx_transfers_origin ON transfers_tb (origin_account_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_transfers_destination ON transfers_tb (destination_account_id, created_at)",
];

/// Create missing tables. Safe to run on every start.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for stmt in STATEMENTS {
        sqlx::query(stmt).execute(pool).await?;
    }
    tracing::info!("Storage schema ready");
    Ok(())
}
