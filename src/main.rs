//! transfer_gate - authenticated transfer service
//!
//! ```text
//! --env, -e <name>   load config/<name>.yaml (default: dev)
//! --port <port>      override gateway.port
//! ```

use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

use transfer_gate::auth::hash_secret;
use transfer_gate::config::{AppConfig, SeedAccount, StorageBackend};
use transfer_gate::gateway::{self, state::AppState};
use transfer_gate::storage::{
    Account, AccountLedger, Database, MemoryStore, PgStore, StoreError, schema,
};
use transfer_gate::{Gatekeeper, TransferOptions};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn to_account(seed: &SeedAccount) -> anyhow::Result<Account> {
    Ok(Account {
        id: seed.id.clone(),
        name: seed.name.clone(),
        cpf: seed.cpf.clone(),
        secret_hash: hash_secret(&seed.secret)?,
        balance: transfer_gate::balance::round_balance(seed.balance),
        created_at: Utc::now(),
    })
}

/// Provision configured accounts. Already-present ones are skipped.
async fn seed_accounts(ledger: &dyn AccountLedger, seeds: &[SeedAccount]) -> anyhow::Result<()> {
    for seed in seeds {
        match ledger.create_account(to_account(seed)?).await {
            Ok(()) => tracing::info!(account_id = %seed.id, "Seed account provisioned"),
            Err(StoreError::Duplicate) => {
                tracing::info!(account_id = %seed.id, "Seed account already present")
            }
            Err(e) => return Err(e).with_context(|| format!("failed to seed account {}", seed.id)),
        }
    }
    Ok(())
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let gatekeeper = Arc::new(Gatekeeper::new(&config.gatekeeper)?);
    let options = TransferOptions {
        timeout: config.storage.timeout(),
        compensate_on_partial_failure: config.transfer.compensate_on_partial_failure,
    };

    match config.storage.backend {
        StorageBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            seed_accounts(store.as_ref(), &config.storage.seed_accounts).await?;
            tracing::info!(issuer = gatekeeper.issuer(), "Using in-memory storage");
            Ok(AppState::from_store(gatekeeper, store, options))
        }
        StorageBackend::Postgres => {
            let url = config
                .storage
                .postgres_url
                .as_deref()
                .context("storage.postgres_url is not set")?;
            let db = Database::connect(url, &config.storage)
                .await
                .context("failed to connect to PostgreSQL")?;
            schema::init_schema(db.pool()).await?;
            db.health_check().await?;

            let store = Arc::new(PgStore::new(db.pool().clone()));
            seed_accounts(store.as_ref(), &config.storage.seed_accounts).await?;
            tracing::info!(issuer = gatekeeper.issuer(), "Using PostgreSQL storage");
            Ok(AppState::from_store(gatekeeper, store, options))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut config =
        AppConfig::load(&env).with_context(|| format!("failed to load configuration '{}'", env))?;
    if let Some(port) = get_port_override() {
        config.gateway.port = port;
    }

    let _log_guard = transfer_gate::logging::init_logging(&config);
    tracing::info!(
        env = %env,
        build = env!("BUILD_ID"),
        "Starting transfer_gate"
    );

    let state = build_state(&config).await.inspect_err(|e| {
        tracing::error!(error = ?e, "Startup failed");
    })?;

    gateway::run_server(&config.gateway, Arc::new(state)).await
}
