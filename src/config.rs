use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use thiserror::Error;

use crate::logging::parse_rotation;

/// Environment variables that override the gatekeeper section
pub const SECRET_ENV: &str = "APP_JWT_GATEKEEPER_SECRET";
pub const ISSUER_ENV: &str = "APP_JWT_GATEKEEPER_ISSUER";
pub const POSTGRES_URL_ENV: &str = "APP_POSTGRES_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    pub gatekeeper: GatekeeperConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Signing inputs. Credential lifetime is fixed at
/// [`CREDENTIAL_TTL_SECS`](crate::gatekeeper::CREDENTIAL_TTL_SECS).
#[derive(Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct GatekeeperConfig {
    /// HMAC-SHA-256 signing secret
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub issuer: String,
}

impl GatekeeperConfig {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::Invalid("gatekeeper secret must not be empty"));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Invalid("gatekeeper issuer must not be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for GatekeeperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatekeeperConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default)]
    pub postgres_url: Option<String>,
    /// Upper bound for every store call
    pub timeout_ms: u64,
    pub max_connections: u32,
    /// Accounts provisioned at startup; existing ids are left alone
    #[serde(default)]
    pub seed_accounts: Vec<SeedAccount>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SeedAccount {
    pub id: String,
    pub name: String,
    pub cpf: String,
    pub secret: String,
    pub balance: rust_decimal::Decimal,
}

impl std::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("cpf", &self.cpf)
            .field("balance", &self.balance)
            .finish_non_exhaustive()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            postgres_url: None,
            timeout_ms: 15_000,
            max_connections: 10,
            seed_accounts: Vec::new(),
        }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TransferConfig {
    /// Write back previous balances when a later commit step fails
    #[serde(default)]
    pub compensate_on_partial_failure: bool,
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides through `lookup` so tests never touch the process env.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = lookup(SECRET_ENV).filter(|s| !s.is_empty()) {
            self.gatekeeper.secret = secret;
        }
        if let Some(issuer) = lookup(ISSUER_ENV).filter(|s| !s.is_empty()) {
            self.gatekeeper.issuer = issuer;
        }
        if let Some(url) = lookup(POSTGRES_URL_ENV).filter(|s| !s.is_empty()) {
            self.storage.postgres_url = Some(url);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gatekeeper.validate()?;
        if parse_rotation(&self.rotation).is_none() {
            return Err(ConfigError::Invalid("rotation must be hourly, daily or never"));
        }
        if self.storage.backend == StorageBackend::Postgres
            && self.storage.postgres_url.as_deref().unwrap_or("").is_empty()
        {
            return Err(ConfigError::Invalid(
                "postgres backend requires storage.postgres_url",
            ));
        }
        if self.storage.timeout_ms == 0 {
            return Err(ConfigError::Invalid("storage.timeout_ms must be positive"));
        }
        Ok(())
    }
}
