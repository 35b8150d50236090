//! # rostra-config
//!
//! Environment-driven configuration. Everything has a development
//! default; deployments override with `ROSTRA_`-prefixed variables
//! (optionally via a `.env` file).

use config::{Config, Environment};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Socket address the API binds to.
    pub bind_addr: String,
    /// SQLite database URL; created on first start if missing.
    pub database_url: String,
    /// How often the close sweep runs.
    pub sweep_interval_secs: u64,
    /// Salt for the session-token signatures. Rotating it logs
    /// everyone out.
    pub auth_salt: SecretString,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_ok() {
            tracing::debug!("loaded environment from .env");
        }
        let cfg = Config::builder()
            .set_default("bind_addr", "127.0.0.1:8080")?
            .set_default("database_url", "sqlite:rostra.db")?
            .set_default("sweep_interval_secs", 60)?
            .set_default("auth_salt", "dev-only-salt")?
            .add_source(Environment::with_prefix("ROSTRA"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }
}
