use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

use crate::error::{LedgerError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "custody-ledger.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub max_upload_bytes: usize,
    pub seed_demo_data: bool,
    pub network: NetworkConfig,
}

/// Static metadata reported by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub status: String,
    pub gas_price: String,
    pub contract_address: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "BlockDAG TestNet".to_string(),
            status: "Operational".to_string(),
            gas_price: "20 Gwei".to_string(),
            contract_address: "0x742d35Cc6634C0532925a3b844Bc9e7595f42e0".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            max_upload_bytes: 50 * 1024 * 1024,
            seed_demo_data: false,
            network: NetworkConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `CUSTODY_LEDGER_CONFIG` (or `custody-ledger.toml`), then
    /// `CUSTODY_LEDGER__*` environment overrides.
    pub fn load() -> Result<Self> {
        let path = env::var("CUSTODY_LEDGER_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load with `path` as the (optional) config file.
    pub fn load_from(path: &str) -> Result<Self> {
        let defaults = AppConfig::default();

        let settings = Config::builder()
            .set_default("server_host", defaults.server_host)?
            .set_default("server_port", i64::from(defaults.server_port))?
            .set_default("max_upload_bytes", defaults.max_upload_bytes as i64)?
            .set_default("seed_demo_data", defaults.seed_demo_data)?
            .set_default("network.name", defaults.network.name)?
            .set_default("network.status", defaults.network.status)?
            .set_default("network.gas_price", defaults.network.gas_price)?
            .set_default("network.contract_address", defaults.network.contract_address)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("CUSTODY_LEDGER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        info!("Configuration loaded ({})", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(LedgerError::ConfigError(
                "server_port must be non-zero".to_string(),
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(LedgerError::ConfigError(
                "max_upload_bytes must be non-zero".to_string(),
            ));
        }

        if self.network.name.trim().is_empty() {
            return Err(LedgerError::ConfigError(
                "network.name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
