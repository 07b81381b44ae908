use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};
use crate::domain::source::IngestionConfig;

/// Optional configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "tablescout.toml";

/// Environment prefix; nested keys use `__`, e.g. `TABLESCOUT_INGESTION__SNIFF_LINES`
pub const ENV_PREFIX: &str = "TABLESCOUT_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
    pub ingestion: IngestionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            log_level: "info".to_string(),
            ingestion: IngestionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `tablescout.toml`, then `TABLESCOUT_*` variables
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self> {
        let config: AppConfig = Self::figment()
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::ValidationError("host must not be empty".to_string()));
        }
        self.ingestion
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid ingestion config: {}", e)))
    }
}
