//! Monitor Configuration
//!
//! Layered: built-in defaults, then an optional config file (`rnts.toml`,
//! or the path in `RNTS_CONFIG`), then `RNTS__SECTION__KEY` environment
//! variables.

use crate::error::ApiError;
use edge_source::SourceConfig;
use serde::{Deserialize, Serialize};

/// Config file used when `RNTS_CONFIG` is unset (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "rnts";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub source: SourceConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from the default locations
    pub fn load() -> Result<Self, ApiError> {
        let path =
            std::env::var("RNTS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load with `path` as the (optional) config file
    pub fn load_from(path: &str) -> Result<Self, ApiError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("RNTS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
