//! Configuration management for the RSFGA client.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! Environment variables take precedence over config file values, which
//! take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use rsfga_client::config::ClientConfig;
//!
//! // Load from file with env overrides
//! let config = ClientConfig::load("client.yaml")?;
//!
//! // Or load from environment only
//! let config = ClientConfig::from_env()?;
//! ```

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use reqwest::Url;
use rsfga_client_core::BatchOptions;
use serde::{Deserialize, Serialize};

/// Environment variable prefix, e.g. `RSFGA_CLIENT_API__URL`.
const ENV_PREFIX: &str = "RSFGA_CLIENT";

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ClientConfig {
    /// API connection settings
    #[serde(default)]
    pub api: ApiSettings,

    /// Default batch write options
    #[serde(default)]
    pub batch: BatchOptions,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// API connection settings.
///
/// # Example YAML Configuration
///
/// ```yaml
/// api:
///   url: https://fga.example.com
///   api_token: my-token
///   timeout_secs: 10
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiSettings {
    /// Base URL of the OpenFGA-compatible server
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            api_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ClientConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `RSFGA_CLIENT_` and use `__`
    /// as the nested key separator:
    /// - `RSFGA_CLIENT_API__URL=...` overrides `api.url`
    /// - `RSFGA_CLIENT_BATCH__MAX_RETRIES=3` overrides `batch.max_retries`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ClientConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(environment())
            .build()?;

        let client_config: ClientConfig = config.try_deserialize()?;
        client_config.validate()?;

        Ok(client_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ClientConfig::default())?)
            .add_source(environment())
            .build()?;

        let client_config: ClientConfig = config.try_deserialize()?;
        client_config.validate()?;

        Ok(client_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.api.url.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "api.url cannot be empty".to_string(),
            });
        }

        if let Err(e) = Url::parse(&self.api.url) {
            return Err(ConfigLoadError::Invalid {
                message: format!("api.url is not a valid URL ({}): {e}", self.api.url),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "api.timeout_secs must be greater than 0".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
