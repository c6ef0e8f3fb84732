//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. API credentials may also come
//! from the `BINANCE_API_KEY` and `BINANCE_API_SECRET` environment variables,
//! which override anything in the file.
//!
//! # Example
//!
//! ```no_run
//! use coinbridge::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("coinbridge.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use crate::adapter::outbound::binance::settings::{AuthConfig, BinanceConfig};
use crate::error::{ConfigError, Result};

pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
pub const API_SECRET_ENV: &str = "BINANCE_API_SECRET";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Binance adapter configuration.
    #[serde(default)]
    pub binance: BinanceConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Applies credential overrides from the environment before validating.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_credentials(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(API_SECRET_ENV).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    ///
    /// Environment credentials apply either way.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed, or
    /// validation fails.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Override credentials with whichever halves are given.
    ///
    /// Empty values are ignored.
    pub fn apply_credentials(&mut self, key: Option<String>, secret: Option<String>) {
        let key = key.filter(|k| !k.trim().is_empty());
        let secret = secret.filter(|s| !s.trim().is_empty());
        if key.is_none() && secret.is_none() {
            return;
        }

        let current = self
            .binance
            .auth
            .take()
            .unwrap_or_else(|| AuthConfig::new("", ""));
        self.binance.auth = Some(AuthConfig {
            key: key.unwrap_or(current.key),
            secret: secret.unwrap_or(current.secret),
        });
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown log format or invalid Binance
    /// settings.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected \"pretty\" or \"json\", got {:?}", self.logging.format),
            }
            .into());
        }
        self.binance.validate()?;
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
