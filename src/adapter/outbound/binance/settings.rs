//! Binance exchange configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// API key pair used to sign private requests.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    pub key: String,
    pub secret: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Both halves of the key pair are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.key.trim().is_empty() && !self.secret.trim().is_empty()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("key", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Behavioral options for the Binance adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceOptions {
    /// Milliseconds after the request timestamp during which the server
    /// still accepts a signed request.
    #[serde(default = "default_recv_window")]
    pub recv_window: u64,
    /// Synchronize with the server clock before the first signed request.
    #[serde(default)]
    pub use_server_time: bool,
    /// Synchronize with the server clock before every signed request.
    #[serde(default)]
    pub always_use_server_time: bool,
    /// Retry idempotent reads after connection failures.
    #[serde(default = "default_true")]
    pub reconnect: bool,
    /// Log every vendor request at info level instead of debug.
    #[serde(default)]
    pub verbose: bool,
    /// Route order placement to the non-executing test endpoint.
    #[serde(default)]
    pub test: bool,
}

const fn default_recv_window() -> u64 {
    5000
}

const fn default_true() -> bool {
    true
}

impl Default for BinanceOptions {
    fn default() -> Self {
        Self {
            recv_window: default_recv_window(),
            use_server_time: false,
            always_use_server_time: false,
            reconnect: true,
            verbose: false,
            test: false,
        }
    }
}

/// Binance HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for retryable reads.
    #[serde(default = "default_http_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_http_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    10_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    3000
}

const fn default_http_retry_max_attempts() -> u32 {
    3
}

const fn default_http_retry_backoff_ms() -> u64 {
    500
}

impl Default for BinanceHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            retry_max_attempts: default_http_retry_max_attempts(),
            retry_backoff_ms: default_http_retry_backoff_ms(),
        }
    }
}

/// Binance exchange configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    /// API credentials. Only required for account and order operations.
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub options: BinanceOptions,
    /// REST API base URL.
    #[serde(default = "default_binance_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub http: BinanceHttpConfig,
}

fn default_binance_api_url() -> String {
    "https://api.binance.com".into()
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            auth: None,
            options: BinanceOptions::default(),
            api_url: default_binance_api_url(),
            http: BinanceHttpConfig::default(),
        }
    }
}

impl BinanceConfig {
    /// Credentials, if both key and secret are non-empty.
    #[must_use]
    pub fn credentials(&self) -> Option<&AuthConfig> {
        self.auth.as_ref().filter(|auth| auth.is_complete())
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the API URL is empty or unparsable, or when
    /// `recv_window` is outside the range Binance accepts (1..=60000 ms).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" });
        }
        url::Url::parse(&self.api_url).map_err(|e| ConfigError::InvalidValue {
            field: "api_url",
            reason: e.to_string(),
        })?;
        if !(1..=60_000).contains(&self.options.recv_window) {
            return Err(ConfigError::InvalidValue {
                field: "recv_window",
                reason: format!("{} is outside 1..=60000", self.options.recv_window),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_mainnet() {
        let config = BinanceConfig::default();
        assert_eq!(config.api_url, "https://api.binance.com");
        assert_eq!(config.options.recv_window, 5000);
        assert!(!config.options.test);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn incomplete_credentials_count_as_absent() {
        let config = BinanceConfig {
            auth: Some(AuthConfig::new("key", "")),
            ..Default::default()
        };
        assert!(config.credentials().is_none());

        let config = BinanceConfig {
            auth: Some(AuthConfig::new("key", "secret")),
            ..Default::default()
        };
        assert!(config.credentials().is_some());
    }

    #[test]
    fn validate_rejects_bad_recv_window() {
        let mut config = BinanceConfig::default();
        config.options.recv_window = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "recv_window",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_empty_url() {
        let config = BinanceConfig {
            api_url: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { field: "api_url" })
        ));
    }

    #[test]
    fn parses_from_toml() {
        let config: BinanceConfig = toml::from_str(
            r#"
            api_url = "https://testnet.binance.vision"

            [auth]
            key = "k"
            secret = "s"

            [options]
            test = true
            always_use_server_time = true
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "https://testnet.binance.vision");
        assert!(config.options.test);
        assert!(config.options.always_use_server_time);
        assert_eq!(config.options.recv_window, 5000);
        assert!(config.credentials().is_some());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let auth = AuthConfig::new("my-key", "my-secret");
        let text = format!("{auth:?}");
        assert!(!text.contains("my-secret"));
        assert!(!text.contains("my-key"));
    }
}
