//! Default file locations.

use std::path::PathBuf;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "coinbridge.toml";

/// Returns the default config file path.
pub fn default_config() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
