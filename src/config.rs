//! Configuration for the paidmail core.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Core configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Base URL of the hosted directory service.
    #[serde(default = "default_directory_url")]
    pub directory_url: String,

    /// Timeout for directory service requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Stablecoin denomination used for tier payments.
    #[serde(default)]
    pub token: TokenConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Stablecoin denomination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token mint address.
    #[serde(default = "default_token_mint")]
    pub mint: String,

    /// Number of decimal places in the token's atomic unit.
    #[serde(default = "default_token_decimals")]
    pub decimals: u8,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            directory_url: default_directory_url(),
            request_timeout_secs: default_request_timeout_secs(),
            token: TokenConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            mint: default_token_mint(),
            decimals: default_token_decimals(),
        }
    }
}

fn default_directory_url() -> String {
    "https://api.sollinked.com".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

fn default_token_mint() -> String {
    // USDC mint
    "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string()
}

const fn default_token_decimals() -> u8 {
    6
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CoreConfig {
    /// Default configuration file location.
    #[must_use]
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "paidmail")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("paidmail.toml"))
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &std::path::Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.token.decimals, 6);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.log_level, "info");
        assert!(config.token.mint.starts_with("EPjF"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CoreConfig =
            toml::from_str("directory_url = \"http://localhost:8081\"").expect("should parse");
        assert_eq!(config.directory_url, "http://localhost:8081");
        assert_eq!(config.token.decimals, 6);
    }

    #[test]
    fn test_roundtrip() {
        let config = CoreConfig::default();
        let text = toml::to_string_pretty(&config).expect("should serialize");
        let back: CoreConfig = toml::from_str(&text).expect("should parse");
        assert_eq!(back.directory_url, config.directory_url);
        assert_eq!(back.token.mint, config.token.mint);
    }
}
