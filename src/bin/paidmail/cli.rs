//! Command-line interface definition.

use clap::{Parser, Subcommand};
use paidmail::CoreConfig;
use std::path::PathBuf;

/// Inspect recipients on the paid-mail directory service.
#[derive(Parser, Debug)]
#[command(name = "paidmail")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the directory service.
    #[arg(long, env = "PAIDMAIL_DIRECTORY_URL")]
    pub directory_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "PAIDMAIL_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Log level.
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Path to configuration file.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a recipient's profile and payment tiers.
    Tiers {
        /// Recipient handle.
        handle: String,
    },
}

impl Cli {
    /// Convert CLI arguments into a `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is specified but cannot be loaded.
    pub fn to_config(&self) -> color_eyre::Result<CoreConfig> {
        // Start with default config or load from file
        let mut config = if let Some(ref path) = self.config {
            CoreConfig::from_file(path)?
        } else {
            CoreConfig::default()
        };

        // Override with CLI arguments
        if let Some(ref url) = self.directory_url {
            config.directory_url.clone_from(url);
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }
        config.log_level.clone_from(&self.log_level);

        Ok(config)
    }
}
