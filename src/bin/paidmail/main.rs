//! paidmail CLI entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use paidmail::{HttpDirectoryConfig, HttpDirectoryService, TierCatalog};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("paidmail v{}", env!("CARGO_PKG_VERSION"));

    // Build configuration
    let config = cli.to_config()?;
    let directory = HttpDirectoryService::new(HttpDirectoryConfig::from(&config))?;

    match cli.command {
        Command::Tiers { handle } => {
            let (profile, catalog) = TierCatalog::load(&directory, &handle).await?;

            let name = profile.display_name.as_deref().unwrap_or(&profile.username);
            let verified = if profile.is_verified { " (verified)" } else { "" };
            println!("{name}{verified}");

            if catalog.is_empty() {
                println!("No payment tiers configured - submission disabled.");
            } else {
                for (index, tier) in catalog.list().iter().enumerate() {
                    println!("  [{index}] {}", tier.label());
                }
            }
        }
    }

    Ok(())
}
