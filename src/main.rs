//! provstore - Azure Storage Account Provisioning Tool
//!
//! A command-line tool for provisioning Azure Storage Accounts,
//! written in Rust for performance, safety, and reliability.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use provstore::cli::{Cli, Commands};
use provstore::config;
use provstore::error::Result;

#[tokio::main]
async fn main() {
    // Initialize logging
    init_logging();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the command
    if let Err(e) = run(cli).await {
        error!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting provstore");

    // Offline commands load configuration without validation
    let config = match &cli.command {
        Commands::Config { .. } | Commands::Name { .. } => {
            config::load_config_no_validation().await?
        }
        _ => config::load_config().await?,
    };

    // Execute the command
    cli.execute(config).await?;

    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "provstore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
