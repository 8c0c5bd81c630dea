//! Nestegg CLI - Savings recommendations from transaction history
//!
//! Usage:
//!   nestegg init                  Initialize database and seed categories
//!   nestegg import --file CSV     Import a transaction history
//!   nestegg train                 Train a recommendation model
//!   nestegg serve --port 8080     Start the recommendation server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import { file } => commands::cmd_import(&cli.db, &file),
        Commands::Train {
            model,
            policy,
            counts,
            output,
        } => commands::cmd_train(&cli.db, &model, &policy, counts, &output),
        Commands::Averages => commands::cmd_averages(&cli.db),
        Commands::Status { model } => commands::cmd_status(&cli.db, &model),
        Commands::Serve { port, host, model } => {
            commands::cmd_serve(&host, port, &model).await
        }
    }
}
