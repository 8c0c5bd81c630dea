//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nestegg - Savings recommendations from your transaction history
#[derive(Parser)]
#[command(name = "nestegg")]
#[command(about = "Train and serve a savings recommendation model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "nestegg.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed the default category vocabulary
    Init,

    /// Import a transaction history CSV (amount, date, category_name, type)
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Train a recommendation model from the stored history
    Train {
        /// Classifier: tree or forest
        #[arg(short, long, default_value = "forest")]
        model: String,

        /// Labeling policy: global, advice, or relative
        #[arg(short, long, default_value = "advice")]
        policy: String,

        /// Also include per-category transaction counts as features
        #[arg(long)]
        counts: bool,

        /// Where to write the model artifact
        #[arg(short, long, default_value = "nestegg_model.json")]
        output: PathBuf,
    },

    /// Show average monthly spending per category
    Averages,

    /// Show database and model status
    Status {
        /// Model artifact to check
        #[arg(long, default_value = "nestegg_model.json")]
        model: PathBuf,
    },

    /// Start the recommendation web server
    Serve {
        /// Port to listen on (defaults to the PORT env var, then 8080)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Model artifact to serve
        #[arg(short, long, default_value = "nestegg_model.json")]
        model: PathBuf,
    },
}
