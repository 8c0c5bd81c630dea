//! Core commands (init, averages, status) and shared utilities

use std::path::Path;

use anyhow::{Context, Result};

use nestegg_core::{stats, Database, ModelArtifact};

/// Open the database, creating it (and running migrations) if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    let created = db.seed_default_categories()?;

    println!("Initialized database at {}", db_path.display());
    if created > 0 {
        println!("Seeded {} categories", created);
    } else {
        println!("Category vocabulary already present");
    }
    Ok(())
}

pub fn cmd_averages(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    let transactions = db.fetch_transactions()?;
    let averages = stats::average_monthly_spending(&transactions);

    if averages.is_empty() {
        println!("No expense history yet - import transactions first");
        return Ok(());
    }

    println!("Average monthly spending (over active months):");
    for (category, average) in &averages {
        println!("  {:<20} ${:>10.2}", category, average);
    }
    Ok(())
}

pub fn cmd_status(db_path: &Path, model_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;

    println!("Database: {}", db_path.display());
    println!("  Categories:   {}", db.count_categories()?);
    println!("  Transactions: {}", db.count_transactions()?);

    match ModelArtifact::load(model_path) {
        Ok(artifact) => {
            println!("Model: {}", model_path.display());
            println!("  Kind:       {}", artifact.kind);
            println!("  Features:   {}", artifact.feature_names().len());
            println!("  Classes:    {}", artifact.classes.len());
            println!("  Trained at: {}", artifact.trained_at.to_rfc3339());
            if let Some(accuracy) = artifact.accuracy {
                println!("  Accuracy:   {:.1}%", accuracy * 100.0);
            }
        }
        Err(_) => {
            println!("Model: {} (not trained yet)", model_path.display());
        }
    }
    Ok(())
}
