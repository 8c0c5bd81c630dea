//! Transaction history import command

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;
use nestegg_core::import::import_transactions;

pub fn cmd_import(db_path: &Path, file: &Path) -> Result<()> {
    let db = open_db(db_path)?;

    let reader = File::open(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let stats = import_transactions(&db, reader)?;

    println!(
        "Imported {} transactions ({} duplicates skipped)",
        stats.imported, stats.skipped
    );
    Ok(())
}
