//! CSV import for transaction history files
//!
//! Expected format: a header row containing `amount`, `date`,
//! `category_name`, and `type` columns (any order). Dates are accepted as
//! epoch milliseconds, RFC 3339, or `YYYY-MM-DD`.

use std::io::Read;

use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{parse_flexible_date, NewTransaction, TransactionKind};

/// Generate a unique hash for deduplication
fn generate_hash(date: &DateTime<Utc>, category: &str, amount: f64, kind: TransactionKind) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.timestamp_millis().to_be_bytes());
    hasher.update(category.as_bytes());
    hasher.update(amount.to_be_bytes());
    hasher.update(kind.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

/// Parse a transaction history CSV into new transactions
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<NewTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::Import(format!("Missing column: {}", name)))
    };

    let amount_idx = column("amount")?;
    let date_idx = column("date")?;
    let category_idx = column("category_name")?;
    let type_idx = column("type")?;

    let mut transactions = Vec::new();
    for result in rdr.records() {
        let record = result?;

        let amount: f64 = record
            .get(amount_idx)
            .ok_or_else(|| Error::Import("Missing amount".into()))?
            .trim()
            .parse()
            .map_err(|e| Error::Import(format!("Bad amount: {}", e)))?;

        let date = parse_flexible_date(
            record
                .get(date_idx)
                .ok_or_else(|| Error::Import("Missing date".into()))?,
        )?;

        let category_name = record
            .get(category_idx)
            .ok_or_else(|| Error::Import("Missing category_name".into()))?
            .trim()
            .to_string();
        if category_name.is_empty() {
            return Err(Error::Import("Empty category_name".into()));
        }

        let kind: TransactionKind = record
            .get(type_idx)
            .ok_or_else(|| Error::Import("Missing type".into()))?
            .trim()
            .parse()
            .map_err(Error::Import)?;

        let import_hash = generate_hash(&date, &category_name, amount, kind);

        transactions.push(NewTransaction {
            amount,
            date,
            category_name,
            kind,
            import_hash,
        });
    }

    Ok(transactions)
}

/// Result of an import run
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportStats {
    pub imported: usize,
    pub skipped: usize,
}

/// Parse a CSV and insert its transactions, auto-creating categories.
///
/// Duplicate rows (same date, category, amount, and type as an existing
/// transaction) are skipped.
pub fn import_transactions<R: Read>(db: &Database, reader: R) -> Result<ImportStats> {
    let transactions = parse_csv(reader)?;

    let mut stats = ImportStats::default();
    for tx in &transactions {
        let category_id = db.upsert_category(&tx.category_name, tx.kind)?;
        match db.insert_transaction(category_id, tx)? {
            Some(_) => stats.imported += 1,
            None => stats.skipped += 1,
        }
    }

    info!(
        imported = stats.imported,
        skipped = stats.skipped,
        "import complete"
    );
    Ok(stats)
}
