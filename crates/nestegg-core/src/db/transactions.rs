//! Transaction storage and extraction

use rusqlite::{params, OptionalExtension};

use super::{parse_epoch_millis, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction};

impl Database {
    /// Insert a transaction (skips duplicates based on import_hash).
    ///
    /// Returns the new row id, or None when the transaction was already
    /// present.
    pub fn insert_transaction(&self, category_id: i64, tx: &NewTransaction) -> Result<Option<i64>> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM transactions WHERE import_hash = ?",
                params![tx.import_hash],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Ok(None); // Duplicate, skip
        }

        conn.execute(
            r#"
            INSERT INTO transactions (amount, date, category_id, type, import_hash)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                tx.amount,
                tx.date.timestamp_millis(),
                category_id,
                tx.kind.as_str(),
                tx.import_hash,
            ],
        )?;

        Ok(Some(conn.last_insert_rowid()))
    }

    /// Extract the full transaction history joined against category names,
    /// newest first.
    ///
    /// The descending date order is not semantically required downstream but
    /// keeps extraction reproducible.
    pub fn fetch_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                transactions.amount,
                transactions.date,
                categories.name AS category_name,
                transactions.type
            FROM transactions
            JOIN categories ON transactions.category_id = categories.id
            ORDER BY transactions.date DESC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, f64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(amount, date_ms, category_name, kind_str)| {
                let kind = kind_str.parse().map_err(Error::InvalidData)?;
                Ok(Transaction {
                    amount,
                    date: parse_epoch_millis(date_ms),
                    category_name,
                    kind,
                })
            })
            .collect()
    }

    /// Number of stored transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}
