//! Category vocabulary operations

use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Category, TransactionKind};

/// The stock vocabulary seeded by `nestegg init`
pub const DEFAULT_CATEGORIES: &[(&str, TransactionKind)] = &[
    ("Groceries", TransactionKind::Expense),
    ("Rent", TransactionKind::Expense),
    ("Leisure", TransactionKind::Expense),
    ("Travel", TransactionKind::Expense),
    ("Dining Out", TransactionKind::Expense),
    ("Freelancing", TransactionKind::Income),
    ("Gifts Received", TransactionKind::Income),
    ("Utilities", TransactionKind::Expense),
    ("Electronics", TransactionKind::Expense),
    ("Subscriptions", TransactionKind::Expense),
    ("Clothing", TransactionKind::Expense),
    ("Bonus", TransactionKind::Income),
    ("Pet Care", TransactionKind::Expense),
    ("Transportation", TransactionKind::Expense),
    ("Salary", TransactionKind::Income),
];

impl Database {
    /// Insert a category if it does not exist yet, returning its id
    pub fn upsert_category(&self, name: &str, kind: TransactionKind) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT OR IGNORE INTO categories (name, type) VALUES (?, ?)",
            params![name, kind.as_str()],
        )?;

        let id: i64 = conn.query_row(
            "SELECT id FROM categories WHERE name = ?",
            params![name],
            |row| row.get(0),
        )?;

        Ok(id)
    }

    /// Seed the default category vocabulary (idempotent)
    pub fn seed_default_categories(&self) -> Result<usize> {
        let mut created = 0;
        for (name, kind) in DEFAULT_CATEGORIES {
            let conn = self.conn()?;
            created += conn.execute(
                "INSERT OR IGNORE INTO categories (name, type) VALUES (?, ?)",
                params![name, kind.as_str()],
            )?;
        }
        Ok(created)
    }

    /// List all categories, ordered by name
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, type FROM categories ORDER BY name")?;

        let categories = stmt
            .query_map([], |row| {
                let kind_str: String = row.get(2)?;
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, kind_str))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        categories
            .into_iter()
            .map(|(id, name, kind_str)| {
                let kind = kind_str
                    .parse::<TransactionKind>()
                    .map_err(Error::InvalidData)?;
                Ok(Category { id, name, kind })
            })
            .collect()
    }

    /// The category vocabulary as an ordered name list
    pub fn category_names(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Number of categories
    pub fn count_categories(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count)
    }
}
