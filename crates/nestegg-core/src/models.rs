//! Domain models for Nestegg

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Direction of money movement for a transaction or category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: TransactionKind,
}

/// A transaction joined against its category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub category_name: String,
    pub kind: TransactionKind,
}

impl Transaction {
    /// The calendar-month bucket this transaction aggregates into
    pub fn month(&self) -> NaiveDate {
        month_bucket(self.date)
    }
}

/// A new transaction to be imported (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub category_name: String,
    pub kind: TransactionKind,
    /// Hash for deduplication
    pub import_hash: String,
}

/// Truncate a timestamp to the first day of its calendar month
pub fn month_bucket(date: DateTime<Utc>) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .expect("first day of a month is always a valid date")
}

/// A transaction as submitted over the wire (inference request body)
///
/// Only `amount` and `category_name` carry signal at inference time; the
/// date is parsed leniently because clients send epoch milliseconds, RFC 3339
/// timestamps, or plain `YYYY-MM-DD` dates interchangeably.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    pub amount: f64,
    pub date: String,
    pub category_name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TransactionInput {
    /// Resolve the wire representation into a domain transaction
    pub fn to_transaction(&self) -> Result<Transaction> {
        let kind = self
            .kind
            .parse::<TransactionKind>()
            .map_err(Error::InvalidData)?;
        Ok(Transaction {
            amount: self.amount,
            date: parse_flexible_date(&self.date)?,
            category_name: self.category_name.clone(),
            kind,
        })
    }
}

/// Parse a date that may be epoch milliseconds, RFC 3339, or `YYYY-MM-DD`
pub fn parse_flexible_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    // Epoch milliseconds (the transaction store's native representation)
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '-') {
        if let Ok(ms) = s.parse::<i64>() {
            if let chrono::LocalResult::Single(dt) = chrono::TimeZone::timestamp_millis_opt(&Utc, ms)
            {
                return Ok(dt);
            }
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }

    Err(Error::InvalidData(format!("Unparseable date: {}", s)))
}
