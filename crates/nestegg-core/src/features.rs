//! Monthly feature engineering
//!
//! Turns an irregular transaction log into a fixed-schema numeric table with
//! one row per calendar month and a deterministic column set per category:
//! `{category}_amount`, optionally `{category}_txn_count`,
//! `{category}_pct_of_spend`, `{category}_monthly_change`, plus the scalar
//! `total_expenditure`.
//!
//! The same [`FeatureSchema`] drives both training and inference. Column
//! order is canonicalized in exactly one place ([`FeatureSchema::canonical`])
//! so the table a model was trained on and the rows reconstructed for new
//! transactions can never drift apart.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Transaction;

/// Column name for the per-month spending total
pub const TOTAL_EXPENDITURE: &str = "total_expenditure";

/// Column name for a category's summed amount
pub fn amount_column(category: &str) -> String {
    format!("{}_amount", category)
}

/// Column name for a category's transaction count (count variant only)
pub fn count_column(category: &str) -> String {
    format!("{}_txn_count", category)
}

/// Column name for a category's share of the month's total expenditure
pub fn pct_column(category: &str) -> String {
    format!("{}_pct_of_spend", category)
}

/// Column name for a category's month-over-month percentage change
pub fn change_column(category: &str) -> String {
    format!("{}_monthly_change", category)
}

/// Feature table variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureOptions {
    /// Also emit `{category}_txn_count` columns
    pub include_counts: bool,
}

/// The canonical, ordered column layout for a category vocabulary.
///
/// Built once at training time and persisted inside the model artifact;
/// inference reuses the persisted schema verbatim. Fields are private so a
/// schema can only be constructed through the single canonicalization rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    vocabulary: Vec<String>,
    columns: Vec<String>,
    options: FeatureOptions,
}

impl FeatureSchema {
    /// Build the canonical schema for a vocabulary.
    ///
    /// The one canonicalization rule: generate every column name, then sort
    /// lexicographically. Both the trainer and the inference adapter go
    /// through this constructor (or a schema deserialized from it), never
    /// through an ad-hoc column list.
    pub fn canonical(vocabulary: &[String], options: FeatureOptions) -> Self {
        let mut vocab: Vec<String> = vocabulary.to_vec();
        vocab.sort();
        vocab.dedup();

        let mut columns = Vec::with_capacity(vocab.len() * 4 + 1);
        columns.push(TOTAL_EXPENDITURE.to_string());
        for category in &vocab {
            columns.push(amount_column(category));
            if options.include_counts {
                columns.push(count_column(category));
            }
            columns.push(pct_column(category));
            columns.push(change_column(category));
        }
        columns.sort();

        Self {
            vocabulary: vocab,
            columns,
            options,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn options(&self) -> FeatureOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column in the canonical order
    pub fn index_of(&self, column: &str) -> Option<usize> {
        // Columns are sorted, so binary search is exact
        self.columns
            .binary_search_by(|c| c.as_str().cmp(column))
            .ok()
    }
}

/// One month-row of the feature table, values aligned to a [`FeatureSchema`]
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRow {
    /// First day of the calendar month this row aggregates
    pub month: NaiveDate,
    pub values: Vec<f64>,
}

impl MonthlyRow {
    /// Value of a named column, if the schema carries it
    pub fn get(&self, schema: &FeatureSchema, column: &str) -> Option<f64> {
        schema.index_of(column).and_then(|i| self.values.get(i)).copied()
    }
}

/// The full monthly feature table for a transaction batch
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    schema: FeatureSchema,
    rows: Vec<MonthlyRow>,
}

impl FeatureMatrix {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn rows(&self) -> &[MonthlyRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain numeric rows in schema order, ready for a classifier
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.values.clone()).collect()
    }
}

/// Build the monthly feature table for a batch of transactions.
///
/// Every month that has at least one transaction produces a row carrying the
/// full column set; categories with no activity that month are zero-filled.
/// Transactions whose category is outside the schema's vocabulary still
/// create their month-row but contribute no amounts (they would otherwise
/// shift the trained model's input space).
pub fn build_features(transactions: &[Transaction], schema: &FeatureSchema) -> FeatureMatrix {
    let vocab: HashSet<&str> = schema.vocabulary.iter().map(String::as_str).collect();

    // Chronological month buckets: category -> (summed amount, count)
    let mut buckets: BTreeMap<NaiveDate, HashMap<&str, (f64, u32)>> = BTreeMap::new();
    for tx in transactions {
        let bucket = buckets.entry(tx.month()).or_default();
        if !vocab.contains(tx.category_name.as_str()) {
            debug!(category = %tx.category_name, "category outside vocabulary, ignored");
            continue;
        }
        let slot = bucket.entry(tx.category_name.as_str()).or_insert((0.0, 0));
        slot.0 += tx.amount;
        slot.1 += 1;
    }

    let mut rows = Vec::with_capacity(buckets.len());
    let mut prev_amounts: HashMap<&str, f64> = HashMap::new();
    let mut first_row = true;

    for (month, sums) in &buckets {
        let mut values = vec![0.0; schema.columns.len()];

        let mut total = 0.0;
        for category in &schema.vocabulary {
            let (amount, count) = sums.get(category.as_str()).copied().unwrap_or((0.0, 0));
            total += amount;
            if let Some(i) = schema.index_of(&amount_column(category)) {
                values[i] = amount;
            }
            if schema.options.include_counts {
                if let Some(i) = schema.index_of(&count_column(category)) {
                    values[i] = count as f64;
                }
            }
        }
        if let Some(i) = schema.index_of(TOTAL_EXPENDITURE) {
            values[i] = total;
        }

        for category in &schema.vocabulary {
            let (amount, _) = sums.get(category.as_str()).copied().unwrap_or((0.0, 0));

            // A month with zero total must not divide
            let pct = if total == 0.0 {
                0.0
            } else {
                amount / total * 100.0
            };
            if let Some(i) = schema.index_of(&pct_column(category)) {
                values[i] = pct;
            }

            // First row has no predecessor; a zero previous value has no
            // meaningful percentage change either
            let change = if first_row {
                0.0
            } else {
                let prev = prev_amounts.get(category.as_str()).copied().unwrap_or(0.0);
                if prev == 0.0 {
                    0.0
                } else {
                    (amount - prev) / prev * 100.0
                }
            };
            if let Some(i) = schema.index_of(&change_column(category)) {
                values[i] = change;
            }
        }

        for category in &schema.vocabulary {
            let (amount, _) = sums.get(category.as_str()).copied().unwrap_or((0.0, 0));
            prev_amounts.insert(category.as_str(), amount);
        }
        first_row = false;

        rows.push(MonthlyRow {
            month: *month,
            values,
        });
    }

    FeatureMatrix {
        schema: schema.clone(),
        rows,
    }
}
