//! Historical spending statistics
//!
//! Computes the average monthly spend per category from expense transactions.
//! A category's average is taken over the months it was actually active in,
//! not over the full calendar span: a category used in 2 of 12 months gets an
//! average over those 2 months. Callers must treat a category that is absent
//! from the map differently from one that averages to zero.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{Transaction, TransactionKind};

/// Category name -> average monthly expense amount
pub type SpendingAverages = BTreeMap<String, f64>;

/// Average monthly expense spend per category, over active months only.
///
/// Categories that never appear as an expense are absent from the result.
/// An empty history yields an empty map.
pub fn average_monthly_spending(transactions: &[Transaction]) -> SpendingAverages {
    // (category, month) -> summed expense amount
    let mut monthly: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();
    for tx in transactions {
        if tx.kind != TransactionKind::Expense {
            continue;
        }
        *monthly
            .entry((tx.category_name.clone(), tx.month()))
            .or_insert(0.0) += tx.amount;
    }

    // category -> (sum of monthly totals, active month count)
    let mut per_category: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    for ((category, _month), amount) in monthly {
        let slot = per_category.entry(category).or_insert((0.0, 0));
        slot.0 += amount;
        slot.1 += 1;
    }

    per_category
        .into_iter()
        .map(|(category, (sum, months))| (category, sum / months as f64))
        .collect()
}
