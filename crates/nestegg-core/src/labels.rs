//! Label derivation policies
//!
//! Turns the monthly feature table into supervised targets. The policy is
//! chosen once at training time and persisted inside the model artifact, so
//! inference never has to guess which scheme produced a label.

use serde::{Deserialize, Serialize};

use crate::features::{amount_column, FeatureMatrix, TOTAL_EXPENDITURE};
use crate::stats::SpendingAverages;

pub const LABEL_HIGH_SAVINGS: &str = "High Savings";
pub const LABEL_LOW_SAVINGS: &str = "Low Savings";
pub const LABEL_EXCEEDED_BUDGET: &str = "Exceeded Budget";
pub const LABEL_WITHIN_BUDGET: &str = "Within Budget";
pub const LABEL_MAINTAIN_HABITS: &str = "Maintain Good Habits";

/// A label is a set of advice tags for one month-row. Binary policies
/// produce a single-element set.
pub type Label = Vec<String>;

/// A per-category advice trigger: fire `tag` when the month's amount for
/// `category` exceeds `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceRule {
    pub category: String,
    pub threshold: f64,
    pub tag: String,
}

impl AdviceRule {
    pub fn new(category: &str, threshold: f64, tag: &str) -> Self {
        Self {
            category: category.to_string(),
            threshold,
            tag: tag.to_string(),
        }
    }
}

/// The stock advice rules shipped with the default category vocabulary
pub fn default_advice_rules() -> Vec<AdviceRule> {
    vec![
        AdviceRule::new("Dining Out", 200.0, "Reduce Dining Out"),
        AdviceRule::new("Leisure", 150.0, "Cut Back on Leisure"),
        AdviceRule::new("Utilities", 300.0, "Consider Energy Saving Tips"),
        AdviceRule::new("Groceries", 500.0, "Optimize Grocery Shopping"),
        AdviceRule::new("Subscriptions", 100.0, "Review and Reduce Subscriptions"),
        AdviceRule::new("Travel", 300.0, "Plan Travel More Efficiently"),
        AdviceRule::new("Clothing", 150.0, "Limit Clothing Purchases"),
    ]
}

/// Labeling scheme, persisted alongside the trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum LabelPolicy {
    /// "Low Savings" when the month's total expenditure reaches the
    /// threshold, "High Savings" otherwise
    GlobalThreshold { threshold: f64 },

    /// One advice tag per rule whose category amount exceeds its threshold;
    /// falls back to "Maintain Good Habits" when nothing fires
    CategoryAdvice { rules: Vec<AdviceRule> },

    /// "Exceeded Budget" when any category's amount exceeds
    /// `historical average * margin`. Categories absent from the average map
    /// have no baseline and never exceed it; whether a first-ever purchase
    /// should instead count as an overrun is an open product question.
    RelativeThreshold { margin: f64 },
}

impl LabelPolicy {
    pub fn global_default() -> Self {
        Self::GlobalThreshold { threshold: 1000.0 }
    }

    pub fn advice_default() -> Self {
        Self::CategoryAdvice {
            rules: default_advice_rules(),
        }
    }

    pub fn relative_default() -> Self {
        Self::RelativeThreshold { margin: 1.10 }
    }

    /// Derive one label per month-row.
    ///
    /// `averages` is only consulted by the relative-threshold policy. The
    /// feature table itself is never mutated; labels travel as a separate
    /// column-of-sets.
    pub fn derive(&self, matrix: &FeatureMatrix, averages: &SpendingAverages) -> Vec<Label> {
        let schema = matrix.schema();
        matrix
            .rows()
            .iter()
            .map(|row| match self {
                Self::GlobalThreshold { threshold } => {
                    let total = row.get(schema, TOTAL_EXPENDITURE).unwrap_or(0.0);
                    if total >= *threshold {
                        vec![LABEL_LOW_SAVINGS.to_string()]
                    } else {
                        vec![LABEL_HIGH_SAVINGS.to_string()]
                    }
                }
                Self::CategoryAdvice { rules } => {
                    let mut tags: Vec<String> = rules
                        .iter()
                        .filter(|rule| {
                            row.get(schema, &amount_column(&rule.category))
                                .is_some_and(|amount| amount > rule.threshold)
                        })
                        .map(|rule| rule.tag.clone())
                        .collect();
                    if tags.is_empty() {
                        tags.push(LABEL_MAINTAIN_HABITS.to_string());
                    }
                    tags
                }
                Self::RelativeThreshold { margin } => {
                    let exceeded = averages.iter().any(|(category, average)| {
                        row.get(schema, &amount_column(category))
                            .is_some_and(|amount| amount > average * margin)
                    });
                    if exceeded {
                        vec![LABEL_EXCEEDED_BUDGET.to_string()]
                    } else {
                        vec![LABEL_WITHIN_BUDGET.to_string()]
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{build_features, FeatureOptions, FeatureSchema};
    use crate::models::{Transaction, TransactionKind};
    use chrono::{TimeZone, Utc};

    fn tx(amount: f64, category: &str, month: u32) -> Transaction {
        Transaction {
            amount,
            date: Utc.with_ymd_and_hms(2024, month, 15, 12, 0, 0).unwrap(),
            category_name: category.to_string(),
            kind: TransactionKind::Expense,
        }
    }

    fn matrix_for(transactions: &[Transaction], vocabulary: &[&str]) -> FeatureMatrix {
        let vocab: Vec<String> = vocabulary.iter().map(|s| s.to_string()).collect();
        let schema = FeatureSchema::canonical(&vocab, FeatureOptions::default());
        build_features(transactions, &schema)
    }

    #[test]
    fn test_global_threshold_splits_on_total_expenditure() {
        let matrix = matrix_for(
            &[tx(600.0, "Groceries", 1), tx(1200.0, "Groceries", 2)],
            &["Groceries"],
        );
        let labels = LabelPolicy::global_default().derive(&matrix, &SpendingAverages::new());

        assert_eq!(labels[0], vec![LABEL_HIGH_SAVINGS.to_string()]);
        assert_eq!(labels[1], vec![LABEL_LOW_SAVINGS.to_string()]);
    }

    #[test]
    fn test_category_advice_fires_named_tag() {
        // Dining Out at 250 is over the 200 rule threshold
        let matrix = matrix_for(
            &[tx(250.0, "Dining Out", 1)],
            &["Dining Out", "Groceries"],
        );
        let labels = LabelPolicy::advice_default().derive(&matrix, &SpendingAverages::new());

        assert_eq!(labels.len(), 1);
        assert!(labels[0].contains(&"Reduce Dining Out".to_string()));
    }

    #[test]
    fn test_category_advice_falls_back_when_nothing_fires() {
        let matrix = matrix_for(&[tx(20.0, "Groceries", 1)], &["Groceries"]);
        let labels = LabelPolicy::advice_default().derive(&matrix, &SpendingAverages::new());

        assert_eq!(labels[0], vec![LABEL_MAINTAIN_HABITS.to_string()]);
    }

    #[test]
    fn test_category_advice_collects_multiple_tags() {
        let matrix = matrix_for(
            &[tx(250.0, "Dining Out", 1), tx(200.0, "Leisure", 1)],
            &["Dining Out", "Leisure"],
        );
        let labels = LabelPolicy::advice_default().derive(&matrix, &SpendingAverages::new());

        assert_eq!(
            labels[0],
            vec!["Reduce Dining Out".to_string(), "Cut Back on Leisure".to_string()]
        );
    }

    #[test]
    fn test_relative_threshold_margin_boundary() {
        let mut averages = SpendingAverages::new();
        averages.insert("Travel".to_string(), 100.0);
        let policy = LabelPolicy::relative_default();

        // 115 > 100 * 1.10 -> exceeded
        let over = matrix_for(&[tx(115.0, "Travel", 1)], &["Travel"]);
        assert_eq!(
            policy.derive(&over, &averages)[0],
            vec![LABEL_EXCEEDED_BUDGET.to_string()]
        );

        // 109 <= 110 -> within
        let under = matrix_for(&[tx(109.0, "Travel", 1)], &["Travel"]);
        assert_eq!(
            policy.derive(&under, &averages)[0],
            vec![LABEL_WITHIN_BUDGET.to_string()]
        );
    }

    #[test]
    fn test_relative_threshold_ignores_categories_without_baseline() {
        // No average recorded for Electronics, so even a large month
        // cannot exceed a baseline
        let matrix = matrix_for(&[tx(900.0, "Electronics", 1)], &["Electronics"]);
        let labels =
            LabelPolicy::relative_default().derive(&matrix, &SpendingAverages::new());

        assert_eq!(labels[0], vec![LABEL_WITHIN_BUDGET.to_string()]);
    }

    #[test]
    fn test_empty_matrix_yields_empty_label_set() {
        let matrix = matrix_for(&[], &["Groceries"]);
        for policy in [
            LabelPolicy::global_default(),
            LabelPolicy::advice_default(),
            LabelPolicy::relative_default(),
        ] {
            assert!(policy.derive(&matrix, &SpendingAverages::new()).is_empty());
        }
    }
}
