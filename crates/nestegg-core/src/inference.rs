//! Inference-time feature reconstruction
//!
//! New transactions arrive with almost no context: typically a single amount
//! and category, no history. Each one is run through the same feature builder
//! the trainer used (one transaction, one month-row), then the row is aligned
//! to the exact column list recorded in the model artifact. Anything the
//! reconstruction did not produce — unknown categories, columns the artifact
//! expects that the row lacks — fails closed to a zero fill rather than an
//! error, keeping the service available on malformed or out-of-vocabulary
//! input. That tradeoff is deliberate and covered by tests.

use crate::classifier::ModelArtifact;
use crate::features::{build_features, FeatureSchema};
use crate::models::Transaction;

/// Align one row's values from `schema` order onto an expected column list.
///
/// Columns the schema does not carry are zero-filled; columns it carries
/// under a different position are moved. The output length always equals
/// `expected.len()`.
pub fn align_row(schema: &FeatureSchema, values: &[f64], expected: &[String]) -> Vec<f64> {
    expected
        .iter()
        .map(|column| {
            schema
                .index_of(column)
                .and_then(|i| values.get(i))
                .copied()
                .unwrap_or(0.0)
        })
        .collect()
}

/// Reconstruct one feature row per incoming transaction, aligned to the
/// artifact's expected input schema.
///
/// Each transaction becomes its own single-row table: percent-of-spend is
/// computed against that row's own context (100% for the one populated
/// category) and monthly change is always 0 because there is no history to
/// compare against.
pub fn reconstruct_rows(transactions: &[Transaction], artifact: &ModelArtifact) -> Vec<Vec<f64>> {
    let schema = &artifact.schema;
    let expected = artifact.feature_names();

    transactions
        .iter()
        .map(|tx| {
            let matrix = build_features(std::slice::from_ref(tx), schema);
            match matrix.rows().first() {
                Some(row) => align_row(schema, &row.values, expected),
                // A transaction always buckets into some month, but fail
                // closed to an all-zero row rather than dropping the request
                None => vec![0.0; expected.len()],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{encode_classes, ClassifierModel, ModelArtifact, ModelKind};
    use crate::features::{amount_column, pct_column, FeatureOptions, TOTAL_EXPENDITURE};
    use crate::labels::LabelPolicy;
    use crate::models::TransactionKind;
    use chrono::{TimeZone, Utc};

    fn tx(amount: f64, category: &str) -> Transaction {
        Transaction {
            amount,
            date: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
            category_name: category.to_string(),
            kind: TransactionKind::Expense,
        }
    }

    fn test_artifact(vocabulary: &[&str]) -> ModelArtifact {
        let vocab: Vec<String> = vocabulary.iter().map(|s| s.to_string()).collect();
        let schema = FeatureSchema::canonical(&vocab, FeatureOptions::default());
        let width = schema.len();

        // Two dummy classes so the tree has something to split on
        let rows = vec![vec![0.0; width], vec![1000.0; width]];
        let labels = vec![
            vec!["Maintain Good Habits".to_string()],
            vec!["Reduce Dining Out".to_string()],
        ];
        let (classes, indices) = encode_classes(&labels);
        let model = ClassifierModel::fit(ModelKind::DecisionTree, &rows, &indices).unwrap();

        ModelArtifact::new(schema, LabelPolicy::advice_default(), classes, model, 2, None)
    }

    #[test]
    fn test_single_transaction_zero_fill() {
        let artifact = test_artifact(&["Dining Out", "Groceries", "Travel"]);
        let rows = reconstruct_rows(&[tx(250.0, "Dining Out")], &artifact);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.len(), artifact.feature_names().len());

        let schema = &artifact.schema;
        let value = |column: &str| {
            schema
                .index_of(column)
                .map(|i| row[i])
                .expect("column present in schema")
        };

        // Exactly one amount column is populated, all others are 0
        assert_eq!(value(&amount_column("Dining Out")), 250.0);
        assert_eq!(value(&amount_column("Groceries")), 0.0);
        assert_eq!(value(&amount_column("Travel")), 0.0);
        assert_eq!(value(TOTAL_EXPENDITURE), 250.0);

        // Percent-of-spend against the row's own context
        assert_eq!(value(&pct_column("Dining Out")), 100.0);
        assert_eq!(value(&pct_column("Groceries")), 0.0);
    }

    #[test]
    fn test_unknown_category_zero_fills_instead_of_raising() {
        let artifact = test_artifact(&["Groceries"]);
        let rows = reconstruct_rows(&[tx(75.0, "Cryptocurrency")], &artifact);

        assert_eq!(rows.len(), 1);
        assert!(rows[0].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_multiple_transactions_become_independent_rows() {
        let artifact = test_artifact(&["Dining Out", "Groceries"]);
        let rows = reconstruct_rows(
            &[tx(40.0, "Groceries"), tx(250.0, "Dining Out")],
            &artifact,
        );

        assert_eq!(rows.len(), 2);
        let schema = &artifact.schema;
        let groceries = schema.index_of(&amount_column("Groceries")).unwrap();
        let dining = schema.index_of(&amount_column("Dining Out")).unwrap();

        assert_eq!(rows[0][groceries], 40.0);
        assert_eq!(rows[0][dining], 0.0);
        assert_eq!(rows[1][dining], 250.0);
        assert_eq!(rows[1][groceries], 0.0);
    }

    #[test]
    fn test_align_row_zero_fills_foreign_columns() {
        let schema = FeatureSchema::canonical(
            &["Groceries".to_string()],
            FeatureOptions::default(),
        );
        let values: Vec<f64> = (0..schema.len()).map(|i| i as f64 + 1.0).collect();

        // Expected list renames one column and adds one the schema lacks
        let expected = vec![
            amount_column("Groceries"),
            "renamed_column".to_string(),
            amount_column("Travel"),
        ];
        let aligned = align_row(&schema, &values, &expected);

        assert_eq!(aligned.len(), 3);
        let groceries = schema.index_of(&amount_column("Groceries")).unwrap();
        assert_eq!(aligned[0], values[groceries]);
        assert_eq!(aligned[1], 0.0);
        assert_eq!(aligned[2], 0.0);
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        let artifact = test_artifact(&["Groceries"]);
        assert!(reconstruct_rows(&[], &artifact).is_empty());
    }
}
