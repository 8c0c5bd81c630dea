//! Integration tests for nestegg-core
//!
//! These tests exercise the full import → train → infer workflow.

use nestegg_core::{
    advice, import::import_transactions, inference::reconstruct_rows, labels::LabelPolicy,
    Database, ModelArtifact, ModelKind, Trainer, TrainingConfig, TransactionInput,
};

/// Months with heavy dining-out spending (the advice rule fires above 200)
const HEAVY_MONTHS: [u32; 6] = [2, 3, 6, 8, 11, 12];

/// A year of history where dining-out spending runs hot in some months.
/// Groceries absorb the difference so monthly totals stay constant, and the
/// heavy months are deliberately non-alternating so month-over-month change
/// does not separate the classes on its own.
fn history_csv() -> String {
    let mut csv = String::from("amount,date,category_name,type\n");
    for month in 1..=12u32 {
        let heavy = HEAVY_MONTHS.contains(&month);
        let dining = if heavy { 260.0 } else { 90.0 };
        let groceries = 390.0 - dining;
        csv.push_str(&format!("{dining},2024-{month:02}-12,Dining Out,Expense\n"));
        csv.push_str(&format!("{groceries},2024-{month:02}-05,Groceries,Expense\n"));
        csv.push_str(&format!("45.0,2024-{month:02}-20,Leisure,Expense\n"));
        csv.push_str(&format!("3200.0,2024-{month:02}-28,Salary,Income\n"));
    }
    csv
}

#[test]
fn test_full_import_train_infer_workflow() {
    let db = Database::in_memory().unwrap();

    let stats = import_transactions(&db, history_csv().as_bytes()).unwrap();
    assert_eq!(stats.imported, 48);
    assert_eq!(stats.skipped, 0);

    let config = TrainingConfig {
        kind: ModelKind::DecisionTree,
        policy: LabelPolicy::advice_default(),
        ..Default::default()
    };
    let (artifact, report) = Trainer::with_config(&db, config).run().unwrap();
    assert_eq!(report.samples, 12);
    assert_eq!(report.classes, 2);

    // A new heavy dining-out transaction should come back with the
    // cook-at-home recommendation
    let input = TransactionInput {
        amount: 250.0,
        date: "2025-01-03".to_string(),
        category_name: "Dining Out".to_string(),
        kind: "Expense".to_string(),
    };
    let tx = input.to_transaction().unwrap();
    let rows = reconstruct_rows(&[tx], &artifact);
    let labels = artifact.predict_labels(&rows).unwrap();
    let recommendations = advice::recommendations(&labels);

    assert_eq!(recommendations.len(), 1);
    assert!(
        recommendations[0].contains("cooking at home"),
        "expected dining advice, got: {:?}",
        recommendations
    );
}

#[test]
fn test_unknown_category_still_gets_a_recommendation() {
    let db = Database::in_memory().unwrap();
    import_transactions(&db, history_csv().as_bytes()).unwrap();

    let (artifact, _) = Trainer::with_config(
        &db,
        TrainingConfig {
            kind: ModelKind::DecisionTree,
            ..Default::default()
        },
    )
    .run()
    .unwrap();

    // A category the model has never seen zero-fills instead of erroring,
    // so the request still produces advice
    let input = TransactionInput {
        amount: 999.0,
        date: "2025-01-03".to_string(),
        category_name: "Cryptocurrency".to_string(),
        kind: "Expense".to_string(),
    };
    let rows = reconstruct_rows(&[input.to_transaction().unwrap()], &artifact);
    assert!(rows[0].iter().all(|v| *v == 0.0));

    let labels = artifact.predict_labels(&rows).unwrap();
    let recommendations = advice::recommendations(&labels);
    assert_eq!(recommendations.len(), 1);
}

#[test]
fn test_artifact_survives_process_boundary() {
    let db = Database::in_memory().unwrap();
    import_transactions(&db, history_csv().as_bytes()).unwrap();

    let (artifact, _) = Trainer::with_config(
        &db,
        TrainingConfig {
            kind: ModelKind::DecisionTree,
            ..Default::default()
        },
    )
    .run()
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nestegg_model.json");
    artifact.save(&path).unwrap();

    let loaded = ModelArtifact::load(&path).unwrap();
    assert_eq!(loaded.feature_names(), artifact.feature_names());

    // The reloaded model predicts identically on reconstructed rows
    let input = TransactionInput {
        amount: 250.0,
        date: "2025-02-01".to_string(),
        category_name: "Dining Out".to_string(),
        kind: "Expense".to_string(),
    };
    let tx = input.to_transaction().unwrap();
    let rows = reconstruct_rows(&[tx], &loaded);
    assert_eq!(
        loaded.predict_labels(&rows).unwrap(),
        artifact.predict_labels(&rows).unwrap()
    );
}

#[test]
fn test_relative_policy_end_to_end() {
    let db = Database::in_memory().unwrap();

    // Stable Travel spending around 100, one blowout month
    let mut csv = String::from("amount,date,category_name,type\n");
    for month in 1..=11u32 {
        csv.push_str(&format!("100.0,2024-{month:02}-10,Travel,Expense\n"));
    }
    csv.push_str("300.0,2024-12-10,Travel,Expense\n");
    import_transactions(&db, csv.as_bytes()).unwrap();

    let (artifact, report) = Trainer::with_config(
        &db,
        TrainingConfig {
            kind: ModelKind::DecisionTree,
            policy: LabelPolicy::relative_default(),
            ..Default::default()
        },
    )
    .run()
    .unwrap();

    // Both "Exceeded Budget" and "Within Budget" occur in the history
    assert_eq!(report.classes, 2);
    assert_eq!(artifact.policy, LabelPolicy::relative_default());
}

#[test]
fn test_training_on_empty_database_is_an_error() {
    let db = Database::in_memory().unwrap();
    db.seed_default_categories().unwrap();
    assert!(Trainer::new(&db).run().is_err());
}
