//! Nestegg Core Library
//!
//! Shared functionality for the Nestegg savings recommendation engine:
//! - SQLite transaction store access
//! - CSV transaction history import
//! - Monthly per-category feature engineering with a canonical schema
//! - Spending-average statistics and pluggable labeling policies
//! - Decision tree / random forest classifiers behind a fit/predict seam
//! - Inference-time feature reconstruction aligned to the trained schema
//! - Label-to-advice mapping

pub mod advice;
pub mod classifier;
pub mod db;
pub mod error;
pub mod features;
pub mod import;
pub mod inference;
pub mod labels;
pub mod models;
pub mod stats;
pub mod training;

pub use classifier::{encode_classes, ClassifierModel, ModelArtifact, ModelKind};
pub use db::Database;
pub use error::{Error, Result};
pub use features::{build_features, FeatureMatrix, FeatureOptions, FeatureSchema, MonthlyRow};
pub use import::{import_transactions, parse_csv, ImportStats};
pub use inference::{align_row, reconstruct_rows};
pub use labels::{AdviceRule, Label, LabelPolicy};
pub use models::{
    month_bucket, parse_flexible_date, Category, NewTransaction, Transaction, TransactionInput,
    TransactionKind,
};
pub use stats::{average_monthly_spending, SpendingAverages};
pub use training::{Trainer, TrainingConfig, TrainingReport};
