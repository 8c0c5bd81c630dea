//! Training orchestration
//!
//! One-shot batch pipeline: extract the transaction history, compute spending
//! averages, build the monthly feature table, derive labels under the
//! configured policy, fit the classifier, and persist the artifact. A
//! deterministic holdout split reports accuracy before the final fit on the
//! full dataset.

use tracing::{info, warn};

use crate::classifier::{encode_classes, ClassifierModel, ModelArtifact, ModelKind};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::features::{build_features, FeatureOptions, FeatureSchema};
use crate::labels::LabelPolicy;
use crate::stats::average_monthly_spending;

/// Training configuration
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub kind: ModelKind,
    pub policy: LabelPolicy,
    pub options: FeatureOptions,
    /// Fraction of month-rows held out for the accuracy estimate
    pub holdout: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::RandomForest,
            policy: LabelPolicy::advice_default(),
            options: FeatureOptions::default(),
            holdout: 0.3,
        }
    }
}

/// Summary of a completed training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Month-rows the final model was fitted on
    pub samples: usize,
    /// Distinct label combinations
    pub classes: usize,
    /// Holdout accuracy, when enough rows were available to split
    pub accuracy: Option<f64>,
}

/// Trainer over a transaction store
pub struct Trainer<'a> {
    db: &'a Database,
    config: TrainingConfig,
}

impl<'a> Trainer<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            config: TrainingConfig::default(),
        }
    }

    pub fn with_config(db: &'a Database, config: TrainingConfig) -> Self {
        Self { db, config }
    }

    /// Run the full pipeline and return the fitted artifact
    pub fn run(&self) -> Result<(ModelArtifact, TrainingReport)> {
        let transactions = self.db.fetch_transactions()?;
        if transactions.is_empty() {
            return Err(Error::Training(
                "no transactions in the store; import a history first".into(),
            ));
        }

        // The vocabulary is fixed at training time: the category table when
        // populated, otherwise the distinct categories seen in the history
        let mut vocabulary = self.db.category_names()?;
        if vocabulary.is_empty() {
            vocabulary = transactions
                .iter()
                .map(|tx| tx.category_name.clone())
                .collect();
        }

        let averages = average_monthly_spending(&transactions);
        let schema = FeatureSchema::canonical(&vocabulary, self.config.options);
        let matrix = build_features(&transactions, &schema);
        if matrix.is_empty() {
            return Err(Error::Training("feature table came out empty".into()));
        }

        let labels = self.config.policy.derive(&matrix, &averages);
        let (classes, indices) = encode_classes(&labels);
        let rows = matrix.to_rows();

        info!(
            months = rows.len(),
            features = schema.len(),
            classes = classes.len(),
            "feature table ready"
        );

        let accuracy = self.holdout_accuracy(&rows, &indices)?;
        if let Some(acc) = accuracy {
            info!(accuracy = acc, "holdout evaluation");
        } else {
            warn!("too few month-rows for a holdout split, skipping evaluation");
        }

        let model = ClassifierModel::fit(self.config.kind, &rows, &indices)?;
        let report = TrainingReport {
            samples: rows.len(),
            classes: classes.len(),
            accuracy,
        };
        let artifact = ModelArtifact::new(
            schema,
            self.config.policy.clone(),
            classes,
            model,
            report.samples,
            accuracy,
        );

        Ok((artifact, report))
    }

    /// Fit on an interleaved train split and score on the rest.
    ///
    /// The split is deterministic (row index stride) so repeated runs over
    /// the same store report the same number.
    fn holdout_accuracy(&self, rows: &[Vec<f64>], indices: &[i32]) -> Result<Option<f64>> {
        let stride = 10usize;
        let holdout_every = (self.config.holdout * stride as f64).round() as usize;
        if holdout_every == 0 || rows.len() < 4 {
            return Ok(None);
        }

        let mut train_x = Vec::new();
        let mut train_y = Vec::new();
        let mut eval_x = Vec::new();
        let mut eval_y = Vec::new();
        for (i, (row, class)) in rows.iter().zip(indices).enumerate() {
            if i % stride < holdout_every {
                eval_x.push(row.clone());
                eval_y.push(*class);
            } else {
                train_x.push(row.clone());
                train_y.push(*class);
            }
        }

        if train_x.is_empty() || eval_x.is_empty() {
            return Ok(None);
        }

        let model = ClassifierModel::fit(self.config.kind, &train_x, &train_y)?;
        let predictions = model.predict(&eval_x)?;
        let correct = predictions
            .iter()
            .zip(&eval_y)
            .filter(|(p, t)| p == t)
            .count();

        Ok(Some(correct as f64 / eval_y.len() as f64))
    }
}
