//! Spending-behavior classifier and the persisted model artifact
//!
//! The classifier itself is replaceable: anything with a fit/predict contract
//! over the monthly feature rows works. Two smartcore implementations are
//! provided (decision tree and random forest). What actually crosses process
//! boundaries is the [`ModelArtifact`]: the fitted model together with the
//! feature schema, label policy, and class table it was trained with, so the
//! serving path can reconstruct inputs with the exact training-time layout.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters, SplitCriterion,
};
use tracing::info;

use crate::error::{Error, Result};
use crate::features::FeatureSchema;
use crate::labels::{Label, LabelPolicy};

/// Which classifier backs the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    DecisionTree,
    RandomForest,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DecisionTree => "tree",
            Self::RandomForest => "forest",
        }
    }
}

impl std::str::FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" | "decision_tree" => Ok(Self::DecisionTree),
            "forest" | "random_forest" => Ok(Self::RandomForest),
            _ => Err(format!("Unknown model kind: {}", s)),
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn to_matrix(rows: &[Vec<f64>]) -> DenseMatrix<f64> {
    let nrows = rows.len();
    let ncols = rows.first().map(Vec::len).unwrap_or(0);
    let data: Vec<f64> = rows.iter().flatten().copied().collect();
    DenseMatrix::new(nrows, ncols, data, false)
}

/// A fitted classifier over class indices
#[derive(Debug, Serialize, Deserialize)]
pub enum ClassifierModel {
    DecisionTree(DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>),
    RandomForest(RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>),
}

impl ClassifierModel {
    /// Fit a classifier of the given kind on feature rows and class indices
    pub fn fit(kind: ModelKind, rows: &[Vec<f64>], classes: &[i32]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::Training("cannot fit on an empty feature table".into()));
        }
        if rows.len() != classes.len() {
            return Err(Error::Training(format!(
                "feature rows ({}) and labels ({}) differ in length",
                rows.len(),
                classes.len()
            )));
        }

        let x = to_matrix(rows);
        let y = classes.to_vec();

        match kind {
            ModelKind::DecisionTree => {
                let params = DecisionTreeClassifierParameters::default()
                    .with_max_depth(16)
                    .with_criterion(SplitCriterion::Gini);
                let model = DecisionTreeClassifier::fit(&x, &y, params)
                    .map_err(|e| Error::Training(format!("decision tree fit failed: {}", e)))?;
                Ok(Self::DecisionTree(model))
            }
            ModelKind::RandomForest => {
                let params = RandomForestClassifierParameters::default()
                    .with_n_trees(100)
                    .with_seed(42);
                let model = RandomForestClassifier::fit(&x, &y, params)
                    .map_err(|e| Error::Training(format!("random forest fit failed: {}", e)))?;
                Ok(Self::RandomForest(model))
            }
        }
    }

    /// Predict class indices for feature rows
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let x = to_matrix(rows);
        let predictions = match self {
            Self::DecisionTree(model) => model.predict(&x),
            Self::RandomForest(model) => model.predict(&x),
        };
        predictions.map_err(|e| Error::Model(format!("prediction failed: {}", e)))
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::DecisionTree(_) => ModelKind::DecisionTree,
            Self::RandomForest(_) => ModelKind::RandomForest,
        }
    }
}

/// Encode distinct labels as class indices.
///
/// The original pipeline stringifies each tag set so every distinct
/// combination becomes one class; this does the same explicitly. Classes are
/// sorted by their joined key so the encoding is deterministic across runs.
pub fn encode_classes(labels: &[Label]) -> (Vec<Label>, Vec<i32>) {
    let joined = |label: &Label| label.join("|");

    let distinct: BTreeSet<String> = labels.iter().map(&joined).collect();
    let classes: Vec<Label> = {
        let mut out = Vec::with_capacity(distinct.len());
        for key in &distinct {
            // Recover the tag vec from the first label matching this key
            if let Some(label) = labels.iter().find(|l| &joined(l) == key) {
                out.push(label.clone());
            }
        }
        out
    };

    let indices = labels
        .iter()
        .map(|label| {
            let key = joined(label);
            classes
                .iter()
                .position(|c| joined(c) == key)
                .map(|i| i as i32)
                .unwrap_or(0)
        })
        .collect();

    (classes, indices)
}

/// The trained model plus everything inference needs to rebuild its inputs.
///
/// This is the only artifact that crosses process boundaries; it is written
/// as JSON by the trainer and loaded once at service startup.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema: FeatureSchema,
    pub policy: LabelPolicy,
    /// Class index -> tag set, in the deterministic encoding order
    pub classes: Vec<Label>,
    pub kind: ModelKind,
    pub trained_at: DateTime<Utc>,
    pub samples: usize,
    /// Holdout accuracy, when the training set was large enough to split
    pub accuracy: Option<f64>,
    model: ClassifierModel,
}

impl ModelArtifact {
    pub fn new(
        schema: FeatureSchema,
        policy: LabelPolicy,
        classes: Vec<Label>,
        model: ClassifierModel,
        samples: usize,
        accuracy: Option<f64>,
    ) -> Self {
        let kind = model.kind();
        Self {
            schema,
            policy,
            classes,
            kind,
            trained_at: Utc::now(),
            samples,
            accuracy,
            model,
        }
    }

    /// The ordered feature-column names the model expects as input
    pub fn feature_names(&self) -> &[String] {
        self.schema.columns()
    }

    /// Predict tag sets for already-aligned feature rows
    pub fn predict_labels(&self, rows: &[Vec<f64>]) -> Result<Vec<Label>> {
        let indices = self.model.predict(rows)?;
        indices
            .into_iter()
            .map(|i| {
                self.classes
                    .get(i as usize)
                    .cloned()
                    .ok_or_else(|| Error::Model(format!("predicted unknown class index {}", i)))
            })
            .collect()
    }

    /// Write the artifact as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), self)?;
        info!(path = %path.display(), kind = %self.kind, "model artifact saved");
        Ok(())
    }

    /// Load an artifact written by [`ModelArtifact::save`].
    ///
    /// A missing or corrupt artifact is a configuration error: without the
    /// recorded feature names the serving path cannot guarantee schema
    /// alignment, so callers treat this as fatal at startup.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            Error::Model(format!("cannot open model artifact {}: {}", path.display(), e))
        })?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| {
            Error::Model(format!(
                "cannot parse model artifact {}: {}",
                path.display(),
                e
            ))
        })
    }
}
