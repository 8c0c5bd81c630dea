//! Model training command

use std::path::Path;

use anyhow::{anyhow, Result};

use super::open_db;
use nestegg_core::{FeatureOptions, LabelPolicy, ModelKind, Trainer, TrainingConfig};

/// Resolve the `--policy` flag to a labeling policy with its defaults
pub fn resolve_policy(name: &str) -> Result<LabelPolicy> {
    match name.to_lowercase().as_str() {
        "global" => Ok(LabelPolicy::global_default()),
        "advice" => Ok(LabelPolicy::advice_default()),
        "relative" => Ok(LabelPolicy::relative_default()),
        _ => Err(anyhow!(
            "Unknown policy '{}' (expected global, advice, or relative)",
            name
        )),
    }
}

pub fn cmd_train(
    db_path: &Path,
    model: &str,
    policy: &str,
    counts: bool,
    output: &Path,
) -> Result<()> {
    let db = open_db(db_path)?;

    let kind: ModelKind = model.parse().map_err(|e: String| anyhow!(e))?;
    let config = TrainingConfig {
        kind,
        policy: resolve_policy(policy)?,
        options: FeatureOptions {
            include_counts: counts,
        },
        ..Default::default()
    };

    println!("Training {} model with '{}' policy...", kind, policy);
    let (artifact, report) = Trainer::with_config(&db, config).run()?;
    artifact.save(output)?;

    println!("Trained on {} month-rows, {} classes", report.samples, report.classes);
    match report.accuracy {
        Some(accuracy) => println!("Holdout accuracy: {:.1}%", accuracy * 100.0),
        None => println!("Holdout accuracy: skipped (too little history)"),
    }
    println!("Model saved to {}", output.display());
    Ok(())
}
