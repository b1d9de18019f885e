//! End-to-end run: generate, label, encode, split, scale, train, report.

use std::io::Write;

use anyhow::{Context, Result};

use crate::config::PipelineConfig;
use crate::data_handling::train_test_split;
use crate::labels::{risk_tier_summary, synthesize_labels};
use crate::preprocessing::encode_features;
use crate::report::{best_model, rank_feature_importance, ConsoleReport};
use crate::synthetic::generate_dataset;
use crate::trainer::{ModelResult, PreparedSplit, Trainer};

/// Structured view of what the report printed.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub dataset_size: usize,
    pub churn_rate: f64,
    /// One entry per roster model, in training order
    pub results: Vec<ModelResult>,
    /// Importances of the first model exposing them, highest first
    pub feature_importance: Vec<(String, f64)>,
    pub best_model: Option<String>,
}

pub fn run_pipeline<W: Write>(config: &PipelineConfig, out: W) -> Result<PipelineOutcome> {
    let mut report = ConsoleReport::new(out);

    log::info!(
        "Generating {} synthetic customers (seed {})",
        config.n_samples,
        config.seed
    );
    let customers = generate_dataset(config.seed, config.n_samples)
        .context("Failed to generate synthetic customers")?;
    let labeled = synthesize_labels(customers, config.label_seed())
        .context("Failed to synthesize churn labels")?;

    let dataset_size = labeled.len();
    let churn_rate = labeled.churn_rate();
    report.dataset_summary(dataset_size, churn_rate)?;

    let (encoded, _encoders) = encode_features(&labeled).context("Failed to encode features")?;
    let split = train_test_split(&encoded, config.test_size, config.split_seed)
        .context("Failed to split dataset")?;
    let prepared = PreparedSplit::new(split).context("Failed to scale features")?;

    report.training_header()?;
    let trainer = Trainer::new(config.roster.clone());
    let results = trainer
        .evaluate(&prepared, &mut report)
        .context("Model training failed")?;

    report.summary_table(&results)?;
    report.best_model(&results)?;

    let importance_source = results.iter().find(|r| r.feature_importances.is_some());
    let feature_importance = importance_source
        .and_then(|r| r.feature_importances.as_ref())
        .map(|imp| rank_feature_importance(&encoded.feature_names, imp))
        .unwrap_or_default();
    let importance_name = importance_source
        .map(|r| r.name.as_str())
        .unwrap_or("Random Forest");
    report.feature_importance(importance_name, &feature_importance)?;

    report.risk_tiers(&risk_tier_summary(&labeled))?;
    report.key_insights()?;
    report.closing(dataset_size, churn_rate)?;

    log::info!("Evaluated {} models on {} customers", results.len(), dataset_size);

    Ok(PipelineOutcome {
        dataset_size,
        churn_rate,
        best_model: best_model(&results).map(|r| r.name.clone()),
        results,
        feature_importance,
    })
}
