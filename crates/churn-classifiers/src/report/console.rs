use std::io::Write;

use ndarray::Array1;

use crate::error::Result;
use crate::labels::RiskTierSummary;
use crate::trainer::{EvaluationObserver, ModelResult, ModelSpec};

const RULE_WIDTH: usize = 60;

const KEY_INSIGHTS: [&str; 5] = [
    "1. Month-to-month contracts show significantly higher churn rates",
    "2. Customers with tenure < 12 months are at highest risk",
    "3. Tech support availability is a strong retention factor",
    "4. High monthly charges correlate with increased churn probability",
    "5. Gradient Boosting and Neural Networks show best performance",
];

/// Model with the highest F1; the first one wins a tie.
pub fn best_model(results: &[ModelResult]) -> Option<&ModelResult> {
    results.iter().fold(None, |best: Option<&ModelResult>, r| match best {
        Some(b) if r.metrics.f1 <= b.metrics.f1 => Some(b),
        _ => Some(r),
    })
}

/// Pair importances with feature names, highest first.
pub fn rank_feature_importance(names: &[String], importances: &Array1<f64>) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = names
        .iter()
        .cloned()
        .zip(importances.iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// Plain-text report written section by section.
///
/// Progress lines are flushed as soon as they are written, so a buffered
/// writer still shows each model's metrics when its evaluation finishes.
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        ConsoleReport { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn banner(&mut self, title: &str) -> Result<()> {
        writeln!(self.out, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.out, "{}", title)?;
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        Ok(())
    }

    pub fn dataset_summary(&mut self, n_samples: usize, churn_rate: f64) -> Result<()> {
        writeln!(self.out, "Dataset created with {} samples", n_samples)?;
        writeln!(self.out, "Churn rate: {:.2}%", churn_rate * 100.0)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn training_header(&mut self) -> Result<()> {
        self.banner("MODEL TRAINING AND EVALUATION RESULTS")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn summary_table(&mut self, results: &[ModelResult]) -> Result<()> {
        self.banner("SUMMARY - MODEL PERFORMANCE COMPARISON")?;
        writeln!(
            self.out,
            "{:<20} {:<10} {:<10} {:<10} {:<10}",
            "Model", "Accuracy", "Precision", "Recall", "F1 Score"
        )?;
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        for r in results {
            writeln!(
                self.out,
                "{:<20} {:<10.3} {:<10.3} {:<10.3} {:<10.3}",
                r.name, r.metrics.accuracy, r.metrics.precision, r.metrics.recall, r.metrics.f1
            )?;
        }
        Ok(())
    }

    pub fn best_model(&mut self, results: &[ModelResult]) -> Result<()> {
        if let Some(best) = best_model(results) {
            writeln!(
                self.out,
                "\nBest performing model: {} (F1 Score: {:.3})",
                best.name, best.metrics.f1
            )?;
        }
        Ok(())
    }

    pub fn feature_importance(
        &mut self,
        model_name: &str,
        ranking: &[(String, f64)],
    ) -> Result<()> {
        self.banner(&format!("FEATURE IMPORTANCE ({})", model_name))?;
        for (feature, importance) in ranking {
            writeln!(self.out, "{:<25} {:.3}", feature, importance)?;
        }
        Ok(())
    }

    pub fn risk_tiers(&mut self, tiers: &[RiskTierSummary]) -> Result<()> {
        self.banner("CHURN RISK TIERS")?;
        writeln!(self.out, "{:<10} {:<12} {:<10}", "Tier", "Customers", "Churn Rate")?;
        for tier in tiers {
            writeln!(
                self.out,
                "{:<10} {:<12} {:.1}%",
                tier.level.label(),
                tier.customers,
                tier.churn_rate() * 100.0
            )?;
        }
        Ok(())
    }

    pub fn key_insights(&mut self) -> Result<()> {
        self.banner("KEY INSIGHTS")?;
        for line in KEY_INSIGHTS {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    pub fn closing(&mut self, n_samples: usize, churn_rate: f64) -> Result<()> {
        writeln!(self.out, "\nTraining completed successfully!")?;
        writeln!(self.out, "Dataset size: {} customers", n_samples)?;
        writeln!(self.out, "Overall churn rate: {:.1}%", churn_rate * 100.0)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> EvaluationObserver for ConsoleReport<W> {
    fn on_model_start(&mut self, spec: &ModelSpec) -> Result<()> {
        writeln!(self.out, "\nTraining {}...", spec.name)?;
        self.out.flush()?;
        Ok(())
    }

    fn on_model_result(&mut self, result: &ModelResult) -> Result<()> {
        let m = &result.metrics;
        writeln!(self.out, "{} Results:", result.name)?;
        writeln!(self.out, "  Accuracy:  {:.3}", m.accuracy)?;
        writeln!(self.out, "  Precision: {:.3}", m.precision)?;
        writeln!(self.out, "  Recall:    {:.3}", m.recall)?;
        writeln!(self.out, "  F1 Score:  {:.3}", m.f1)?;
        self.out.flush()?;
        Ok(())
    }
}
