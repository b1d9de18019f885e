//! Binary classification metrics with churn (label 1) as the positive class.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{ChurnError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    pub fn from_labels(y_true: &Array1<usize>, y_pred: &Array1<usize>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(ChurnError::ShapeMismatch {
                expected: y_true.len(),
                found: y_pred.len(),
            });
        }

        let mut counts = ConfusionCounts::default();
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t == 1, p == 1) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (false, false) => counts.true_negatives += 1,
                (true, false) => counts.false_negatives += 1,
            }
        }
        Ok(counts)
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

/// Ratio that falls back to 0 when the denominator is empty.
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassificationMetrics {
    pub fn from_counts(counts: &ConfusionCounts) -> Self {
        let accuracy = ratio(counts.true_positives + counts.true_negatives, counts.total());
        let precision = ratio(
            counts.true_positives,
            counts.true_positives + counts.false_positives,
        );
        let recall = ratio(counts.true_positives, counts.true_positives + counts.false_negatives);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        ClassificationMetrics {
            accuracy,
            precision,
            recall,
            f1,
        }
    }

    pub fn from_labels(y_true: &Array1<usize>, y_pred: &Array1<usize>) -> Result<Self> {
        let counts = ConfusionCounts::from_labels(y_true, y_pred)?;
        Ok(Self::from_counts(&counts))
    }
}
