use ndarray::{Array1, Array2};

use crate::error::Result;

/// Contract shared by every model in the bank.
///
/// Labels use the churn convention: 1 for churned, 0 for retained.
pub trait ChurnClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()>;

    /// Predict hard 0/1 labels
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>>;

    /// Per-feature importances summing to 1, for models that expose them.
    fn feature_importances(&self) -> Option<Array1<f64>> {
        None
    }

    /// Human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
