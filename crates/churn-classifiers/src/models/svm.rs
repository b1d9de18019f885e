use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::Svm;
use ndarray::{Array1, Array2, Axis};

use crate::config::{ModelConfig, ModelType};
use crate::error::{ChurnError, Result};
use crate::models::classifier_trait::ChurnClassifier;

const NAME: &str = "SVMClassifier";

/// Gaussian-kernel support vector classifier.
pub struct SVMClassifier {
    model: Option<Svm<f64, bool>>,
    params: ModelConfig,
}

impl SVMClassifier {
    pub fn new(params: ModelConfig) -> Self {
        SVMClassifier {
            model: None,
            params,
        }
    }
}

/// Kernel width matching `gamma = 1 / (n_features * var(x))`.
///
/// linfa's Gaussian kernel is `exp(-|a - b|^2 / eps)`, so `eps` is the
/// reciprocal of that gamma.
pub fn scale_kernel_eps(x: &Array2<f64>) -> f64 {
    let var = x.var_axis(Axis(0), 0.0).mean().unwrap_or(1.0);
    let eps = x.ncols() as f64 * var;
    if eps > 0.0 && eps.is_finite() {
        eps
    } else {
        1.0
    }
}

impl ChurnClassifier for SVMClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ChurnError::ShapeMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }

        let ModelType::SVM {
            c,
            gaussian_kernel_eps,
            eps,
        } = &self.params.model_type
        else {
            return Err(ChurnError::model_fit(
                NAME,
                format!("expected ModelType::SVM params, got {:?}", self.params.model_type),
            ));
        };

        let (c_pos, c_neg) = *c;
        let kernel_eps = gaussian_kernel_eps.unwrap_or_else(|| scale_kernel_eps(x));
        log::debug!("{}: C=({}, {}), kernel eps={:.4}", NAME, c_pos, c_neg, kernel_eps);

        let targets = y.mapv(|l| l == 1);
        let dataset = Dataset::new(x.to_owned(), targets);

        let model = Svm::<f64, bool>::params()
            .eps(*eps)
            .pos_neg_weights(c_pos, c_neg)
            .gaussian_kernel(kernel_eps)
            .fit(&dataset)
            .map_err(|e| ChurnError::model_fit(NAME, e))?;

        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ChurnError::NotFitted(NAME.to_string()))?;
        let predictions: Array1<bool> = model.predict(x);
        Ok(predictions.mapv(|p| p as usize))
    }

    fn name(&self) -> &str {
        NAME
    }
}
