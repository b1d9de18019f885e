use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};

use crate::config::{ModelConfig, ModelType};
use crate::error::{ChurnError, Result};
use crate::models::classifier_trait::ChurnClassifier;

const NAME: &str = "LogisticRegressionClassifier";

/// L2-regularised binary logistic regression.
pub struct LogisticRegressionClassifier {
    model: Option<FittedLogisticRegression<f64, usize>>,
    params: ModelConfig,
}

impl LogisticRegressionClassifier {
    pub fn new(params: ModelConfig) -> Self {
        LogisticRegressionClassifier {
            model: None,
            params,
        }
    }
}

impl ChurnClassifier for LogisticRegressionClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ChurnError::ShapeMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }

        let ModelType::LogisticRegression {
            alpha,
            max_iterations,
        } = &self.params.model_type
        else {
            return Err(ChurnError::model_fit(
                NAME,
                format!(
                    "expected ModelType::LogisticRegression params, got {:?}",
                    self.params.model_type
                ),
            ));
        };

        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let model = LogisticRegression::default()
            .alpha(*alpha)
            .max_iterations(*max_iterations)
            .fit(&dataset)
            .map_err(|e| ChurnError::model_fit(NAME, e))?;

        log::debug!("{}: intercept={:.4} params={:?}", NAME, model.intercept(), model.params());

        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ChurnError::NotFitted(NAME.to_string()))?;
        let predictions: Array1<usize> = model.predict(x);
        Ok(predictions)
    }

    fn name(&self) -> &str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_logistic_regression_classifier() {
        let x = array![[-3.0], [-2.0], [-1.5], [-1.0], [1.0], [1.5], [2.0], [3.0]];
        let y = array![0usize, 0, 0, 0, 1, 1, 1, 1];

        let params = ModelConfig::new(
            0.1,
            42,
            ModelType::LogisticRegression {
                alpha: 1.0,
                max_iterations: 100,
            },
        );
        let mut classifier = LogisticRegressionClassifier::new(params);
        classifier.fit(&x, &y).unwrap();

        assert_eq!(classifier.predict(&x).unwrap(), y);
    }

    #[test]
    fn single_class_fails_to_fit() {
        let params = ModelConfig::with_defaults("logistic_regression".parse().unwrap(), 42);
        let mut classifier = LogisticRegressionClassifier::new(params);
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1usize, 1, 1];
        assert!(classifier.fit(&x, &y).is_err());
    }
}
