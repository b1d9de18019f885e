use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::{Array1, Array2};

use crate::config::{ModelConfig, ModelType};
use crate::error::{ChurnError, Result};
use crate::models::classifier_trait::ChurnClassifier;

const NAME: &str = "GBDTClassifier";

/// Gradient Boosting Decision Tree (GBDT) classifier
pub struct GBDTClassifier {
    model: Option<GBDT>,
    params: ModelConfig,
}

impl GBDTClassifier {
    pub fn new(params: ModelConfig) -> Self {
        GBDTClassifier {
            model: None,
            params,
        }
    }
}

fn to_data_vec(x: &Array2<f64>, y: Option<&Array1<usize>>) -> DataVec {
    let mut data = DataVec::with_capacity(x.nrows());
    for (i, row) in x.outer_iter().enumerate() {
        let features: Vec<f32> = row.iter().map(|&v| v as f32).collect();
        // LogLikelyhood loss expects labels in {-1, 1}
        let label = match y {
            Some(y) if y[i] == 1 => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        };
        data.push(Data::new_training_data(features, 1.0, label, None));
    }
    data
}

impl ChurnClassifier for GBDTClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ChurnError::ShapeMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }

        match &self.params.model_type {
            ModelType::GBDT {
                max_depth,
                num_boost_round,
                debug,
                training_optimization_level,
                loss_type,
            } => {
                let mut config = Config::new();

                config.set_feature_size(x.ncols());
                config.set_shrinkage(self.params.learning_rate);
                config.set_max_depth(*max_depth);
                config.set_iterations(*num_boost_round as usize);
                config.set_debug(*debug);
                config.set_training_optimization_level(*training_optimization_level);
                config.set_loss(loss_type);

                let mut gbdt = GBDT::new(&config);
                let mut train_x = to_data_vec(x, Some(y));
                gbdt.fit(&mut train_x);

                self.model = Some(gbdt);
                Ok(())
            }
            other => Err(ChurnError::model_fit(
                NAME,
                format!("expected ModelType::GBDT params, got {:?}", other),
            )),
        }
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ChurnError::NotFitted(NAME.to_string()))?;
        let test_x = to_data_vec(x, None);
        let probabilities = model.predict(&test_x);
        Ok(probabilities
            .iter()
            .map(|&p| if p > 0.5 { 1 } else { 0 })
            .collect())
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
    fn test_gbdt_classifier() {
        // Second feature perfectly separates the classes
        let x = array![
            [0.1, 1.0, 5.0],
            [0.4, -1.0, 5.0],
            [0.6, 1.0, 5.0],
            [0.9, -1.0, 5.0],
            [1.2, 1.0, 5.0],
            [1.5, -1.0, 5.0],
            [1.8, 1.0, 5.0],
            [2.1, -1.0, 5.0],
        ];
        let y = array![1usize, 0, 1, 0, 1, 0, 1, 0];

        let params = ModelConfig::new(
            0.1,
            42,
            ModelType::GBDT {
                max_depth: 3,
                num_boost_round: 20,
                debug: false,
                training_optimization_level: 2,
                loss_type: "LogLikelyhood".to_string(),
            },
        );

        let mut classifier = GBDTClassifier::new(params);
        classifier.fit(&x, &y).unwrap();

        let predictions = classifier.predict(&x).unwrap();
        assert_eq!(predictions, y);
    }

    #[test]
    fn predict_before_fit_errors() {
        let classifier = GBDTClassifier::new(ModelConfig::default());
        let x = array![[1.0, 2.0]];
        assert!(matches!(classifier.predict(&x), Err(ChurnError::NotFitted(_))));
    }
}
