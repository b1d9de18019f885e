use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::ChurnClassifier;
use crate::models::gbdt::GBDTClassifier;
use crate::models::logistic::LogisticRegressionClassifier;
use crate::models::mlp::MLPClassifier;
use crate::models::random_forest::RandomForestClassifier;
use crate::models::svm::SVMClassifier;

/// Build a boxed classifier model from a `ModelConfig`.
pub fn build_model(params: &ModelConfig) -> Box<dyn ChurnClassifier> {
    match params.model_type {
        ModelType::RandomForest { .. } => Box::new(RandomForestClassifier::new(params.clone())),
        ModelType::GBDT { .. } => Box::new(GBDTClassifier::new(params.clone())),
        ModelType::SVM { .. } => Box::new(SVMClassifier::new(params.clone())),
        ModelType::LogisticRegression { .. } => {
            Box::new(LogisticRegressionClassifier::new(params.clone()))
        }
        ModelType::NeuralNetwork { .. } => Box::new(MLPClassifier::new(params.clone())),
    }
}
