//! Model roster and the train/evaluate loop.
//!
//! A roster is plain data: each entry names a model, says whether it consumes
//! the standardized matrices, and carries its hyper-parameters. The trainer
//! runs the entries in order and stops at the first failure.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::{ModelConfig, ModelType};
use crate::data_handling::TrainTestSplit;
use crate::error::Result;
use crate::metrics::ClassificationMetrics;
use crate::models::factory::build_model;
use crate::preprocessing::StandardScaler;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    /// Fit and evaluate on standardized features
    pub requires_scaling: bool,
    pub config: ModelConfig,
}

impl ModelSpec {
    pub fn new(name: &str, requires_scaling: bool, config: ModelConfig) -> Self {
        ModelSpec {
            name: name.to_string(),
            requires_scaling,
            config,
        }
    }
}

/// The five-model comparison roster, every model seeded with `seed`.
pub fn default_roster(seed: u64) -> Vec<ModelSpec> {
    [
        ("Random Forest", ModelType::random_forest(), false),
        ("Gradient Boosting", ModelType::gbdt(), false),
        ("SVM", ModelType::svm(), true),
        ("Logistic Regression", ModelType::logistic_regression(), true),
        ("Neural Network", ModelType::neural_network(), true),
    ]
    .into_iter()
    .map(|(name, model_type, scaled)| {
        ModelSpec::new(name, scaled, ModelConfig::with_defaults(model_type, seed))
    })
    .collect()
}

/// Train/test split plus its standardized counterpart.
///
/// The scaler only ever sees the training partition.
#[derive(Debug, Clone)]
pub struct PreparedSplit {
    pub split: TrainTestSplit,
    pub scaler: StandardScaler,
    pub x_train_scaled: Array2<f64>,
    pub x_test_scaled: Array2<f64>,
}

impl PreparedSplit {
    pub fn new(split: TrainTestSplit) -> Result<Self> {
        let (scaler, x_train_scaled) = StandardScaler::fit_transform(&split.x_train)?;
        let x_test_scaled = scaler.transform(&split.x_test)?;
        Ok(PreparedSplit {
            split,
            scaler,
            x_train_scaled,
            x_test_scaled,
        })
    }

    fn train_matrix(&self, scaled: bool) -> &Array2<f64> {
        if scaled {
            &self.x_train_scaled
        } else {
            &self.split.x_train
        }
    }

    fn test_matrix(&self, scaled: bool) -> &Array2<f64> {
        if scaled {
            &self.x_test_scaled
        } else {
            &self.split.x_test
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelResult {
    pub name: String,
    pub metrics: ClassificationMetrics,
    pub feature_importances: Option<Array1<f64>>,
}

/// Hooks called while the roster runs.
pub trait EvaluationObserver {
    fn on_model_start(&mut self, _spec: &ModelSpec) -> Result<()> {
        Ok(())
    }

    fn on_model_result(&mut self, _result: &ModelResult) -> Result<()> {
        Ok(())
    }
}

impl EvaluationObserver for () {}

pub struct Trainer {
    roster: Vec<ModelSpec>,
}

impl Trainer {
    pub fn new(roster: Vec<ModelSpec>) -> Self {
        Trainer { roster }
    }

    pub fn roster(&self) -> &[ModelSpec] {
        &self.roster
    }

    /// Fit and score every roster entry in order.
    ///
    /// Scaled entries train on `x_train_scaled` and are scored on
    /// `x_test_scaled`; the others use the raw matrices.
    pub fn evaluate(
        &self,
        data: &PreparedSplit,
        observer: &mut dyn EvaluationObserver,
    ) -> Result<Vec<ModelResult>> {
        let mut results = Vec::with_capacity(self.roster.len());

        for spec in self.roster.iter() {
            observer.on_model_start(spec)?;
            log::info!("Training {} ({:?})", spec.name, spec.config.model_type);

            let mut model = build_model(&spec.config);
            model.fit(data.train_matrix(spec.requires_scaling), &data.split.y_train)?;
            let y_pred = model.predict(data.test_matrix(spec.requires_scaling))?;

            let metrics = ClassificationMetrics::from_labels(&data.split.y_test, &y_pred)?;
            let result = ModelResult {
                name: spec.name.clone(),
                metrics,
                feature_importances: model.feature_importances(),
            };

            log::debug!("{} ({}) metrics: {:?}", spec.name, model.name(), metrics);

            observer.on_model_result(&result)?;
            results.push(result);
        }

        Ok(results)
    }
}
