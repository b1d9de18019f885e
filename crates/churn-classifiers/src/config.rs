use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::trainer::{default_roster, ModelSpec};

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub learning_rate: f32,
    pub random_state: u64,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    RandomForest {
        n_estimators: usize,
        max_depth: Option<usize>,
        /// Features drawn per tree; `None` uses round(sqrt(n_features))
        max_features: Option<usize>,
        min_weight_split: f32,
    },
    GBDT {
        max_depth: u32,
        num_boost_round: u32,
        debug: bool,
        training_optimization_level: u8,
        loss_type: String,
    },
    SVM {
        c: (f64, f64),
        /// Gaussian kernel width; `None` derives it from the training data
        gaussian_kernel_eps: Option<f64>,
        eps: f64,
    },
    LogisticRegression {
        alpha: f64,
        max_iterations: u64,
    },
    NeuralNetwork {
        hidden_layer_sizes: Vec<usize>,
        max_epochs: usize,
        batch_size: usize,
        alpha: f64,
        tol: f64,
        n_iter_no_change: usize,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::GBDT {
            max_depth: 3,
            num_boost_round: 100,
            debug: false,
            training_optimization_level: 2,
            loss_type: "LogLikelyhood".to_string(),
        }
    }
}

impl ModelType {
    /// Learning rate the model is tuned for when none is given.
    pub fn default_learning_rate(&self) -> f32 {
        match self {
            ModelType::NeuralNetwork { .. } => 1e-3,
            _ => 0.1,
        }
    }

    /// 100 fully grown trees, round(sqrt(n_features)) features each.
    pub fn random_forest() -> Self {
        ModelType::RandomForest {
            n_estimators: 100,
            max_depth: None,
            max_features: None,
            min_weight_split: 2.0,
        }
    }

    pub fn gbdt() -> Self {
        ModelType::default()
    }

    /// C = 1 with the kernel width taken from the training variance.
    pub fn svm() -> Self {
        ModelType::SVM {
            c: (1.0, 1.0),
            gaussian_kernel_eps: None,
            eps: 1e-3,
        }
    }

    pub fn logistic_regression() -> Self {
        ModelType::LogisticRegression {
            alpha: 1.0,
            max_iterations: 100,
        }
    }

    /// Two hidden layers (100, 50), early stopping after 10 flat epochs.
    pub fn neural_network() -> Self {
        ModelType::NeuralNetwork {
            hidden_layer_sizes: vec![100, 50],
            max_epochs: 1000,
            batch_size: 200,
            alpha: 1e-4,
            tol: 1e-4,
            n_iter_no_change: 10,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random_forest" => Ok(ModelType::random_forest()),
            "gbdt" => Ok(ModelType::gbdt()),
            "svm" => Ok(ModelType::svm()),
            "logistic_regression" => Ok(ModelType::logistic_regression()),
            "neural_network" => Ok(ModelType::neural_network()),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: random_forest, gbdt, svm, \
                 logistic_regression, neural_network",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f32, random_state: u64, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            random_state,
            model_type,
        }
    }

    /// Config with the model type's default learning rate.
    pub fn with_defaults(model_type: ModelType, random_state: u64) -> Self {
        Self::new(model_type.default_learning_rate(), random_state, model_type)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::with_defaults(ModelType::default(), 42)
    }
}

/// Parameters of one end-to-end run.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seed of the synthetic column stream; labels use `seed + 1`
    pub seed: u64,
    pub n_samples: usize,
    pub test_size: f64,
    pub split_seed: u64,
    pub roster: Vec<ModelSpec>,
}

impl PipelineConfig {
    pub fn label_seed(&self) -> u64 {
        self.seed.wrapping_add(1)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_samples: 5000,
            test_size: 0.2,
            split_seed: 42,
            roster: default_roster(42),
        }
    }
}
