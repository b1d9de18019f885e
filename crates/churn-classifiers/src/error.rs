use std::error::Error;
use std::fmt;

/// Errors raised while generating, preparing or modelling churn data
#[derive(Debug)]
pub enum ChurnError {
    /// A categorical weight table cannot be sampled from
    InvalidWeights { column: &'static str, reason: String },
    InvalidProbability(f64),
    EmptyDataset,
    /// Test fraction outside the open interval (0, 1)
    InvalidTestSize(f64),
    /// A class has too few rows to appear in both partitions
    TooFewMembers { class: usize, count: usize },
    UnseenCategory { column: String, value: String },
    ShapeMismatch { expected: usize, found: usize },
    NotFitted(String),
    ModelFit { model: String, reason: String },
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChurnError>;

impl ChurnError {
    pub(crate) fn model_fit(model: &str, reason: impl fmt::Display) -> Self {
        ChurnError::ModelFit {
            model: model.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ChurnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChurnError::InvalidWeights { column, reason } => {
                write!(f, "Invalid sampling weights for column '{}': {}", column, reason)
            }
            ChurnError::InvalidProbability(p) => {
                write!(f, "Churn probability {} is outside [0, 1]", p)
            }
            ChurnError::EmptyDataset => write!(f, "Dataset contains no samples"),
            ChurnError::InvalidTestSize(size) => {
                write!(f, "test_size must be in (0, 1), got {}", size)
            }
            ChurnError::TooFewMembers { class, count } => write!(
                f,
                "Class {} has only {} member(s); stratified splitting needs at least 2",
                class, count
            ),
            ChurnError::UnseenCategory { column, value } => {
                write!(f, "Value '{}' was not seen when fitting the '{}' encoder", value, column)
            }
            ChurnError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {}, found {}", expected, found)
            }
            ChurnError::NotFitted(model) => write!(f, "{} must be fitted before predicting", model),
            ChurnError::ModelFit { model, reason } => write!(f, "{} failed: {}", model, reason),
            ChurnError::Io(e) => write!(f, "Failed to write report: {}", e),
        }
    }
}

impl Error for ChurnError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChurnError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChurnError {
    fn from(e: std::io::Error) -> Self {
        ChurnError::Io(e)
    }
}
