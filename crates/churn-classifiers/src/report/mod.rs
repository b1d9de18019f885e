pub mod console;

pub use console::{best_model, rank_feature_importance, ConsoleReport};
