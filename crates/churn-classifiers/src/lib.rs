//! churn-classifiers: synthetic telecom churn data and a small model bank.
//!
//! This crate generates a synthetic customer table, draws churn labels from an
//! additive risk heuristic, encodes and standardizes the features, and
//! compares five classifiers (random forest, gradient boosting, kernel SVM,
//! logistic regression and a feed-forward network) on a stratified hold-out
//! split, printing a plain-text report.
//!
//! Model fitting is delegated to `linfa`, `gbdt` and `candle`; the modules here
//! hold the data generation, preprocessing glue, evaluator loop and report.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod labels;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod report;
pub mod synthetic;
pub mod trainer;
