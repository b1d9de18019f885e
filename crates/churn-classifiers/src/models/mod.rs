pub mod gbdt;
pub mod logistic;
pub mod mlp;
pub mod random_forest;
pub mod svm;

pub mod classifier_trait;
pub mod factory;
