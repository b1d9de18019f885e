//! Bagged decision-tree ensemble.
//!
//! Each tree is a `linfa_trees::DecisionTree` fit on a bootstrap sample of the
//! rows restricted to a random subset of the features. Tree seeds are drawn
//! from the model's seed before fitting, so the parallel fit gives the same
//! forest on every run.

use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::{ModelConfig, ModelType};
use crate::error::{ChurnError, Result};
use crate::models::classifier_trait::ChurnClassifier;

const NAME: &str = "RandomForestClassifier";

struct ForestMember {
    tree: DecisionTree<f64, usize>,
    /// Columns of the full design matrix this tree was fit on
    features: Vec<usize>,
}

/// Random-subspace forest: every tree sees one feature subset drawn once per
/// tree, not a fresh subset at each split.
pub struct RandomForestClassifier {
    trees: Vec<ForestMember>,
    n_features: usize,
    params: ModelConfig,
}

impl RandomForestClassifier {
    pub fn new(params: ModelConfig) -> Self {
        RandomForestClassifier {
            trees: Vec::new(),
            n_features: 0,
            params,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Default features per tree: round(sqrt(n_features)), at least one.
pub fn default_max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt().round() as usize).clamp(1, n_features.max(1))
}

fn fit_member(
    x: &Array2<f64>,
    y: &Array1<usize>,
    seed: u64,
    n_subspace: usize,
    max_depth: Option<usize>,
    min_weight_split: f32,
) -> Result<ForestMember> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = x.nrows();

    let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
    let mut features = sample(&mut rng, x.ncols(), n_subspace).into_vec();
    features.sort_unstable();

    let records = x.select(Axis(0), &rows).select(Axis(1), &features);
    let targets = y.select(Axis(0), &rows);
    let dataset = Dataset::new(records, targets);

    let tree = DecisionTree::params()
        .split_quality(SplitQuality::Gini)
        .max_depth(max_depth)
        .min_weight_split(min_weight_split)
        .fit(&dataset)
        .map_err(|e| ChurnError::model_fit(NAME, e))?;

    Ok(ForestMember { tree, features })
}

impl ChurnClassifier for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ChurnError::ShapeMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(ChurnError::EmptyDataset);
        }

        let ModelType::RandomForest {
            n_estimators,
            max_depth,
            max_features,
            min_weight_split,
        } = &self.params.model_type
        else {
            return Err(ChurnError::model_fit(
                NAME,
                format!(
                    "expected ModelType::RandomForest params, got {:?}",
                    self.params.model_type
                ),
            ));
        };

        let n_features = x.ncols();
        let n_subspace = max_features
            .unwrap_or_else(|| default_max_features(n_features))
            .clamp(1, n_features);

        let mut seeder = StdRng::seed_from_u64(self.params.random_state);
        let seeds: Vec<u64> = (0..*n_estimators).map(|_| seeder.gen()).collect();

        log::debug!(
            "{}: fitting {} trees on {} rows with {} of {} features each",
            NAME,
            n_estimators,
            x.nrows(),
            n_subspace,
            n_features
        );

        let trees = seeds
            .par_iter()
            .map(|&seed| fit_member(x, y, seed, n_subspace, *max_depth, *min_weight_split))
            .collect::<Result<Vec<_>>>()?;

        self.trees = trees;
        self.n_features = n_features;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        if self.trees.is_empty() {
            return Err(ChurnError::NotFitted(NAME.to_string()));
        }
        if x.ncols() != self.n_features {
            return Err(ChurnError::ShapeMismatch {
                expected: self.n_features,
                found: x.ncols(),
            });
        }

        let mut votes = Array1::<usize>::zeros(x.nrows());
        for member in self.trees.iter() {
            let subset = x.select(Axis(1), &member.features);
            let predictions: Array1<usize> = member.tree.predict(&subset);
            votes += &predictions;
        }

        // Majority vote, ties go to the negative class
        let n_trees = self.trees.len();
        Ok(votes.mapv(|v| if 2 * v > n_trees { 1 } else { 0 }))
    }

    fn feature_importances(&self) -> Option<Array1<f64>> {
        if self.trees.is_empty() {
            return None;
        }

        let mut importances = Array1::<f64>::zeros(self.n_features);
        for member in self.trees.iter() {
            for (local, value) in member.tree.feature_importance().into_iter().enumerate() {
                if value.is_finite() && value > 0.0 {
                    importances[member.features[local]] += value;
                }
            }
        }

        let total = importances.sum();
        if total > 0.0 {
            importances /= total;
        }
        Some(importances)
    }

    fn name(&self) -> &str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy_params(n_estimators: usize) -> ModelConfig {
        ModelConfig::new(
            0.1,
            7,
            ModelType::RandomForest {
                n_estimators,
                max_depth: None,
                max_features: Some(2),
                min_weight_split: 2.0,
            },
        )
    }

    #[test]
    fn test_random_forest_classifier() {
        let x = array![
            [0.0, 0.1, 0.2],
            [0.1, 0.0, 0.1],
            [0.2, 0.2, 0.0],
            [0.1, 0.1, 0.1],
            [1.0, 0.9, 1.1],
            [0.9, 1.0, 0.9],
            [1.1, 1.1, 1.0],
            [1.0, 1.0, 1.0],
        ];
        let y = array![0usize, 0, 0, 0, 1, 1, 1, 1];

        let mut forest = RandomForestClassifier::new(toy_params(25));
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 25);
        assert_eq!(forest.predict(&x).unwrap(), y);

        let importances = forest.feature_importances().unwrap();
        assert_eq!(importances.len(), 3);
        assert!(importances.iter().all(|&v| v >= 0.0));
        assert!((importances.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fit_is_deterministic_for_a_seed() {
        let x = array![[0.0, 1.0], [1.0, 0.0], [0.2, 0.9], [0.9, 0.1], [0.5, 0.4], [0.4, 0.6]];
        let y = array![0usize, 1, 0, 1, 1, 0];

        let mut a = RandomForestClassifier::new(toy_params(10));
        let mut b = RandomForestClassifier::new(toy_params(10));
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.feature_importances(), b.feature_importances());
    }

    #[test]
    fn default_max_features_rounds_sqrt() {
        assert_eq!(default_max_features(8), 3);
        assert_eq!(default_max_features(1), 1);
        assert_eq!(default_max_features(16), 4);
    }

    #[test]
    fn unfitted_forest_has_no_importances() {
        let forest = RandomForestClassifier::new(toy_params(3));
        assert!(forest.feature_importances().is_none());
        assert!(forest.predict(&array![[1.0, 2.0]]).is_err());
    }
}
