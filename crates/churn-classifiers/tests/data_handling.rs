//! Integration tests for the stratified train/test split.

use std::collections::HashSet;

use churn_classifiers::data_handling::{positive_rate, train_test_split, EncodedDataset};
use churn_classifiers::error::ChurnError;
use churn_classifiers::labels::synthesize_labels;
use churn_classifiers::preprocessing::encode_features;
use churn_classifiers::synthetic::generate_dataset;
use ndarray::{Array1, Array2};

fn encoded(n: usize) -> EncodedDataset {
    let labeled = synthesize_labels(generate_dataset(42, n).unwrap(), 43).unwrap();
    encode_features(&labeled).unwrap().0
}

fn toy(labels: Vec<usize>) -> EncodedDataset {
    let n = labels.len();
    EncodedDataset {
        x: Array2::from_shape_fn((n, 2), |(i, j)| (i * 2 + j) as f64),
        y: Array1::from(labels),
        feature_names: vec!["a".to_string(), "b".to_string()],
    }
}

#[test]
fn default_split_sizes() {
    let data = encoded(5000);
    let split = train_test_split(&data, 0.2, 42).unwrap();

    assert_eq!(split.x_train.nrows(), 4000);
    assert_eq!(split.x_test.nrows(), 1000);
    assert_eq!(split.y_train.len(), 4000);
    assert_eq!(split.y_test.len(), 1000);
    assert_eq!(split.x_train.ncols(), 8);
}

#[test]
fn partitions_are_disjoint_and_cover_every_row() {
    let data = encoded(1000);
    let split = train_test_split(&data, 0.2, 3).unwrap();

    let train: HashSet<usize> = split.train_indices.iter().copied().collect();
    let test: HashSet<usize> = split.test_indices.iter().copied().collect();
    assert!(train.is_disjoint(&test));
    assert_eq!(train.len() + test.len(), 1000);
    assert_eq!(train.union(&test).count(), 1000);

    // rows follow their recorded indices
    for (row, &idx) in split.test_indices.iter().enumerate() {
        assert_eq!(split.x_test.row(row), data.x.row(idx));
        assert_eq!(split.y_test[row], data.y[idx]);
    }
}

#[test]
fn split_preserves_churn_proportion() {
    let data = encoded(5000);
    let split = train_test_split(&data, 0.2, 42).unwrap();

    let overall = positive_rate(&data.y);
    assert!((positive_rate(&split.y_train) - overall).abs() < 0.005);
    assert!((positive_rate(&split.y_test) - overall).abs() < 0.005);
}

#[test]
fn split_is_deterministic_per_seed() {
    let data = encoded(600);
    let a = train_test_split(&data, 0.2, 11).unwrap();
    let b = train_test_split(&data, 0.2, 11).unwrap();
    let c = train_test_split(&data, 0.2, 12).unwrap();

    assert_eq!(a.test_indices, b.test_indices);
    assert_eq!(a.train_indices, b.train_indices);
    assert_ne!(a.test_indices, c.test_indices);
}

#[test]
fn test_size_rounds_up() {
    let data = toy(vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0]);
    let split = train_test_split(&data, 0.2, 1).unwrap();
    // ceil(0.2 * 11) = 3
    assert_eq!(split.test_indices.len(), 3);
    assert_eq!(split.train_indices.len(), 8);
}

#[test]
fn invalid_test_size_is_rejected() {
    let data = toy(vec![0, 1, 0, 1]);
    for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
        assert!(matches!(
            train_test_split(&data, bad, 1),
            Err(ChurnError::InvalidTestSize(_))
        ));
    }
}

#[test]
fn singleton_class_is_rejected() {
    let data = toy(vec![0, 0, 0, 0, 1]);
    assert!(matches!(
        train_test_split(&data, 0.2, 1),
        Err(ChurnError::TooFewMembers { class: 1, count: 1 })
    ));
}

#[test]
fn positive_rate_of_empty_labels_is_zero() {
    assert_eq!(positive_rate(&Array1::<usize>::zeros(0)), 0.0);
    assert_eq!(positive_rate(&Array1::from(vec![1, 0, 1, 1])), 0.75);
}
