//! Encoded datasets and stratified train/test partitioning.
//!
//! The split keeps the churn proportion of each class in both partitions by
//! shuffling each class separately and carving a proportional quota from it.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{ChurnError, Result};

/// Column order of the design matrix.
pub const FEATURE_NAMES: [&str; 8] = [
    "tenure",
    "monthly_charges",
    "total_charges",
    "contract_encoded",
    "payment_method_encoded",
    "internet_service_encoded",
    "tech_support_encoded",
    "online_security_encoded",
];

#[derive(Debug, Clone)]
pub struct EncodedDataset {
    pub x: Array2<f64>,
    pub y: Array1<usize>,
    pub feature_names: Vec<String>,
}

impl EncodedDataset {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<usize>,
    pub y_test: Array1<usize>,
    /// Row indices into the encoded dataset
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Fraction of positive labels.
pub fn positive_rate(y: &Array1<usize>) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    y.iter().filter(|&&v| v == 1).count() as f64 / y.len() as f64
}

/// Per-class test quotas summing to `n_test`, proportional to class sizes.
///
/// Each class first gets the floor of its share; leftover slots go to the
/// classes with the largest fractional remainder (lower label first on ties).
fn allocate_test_quotas(
    class_counts: &BTreeMap<usize, usize>,
    n: usize,
    n_test: usize,
) -> BTreeMap<usize, usize> {
    let mut quotas = BTreeMap::new();
    let mut remainders = Vec::with_capacity(class_counts.len());
    let mut assigned = 0;

    for (&class, &count) in class_counts.iter() {
        let exact = n_test as f64 * count as f64 / n as f64;
        let floor = (exact.floor() as usize).min(count.saturating_sub(1));
        quotas.insert(class, floor);
        assigned += floor;
        remainders.push((class, exact - floor as f64));
    }

    remainders.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    let mut leftover = n_test.saturating_sub(assigned);
    while leftover > 0 {
        let mut progressed = false;
        for (class, _) in remainders.iter() {
            if leftover == 0 {
                break;
            }
            let count = class_counts[class];
            let quota = quotas.entry(*class).or_insert(0);
            // keep at least one row of every class in the training partition
            if *quota + 1 < count {
                *quota += 1;
                leftover -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    quotas
}

/// Stratified shuffle split of an encoded dataset.
///
/// # Arguments
///
/// * `dataset` - The encoded features and churn labels
/// * `test_size` - Fraction of rows assigned to the test partition, in (0, 1)
/// * `seed` - Seed for the shuffling stream
///
/// # Returns
///
/// Train and test matrices with their labels and original row indices. Both
/// partitions are shuffled.
pub fn train_test_split(
    dataset: &EncodedDataset,
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    let n = dataset.n_samples();
    if n == 0 {
        return Err(ChurnError::EmptyDataset);
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ChurnError::InvalidTestSize(test_size));
    }
    if dataset.y.len() != n {
        return Err(ChurnError::ShapeMismatch {
            expected: n,
            found: dataset.y.len(),
        });
    }

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in dataset.y.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }
    for (&class, rows) in by_class.iter() {
        if rows.len() < 2 {
            return Err(ChurnError::TooFewMembers {
                class,
                count: rows.len(),
            });
        }
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    let class_counts: BTreeMap<usize, usize> =
        by_class.iter().map(|(c, rows)| (*c, rows.len())).collect();
    let quotas = allocate_test_quotas(&class_counts, n, n_test);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_indices = Vec::with_capacity(n - n_test);
    let mut test_indices = Vec::with_capacity(n_test);

    for (class, rows) in by_class.iter_mut() {
        rows.shuffle(&mut rng);
        let quota = quotas.get(class).copied().unwrap_or(0);
        test_indices.extend_from_slice(&rows[..quota]);
        train_indices.extend_from_slice(&rows[quota..]);
    }

    train_indices.shuffle(&mut rng);
    test_indices.shuffle(&mut rng);

    let split = TrainTestSplit {
        x_train: dataset.x.select(Axis(0), &train_indices),
        x_test: dataset.x.select(Axis(0), &test_indices),
        y_train: dataset.y.select(Axis(0), &train_indices),
        y_test: dataset.y.select(Axis(0), &test_indices),
        train_indices,
        test_indices,
    };

    log::debug!(
        "Split {} rows into {} training ({:.4} churn) and {} test ({:.4} churn)",
        n,
        split.train_indices.len(),
        positive_rate(&split.y_train),
        split.test_indices.len(),
        positive_rate(&split.y_test)
    );

    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotas_sum_to_requested_test_size() {
        let counts = BTreeMap::from([(0usize, 7usize), (1usize, 3usize)]);
        let quotas = allocate_test_quotas(&counts, 10, 3);
        assert_eq!(quotas.values().sum::<usize>(), 3);
        assert_eq!(quotas[&0], 2);
        assert_eq!(quotas[&1], 1);
    }

    #[test]
    fn quotas_leave_a_training_row_per_class() {
        let counts = BTreeMap::from([(0usize, 2usize), (1usize, 2usize)]);
        let quotas = allocate_test_quotas(&counts, 4, 3);
        assert!(quotas.values().all(|&q| q <= 1));
    }
}
