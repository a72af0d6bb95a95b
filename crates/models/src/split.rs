//! Seeded holdout split.
//!
//! Rows are shuffled with a generator seeded from `seed`; the first
//! `ceil(test_fraction * n)` shuffled rows form the test partition. Both
//! partitions keep the shuffled order.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::{ModelError, Result};

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Select rows by index.
    pub fn select<T: Clone>(indices: &[usize], rows: &[T]) -> Vec<T> {
        indices.iter().map(|&i| rows[i].clone()).collect()
    }
}

/// Split `n` rows into disjoint train and test index sets.
///
/// # Errors
/// - [`ModelError::InvalidParameter`] unless `0 < test_fraction < 1`
/// - [`ModelError::InsufficientData`] when either partition would be empty
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ModelError::InvalidParameter(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n < 2 || n_test >= n {
        return Err(ModelError::InsufficientData {
            required: 2,
            actual: n,
        });
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let train = order.split_off(n_test);
    Ok(TrainTestSplit { train, test: order })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sizes_and_disjointness() {
        let split = train_test_split(101, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 21);
        assert_eq!(split.train.len(), 80);

        let all: HashSet<usize> = split.train.iter().chain(&split.test).copied().collect();
        assert_eq!(all.len(), 101);
    }

    #[test]
    fn test_seeded() {
        assert_eq!(train_test_split(50, 0.2, 42), train_test_split(50, 0.2, 42));
        assert_ne!(train_test_split(50, 0.2, 42), train_test_split(50, 0.2, 43));
    }

    #[test]
    fn test_small_inputs() {
        let split = train_test_split(2, 0.2, 0).unwrap();
        assert_eq!(split.test.len(), 1);
        assert_eq!(split.train.len(), 1);

        assert!(matches!(
            train_test_split(1, 0.2, 0),
            Err(ModelError::InsufficientData { .. })
        ));
        assert!(matches!(
            train_test_split(10, 1.0, 0),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_select() {
        let rows = ["a", "b", "c"];
        assert_eq!(TrainTestSplit::select(&[2, 0], &rows), vec!["c", "a"]);
    }
}
