//! Seeded train/test split.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{CredenceError, Result};

/// Row indices of a train/test split, both in permutation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Select the train and test items of `items` by index.
    pub fn apply<T: Clone>(&self, items: &[T]) -> (Vec<T>, Vec<T>) {
        let pick = |indices: &[usize]| -> Vec<T> { indices.iter().map(|&i| items[i].clone()).collect() };
        (pick(&self.train), pick(&self.test))
    }
}

/// Split `n` rows into train and test sets.
///
/// The rows are permuted with a `StdRng` seeded from `seed`; the first
/// `ceil(n * test_ratio)` indices of the permutation form the test set and the
/// rest the training set. Both sides must end up non-empty.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(CredenceError::config(format!(
            "test ratio must be in (0, 1), got {test_ratio}"
        )));
    }

    let n_test = (n as f64 * test_ratio).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(CredenceError::training(format!(
            "cannot split {n} rows with test ratio {test_ratio}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(TrainTestSplit {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes() {
        let split = train_test_split(100, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);

        // 0.2 * 11 = 2.2 rounds up
        let split = train_test_split(11, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn test_split_is_a_partition() {
        let split = train_test_split(50, 0.2, 1).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_deterministic() {
        assert_eq!(
            train_test_split(40, 0.25, 42).unwrap(),
            train_test_split(40, 0.25, 42).unwrap()
        );
        assert_ne!(
            train_test_split(40, 0.25, 42).unwrap(),
            train_test_split(40, 0.25, 43).unwrap()
        );
    }

    #[test]
    fn test_apply() {
        let split = TrainTestSplit {
            train: vec![2, 0],
            test: vec![1],
        };
        let (train, test) = split.apply(&["a", "b", "c"]);
        assert_eq!(train, vec!["c", "a"]);
        assert_eq!(test, vec!["b"]);
    }

    #[test]
    fn test_degenerate_splits() {
        assert!(matches!(
            train_test_split(0, 0.2, 42),
            Err(CredenceError::Training(_))
        ));
        assert!(matches!(
            train_test_split(1, 0.2, 42),
            Err(CredenceError::Training(_))
        ));
        assert!(matches!(
            train_test_split(10, 1.5, 42),
            Err(CredenceError::Config(_))
        ));
    }
}
