//! Seeded train/test split

use crate::error::{Result, RiskError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Rows partitioned into a training and a held-out test set
#[derive(Debug, Clone)]
pub struct TrainTestSplit<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

/// Shuffle `rows` and hold out `ceil(len * test_fraction)` of them.
///
/// Both partitions must end up non-empty.
pub fn train_test_split<T, R: Rng + ?Sized>(
    mut rows: Vec<T>,
    test_fraction: f64,
    rng: &mut R,
) -> Result<TrainTestSplit<T>> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(RiskError::invalid_config(format!(
            "test fraction must lie in (0, 1), got {test_fraction}"
        )));
    }

    let total = rows.len();
    let test_len = (total as f64 * test_fraction).ceil() as usize;
    if total < 2 || test_len >= total {
        return Err(RiskError::insufficient_data(format!(
            "cannot split {total} rows with test fraction {test_fraction}"
        )));
    }

    rows.shuffle(rng);
    let test = rows.split_off(total - test_len);

    Ok(TrainTestSplit { train: rows, test })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_split_sizes() {
        let rows: Vec<usize> = (0..101).collect();
        let split = train_test_split(rows, 0.2, &mut StdRng::seed_from_u64(42)).unwrap();

        // ceil(101 * 0.2) = 21
        assert_eq!(split.test.len(), 21);
        assert_eq!(split.train.len(), 80);
    }

    #[test]
    fn test_split_is_a_partition() {
        let rows: Vec<usize> = (0..50).collect();
        let split = train_test_split(rows, 0.3, &mut StdRng::seed_from_u64(1)).unwrap();

        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_deterministic_for_seed() {
        let a = train_test_split((0..40).collect::<Vec<_>>(), 0.2, &mut StdRng::seed_from_u64(7))
            .unwrap();
        let b = train_test_split((0..40).collect::<Vec<_>>(), 0.2, &mut StdRng::seed_from_u64(7))
            .unwrap();

        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn test_split_rejects_tiny_tables() {
        let err = train_test_split(vec![1], 0.2, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, RiskError::InsufficientData { .. }));
    }
}
