//! Seeded train/test partitioning

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::PipelineError;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Feature and target arrays for one task, split by `SplitIndices`
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

/// Shuffle `0..n_rows` with `seed` and cut off the test partition.
///
/// The test partition holds the first `ceil(test_size * n_rows)` permuted rows
/// and the training partition the rest, so the same seed and row count always
/// yield the same partitions.
pub fn train_test_split_indices(
    n_rows: usize,
    test_size: f64,
    seed: u64,
) -> Result<SplitIndices, PipelineError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PipelineError::InvalidTestSize(test_size));
    }

    let n_test = (test_size * n_rows as f64).ceil() as usize;
    let n_train = n_rows.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(PipelineError::EmptyPartition {
            rows: n_rows,
            train: n_train,
            test: n_test,
        });
    }

    let mut permutation: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let train = permutation.split_off(n_test);
    Ok(SplitIndices {
        train,
        test: permutation,
    })
}

impl SplitIndices {
    /// Select the partition rows from `x` and `y`
    pub fn apply(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<DataSplit, PipelineError> {
        if x.nrows() != y.len() {
            return Err(PipelineError::ShapeMismatch {
                context: "train/test split".to_string(),
                expected: x.nrows(),
                actual: y.len(),
            });
        }

        Ok(DataSplit {
            x_train: x.select(Axis(0), &self.train),
            x_test: x.select(Axis(0), &self.test),
            y_train: y.select(Axis(0), &self.train),
            y_test: y.select(Axis(0), &self.test),
        })
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_partition_sizes() {
        let split = train_test_split_indices(10, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        // ceil(0.2 * 11) = 3
        let split = train_test_split_indices(11, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 3);
    }

    #[test]
    fn test_partitions_cover_all_rows_once() {
        let split = train_test_split_indices(50, 0.2, 7).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_invalid_test_size() {
        assert!(matches!(
            train_test_split_indices(10, 0.0, 42),
            Err(PipelineError::InvalidTestSize(_))
        ));
        assert!(matches!(
            train_test_split_indices(10, 1.0, 42),
            Err(PipelineError::InvalidTestSize(_))
        ));
    }

    #[test]
    fn test_single_row_cannot_be_split() {
        assert!(matches!(
            train_test_split_indices(1, 0.2, 42),
            Err(PipelineError::EmptyPartition { .. })
        ));
    }

    #[test]
    fn test_apply_selects_rows() {
        let split = SplitIndices {
            train: vec![2, 0],
            test: vec![1],
        };
        let x = array![[0.0], [1.0], [2.0]];
        let y = array![10.0, 11.0, 12.0];

        let data = split.apply(&x, &y).unwrap();
        assert_eq!(data.x_train, array![[2.0], [0.0]]);
        assert_eq!(data.y_train, array![12.0, 10.0]);
        assert_eq!(data.x_test, array![[1.0]]);
        assert_eq!(data.y_test, array![11.0]);
    }
}
