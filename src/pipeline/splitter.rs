//! Seeded train/test partitioning of row indices

use faer::Mat;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::error::{PreprocessError, Result};
use super::features::FeatureMatrix;

/// Row indices of the two partitions. The same indices are applied to the
/// feature matrix and the target vector so rows stay aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with a ChaCha8 generator seeded from `seed`, then take
/// the first `n_rows - ceil(test_size * n_rows)` positions for training and
/// the rest for testing.
///
/// The partition depends only on `n_rows`, `test_size` and `seed`.
pub fn split_indices(n_rows: usize, test_size: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PreprocessError::InvalidSplit(format!(
            "test size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (test_size * n_rows as f64).ceil() as usize;
    let n_train = n_rows.saturating_sub(n_test);

    if n_test == 0 || n_train == 0 {
        return Err(PreprocessError::InvalidSplit(format!(
            "{} row(s) with test size {} leaves an empty partition ({} train, {} test)",
            n_rows, test_size, n_train, n_test
        )));
    }

    let mut order: Vec<usize> = (0..n_rows).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let test = order.split_off(n_train);
    Ok(SplitIndices { train: order, test })
}

impl SplitIndices {
    pub fn n_train(&self) -> usize {
        self.train.len()
    }

    pub fn n_test(&self) -> usize {
        self.test.len()
    }

    /// Returns `(train, test)` row subsets of the feature matrix.
    pub fn apply_rows(&self, features: &FeatureMatrix) -> Result<(FeatureMatrix, FeatureMatrix)> {
        self.check_len(features.nrows())?;
        Ok((
            take_rows(features, &self.train)?,
            take_rows(features, &self.test)?,
        ))
    }

    /// Returns `(train, test)` subsets of a per-row vector.
    pub fn apply_values(&self, values: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        self.check_len(values.len())?;
        Ok((
            self.train.iter().map(|&i| values[i]).collect(),
            self.test.iter().map(|&i| values[i]).collect(),
        ))
    }

    fn check_len(&self, len: usize) -> Result<()> {
        let expected = self.train.len() + self.test.len();
        if len != expected {
            return Err(PreprocessError::InvalidSplit(format!(
                "split covers {} row(s) but data has {}",
                expected, len
            )));
        }
        Ok(())
    }
}

fn take_rows(features: &FeatureMatrix, rows: &[usize]) -> Result<FeatureMatrix> {
    let data = Mat::from_fn(rows.len(), features.ncols(), |i, j| {
        features.data[(rows[i], j)]
    });
    FeatureMatrix::new(features.names.clone(), data)
}
