// miniflow-data/src/resampler.rs

use crate::error::DataError;
use crate::regression_dataset::RegressionDataset;
use crate::Dataset;
use miniflow_core::{Element, Matrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws mini-batches by sampling rows with replacement (bootstrap resampling).
///
/// Seeded, so two resamplers built with the same seed yield the same batches.
#[derive(Debug, Clone)]
pub struct Resampler {
    rng: StdRng,
}

impl Resampler {
    pub fn new(seed: u64) -> Self {
        Resampler {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Row indices for one batch; the same index may appear several times.
    pub fn indices(&mut self, dataset_len: usize, batch_size: usize) -> Result<Vec<usize>, DataError> {
        if dataset_len == 0 {
            return Err(DataError::EmptyDataset);
        }
        if batch_size == 0 {
            return Err(DataError::InvalidBatchSize);
        }
        Ok((0..batch_size)
            .map(|_| self.rng.gen_range(0..dataset_len))
            .collect())
    }

    /// Samples `batch_size` rows and returns the `(X, y)` batch, `y` as a column.
    pub fn sample<T: Element>(
        &mut self,
        dataset: &RegressionDataset<T>,
        batch_size: usize,
    ) -> Result<(Matrix<T>, Matrix<T>), DataError> {
        let indices = self.indices(dataset.len(), batch_size)?;
        log::trace!("resampler: batch of {} from {} row(s)", batch_size, dataset.len());
        dataset.batch(&indices)
    }
}

#[cfg(test)]
#[path = "resampler_test.rs"]
mod tests;
