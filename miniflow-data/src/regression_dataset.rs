use crate::error::DataError;
use crate::Dataset;
use miniflow_core::{Element, Matrix};

/// In-memory features (`m x n`) with one scalar target per row.
#[derive(Debug, Clone)]
pub struct RegressionDataset<T = f64> {
    features: Matrix<T>,
    targets: Matrix<T>,
}

impl<T: Element> RegressionDataset<T> {
    /// Creates a dataset; targets may be given as a row or a column and are stored as `m x 1`.
    pub fn new(features: Matrix<T>, targets: Matrix<T>) -> Result<Self, DataError> {
        if !targets.is_vector() {
            return Err(DataError::TargetsNotVector(targets.shape()));
        }
        if targets.len() != features.rows() {
            return Err(DataError::LengthMismatch {
                features: features.rows(),
                targets: targets.len(),
            });
        }
        let targets = targets.reshape(features.rows(), 1)?;
        Ok(RegressionDataset { features, targets })
    }

    pub fn features(&self) -> &Matrix<T> {
        &self.features
    }

    /// Targets as an `m x 1` column.
    pub fn targets(&self) -> &Matrix<T> {
        &self.targets
    }

    pub fn n_features(&self) -> usize {
        self.features.cols()
    }

    /// Gathers the given rows into an `(X, y)` batch. Indices may repeat.
    pub fn batch(&self, indices: &[usize]) -> Result<(Matrix<T>, Matrix<T>), DataError> {
        Ok((
            self.features.select_rows(indices)?,
            self.targets.select_rows(indices)?,
        ))
    }
}

impl<T: Element> Dataset for RegressionDataset<T> {
    type Item = (Matrix<T>, T);

    fn get(&self, index: usize) -> Option<Self::Item> {
        let row = self.features.select_rows(&[index]).ok()?;
        let target = self.targets.get(index, 0)?;
        Some((row, target))
    }

    fn len(&self) -> usize {
        self.features.rows()
    }
}

#[cfg(test)]
#[path = "regression_dataset_test.rs"]
mod tests;
