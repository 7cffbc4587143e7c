use crate::error::DataError;
use miniflow_core::{Element, Matrix, MiniflowError};
use miniflow_core::num_traits::NumCast;

/// Per-column mean and (population) standard deviation of a feature matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer<T = f64> {
    mean: Vec<T>,
    std: Vec<T>,
}

impl<T: Element> Standardizer<T> {
    /// Computes column statistics. An empty matrix yields zero means and unit deviations.
    pub fn fit(features: &Matrix<T>) -> Self {
        let cols = features.cols();
        let rows = features.rows();
        if rows == 0 {
            return Standardizer {
                mean: vec![T::zero(); cols],
                std: vec![T::one(); cols],
            };
        }
        let n: T = <T as NumCast>::from(rows).unwrap_or_else(T::one);
        let mean: Vec<T> = features
            .sum_rows()
            .data()
            .iter()
            .map(|&s| s / n)
            .collect();
        let mut var = vec![T::zero(); cols];
        for row in features.data().chunks(cols.max(1)) {
            for ((acc, &v), &mu) in var.iter_mut().zip(row).zip(mean.iter()) {
                *acc += (v - mu) * (v - mu);
            }
        }
        let std = var.into_iter().map(|v| (v / n).sqrt()).collect();
        Standardizer { mean, std }
    }

    pub fn mean(&self) -> &[T] {
        &self.mean
    }

    pub fn std(&self) -> &[T] {
        &self.std
    }

    /// `(x - mean) / std` per column; constant columns are only centred.
    pub fn transform(&self, features: &Matrix<T>) -> Result<Matrix<T>, DataError> {
        if features.cols() != self.mean.len() {
            return Err(DataError::Engine(MiniflowError::DimensionMismatch {
                operation: "standardize".to_string(),
                expected: format!("{} column(s)", self.mean.len()),
                actual: format!("{:?}", features.shape()),
            }));
        }
        let mut out = features.clone();
        self.apply(&mut out);
        Ok(out)
    }

    fn apply(&self, features: &mut Matrix<T>) {
        let cols = features.cols();
        for row in features.data_mut().chunks_mut(cols.max(1)) {
            for ((v, &mu), &sd) in row.iter_mut().zip(self.mean.iter()).zip(self.std.iter()) {
                *v = if sd > T::zero() { (*v - mu) / sd } else { *v - mu };
            }
        }
    }
}

/// Standardises every column of `features` with its own statistics.
pub fn standardize<T: Element>(features: &Matrix<T>) -> Matrix<T> {
    let mut out = features.clone();
    Standardizer::fit(features).apply(&mut out);
    out
}

#[cfg(test)]
#[path = "standardize_test.rs"]
mod tests;
