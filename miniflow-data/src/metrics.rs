use crate::error::DataError;
use miniflow_core::{Element, Matrix, MiniflowError};
use miniflow_core::num_traits::ToPrimitive;

/// Number of full batches of `batch_size` in `dataset_len` rows (`0` if `batch_size` is `0`).
pub fn steps_per_epoch(dataset_len: usize, batch_size: usize) -> usize {
    dataset_len.checked_div(batch_size).unwrap_or(0)
}

/// Percentage of rows where `target - prediction < tolerance`.
///
/// The difference is signed: over-predictions always count as hits.
pub fn accuracy_within<T: Element>(
    targets: &Matrix<T>,
    predictions: &Matrix<T>,
    tolerance: T,
) -> Result<f64, DataError> {
    if targets.len() != predictions.len() {
        return Err(DataError::Engine(MiniflowError::DimensionMismatch {
            operation: "accuracy_within".to_string(),
            expected: format!("{} prediction(s)", targets.len()),
            actual: predictions.len().to_string(),
        }));
    }
    if targets.is_empty() {
        return Err(DataError::EmptyDataset);
    }
    let hits = targets
        .data()
        .iter()
        .zip(predictions.data())
        .filter(|&(&y, &p)| y - p < tolerance)
        .count();
    let total = targets.len().to_f64().unwrap_or(f64::NAN);
    Ok(hits as f64 / total * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_steps_per_epoch() {
        assert_eq!(steps_per_epoch(506, 10), 50);
        assert_eq!(steps_per_epoch(5, 10), 0);
        assert_eq!(steps_per_epoch(5, 0), 0);
    }

    #[test]
    fn test_accuracy_within() {
        let y = Matrix::row(vec![1.0, 2.0, 3.0, 4.0]);
        let p = Matrix::column(vec![1.2, 1.0, 5.0, 3.6]);
        // differences: -0.2, 1.0, -2.0, 0.4 -> three below 0.5
        assert_relative_eq!(accuracy_within(&y, &p, 0.5).unwrap(), 75.0);
    }

    #[test]
    fn test_accuracy_within_errors() {
        let y = Matrix::row(vec![1.0, 2.0]);
        assert!(accuracy_within(&y, &Matrix::row(vec![1.0]), 0.5).is_err());
        let empty = Matrix::<f64>::zeros(0, 1);
        assert_eq!(accuracy_within(&empty, &empty, 0.5), Err(DataError::EmptyDataset));
    }
}
