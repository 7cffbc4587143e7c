use crate::error::MiniflowError;
use crate::matrix::Matrix;
use crate::scalar::Element;
use num_traits::NumCast;

/// Gradients of an MSE node, each shaped like its operand.
#[derive(Debug, Clone, PartialEq)]
pub struct MseGrads<T> {
    pub y_true: Matrix<T>,
    pub y_pred: Matrix<T>,
}

/// Brings both operands to a common shape: two vectors of equal length become `m x 1`
/// columns, anything else must already match exactly.
fn aligned<T: Element>(
    y_true: &Matrix<T>,
    y_pred: &Matrix<T>,
) -> Result<(Matrix<T>, Matrix<T>), MiniflowError> {
    if y_true.is_vector() && y_pred.is_vector() && y_true.len() == y_pred.len() {
        let m = y_true.len();
        return Ok((y_true.reshape(m, 1)?, y_pred.reshape(m, 1)?));
    }
    if y_true.shape() != y_pred.shape() {
        return Err(MiniflowError::DimensionMismatch {
            operation: "MSE".to_string(),
            expected: format!("y_pred shape {:?}", y_true.shape()),
            actual: format!("{:?}", y_pred.shape()),
        });
    }
    Ok((y_true.clone(), y_pred.clone()))
}

fn example_count<T: Element>(rows: usize) -> Result<T, MiniflowError> {
    if rows == 0 {
        return Err(MiniflowError::DimensionMismatch {
            operation: "MSE".to_string(),
            expected: "at least one example".to_string(),
            actual: "0 rows".to_string(),
        });
    }
    <T as NumCast>::from(rows).ok_or_else(|| MiniflowError::DimensionMismatch {
        operation: "MSE".to_string(),
        expected: "row count representable as a float".to_string(),
        actual: rows.to_string(),
    })
}

/// `(1/m) · Σ (y_true - y_pred)²`, where `m` is the number of rows (examples).
pub fn forward<T: Element>(y_true: &Matrix<T>, y_pred: &Matrix<T>) -> Result<Matrix<T>, MiniflowError> {
    let (y_true, y_pred) = aligned(y_true, y_pred)?;
    let m: T = example_count(y_true.rows())?;
    let diff = y_true.sub(&y_pred)?;
    let total: T = diff.data().iter().map(|&d| d * d).sum();
    Ok(Matrix::scalar(total / m))
}

/// `∂y_pred = (2/m)(y_pred - y_true)` and `∂y_true = (2/m)(y_true - y_pred)`, scaled by the
/// scalar `grad_out`.
pub fn backward<T: Element>(
    y_true: &Matrix<T>,
    y_pred: &Matrix<T>,
    grad_out: &Matrix<T>,
) -> Result<MseGrads<T>, MiniflowError> {
    let upstream = grad_out.item()?;
    let (aligned_true, aligned_pred) = aligned(y_true, y_pred)?;
    let m: T = example_count(aligned_true.rows())?;
    let two = T::one() + T::one();
    let diff = aligned_true.sub(&aligned_pred)?.scale(two / m * upstream);
    Ok(MseGrads {
        y_true: diff.reshape(y_true.rows(), y_true.cols())?,
        y_pred: diff.scale(-T::one()).reshape(y_pred.rows(), y_pred.cols())?,
    })
}

#[cfg(test)]
#[path = "mse_test.rs"]
mod tests;
