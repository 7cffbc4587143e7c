use crate::error::MiniflowError;
use crate::matrix::Matrix;
use crate::scalar::Element;

/// Gradients of a Linear node with respect to each operand.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGrads<T> {
    pub x: Matrix<T>,
    pub w: Matrix<T>,
    pub b: Matrix<T>,
}

fn check_shapes<T: Element>(x: &Matrix<T>, w: &Matrix<T>, b: &Matrix<T>) -> Result<(), MiniflowError> {
    if x.cols() != w.rows() {
        return Err(MiniflowError::DimensionMismatch {
            operation: "Linear forward".to_string(),
            expected: format!("x cols == w rows ({})", w.rows()),
            actual: format!("x shape {:?}", x.shape()),
        });
    }
    if !b.is_vector() || b.len() != w.cols() {
        return Err(MiniflowError::DimensionMismatch {
            operation: "Linear forward".to_string(),
            expected: format!("bias of length {}", w.cols()),
            actual: format!("bias shape {:?}", b.shape()),
        });
    }
    Ok(())
}

/// `x (m×n) · w (n×k) + b (k)`, with `b` added to every row.
pub fn forward<T: Element>(x: &Matrix<T>, w: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>, MiniflowError> {
    check_shapes(x, w, b)?;
    x.matmul(w)?.add_row_broadcast(b)
}

/// Given `grad_out` (m×k): `∂x = grad_out · wᵗ`, `∂w = xᵗ · grad_out`, `∂b = Σ_rows grad_out`.
///
/// `∂b` keeps the shape of `b`, whether it was bound as a row or a column.
pub fn backward<T: Element>(
    x: &Matrix<T>,
    w: &Matrix<T>,
    b: &Matrix<T>,
    grad_out: &Matrix<T>,
) -> Result<LinearGrads<T>, MiniflowError> {
    check_shapes(x, w, b)?;
    if grad_out.shape() != (x.rows(), w.cols()) {
        return Err(MiniflowError::DimensionMismatch {
            operation: "Linear backward".to_string(),
            expected: format!("{:?}", (x.rows(), w.cols())),
            actual: format!("{:?}", grad_out.shape()),
        });
    }
    Ok(LinearGrads {
        x: grad_out.matmul(&w.transpose())?,
        w: x.transpose().matmul(grad_out)?,
        b: grad_out.sum_rows().reshape(b.rows(), b.cols())?,
    })
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod tests;
