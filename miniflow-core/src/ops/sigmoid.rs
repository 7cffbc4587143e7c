use crate::error::MiniflowError;
use crate::matrix::Matrix;
use crate::scalar::Element;

/// Logistic function `1 / (1 + e^-x)` for a single element.
pub fn logistic<T: Element>(x: T) -> T {
    T::one() / (T::one() + (-x).exp())
}

pub fn forward<T: Element>(z: &Matrix<T>) -> Matrix<T> {
    z.map(logistic)
}

/// `output · (1 - output) ⊙ grad_out`, using the forward result rather than `z`.
pub fn backward<T: Element>(output: &Matrix<T>, grad_out: &Matrix<T>) -> Result<Matrix<T>, MiniflowError> {
    output.zip_map(grad_out, |s, g| s * (T::one() - s) * g)
}

#[cfg(test)]
#[path = "sigmoid_test.rs"]
mod tests;
