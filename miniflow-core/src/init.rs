// src/init.rs
// Initial values for trainable parameters.

use crate::matrix::Matrix;
use crate::scalar::Element;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// A `rows x cols` matrix of samples from the standard normal distribution.
pub fn randn<T, R>(rows: usize, cols: usize, rng: &mut R) -> Matrix<T>
where
    T: Element,
    R: Rng + ?Sized,
    StandardNormal: Distribution<T>,
{
    let data: Vec<T> = (0..rows * cols).map(|_| StandardNormal.sample(rng)).collect();
    Matrix::from_flat(data, rows, cols)
}

/// A `rows x cols` matrix of zeros, the usual starting point for biases.
pub fn zeros<T: Element>(rows: usize, cols: usize) -> Matrix<T> {
    Matrix::zeros(rows, cols)
}
