// src/matrix.rs

use crate::error::MiniflowError;
use crate::scalar::Element;
use std::fmt;

/// Dense, row-major 2-D matrix holding the value (or gradient) of a node.
///
/// Scalars are represented as `1 x 1` matrices and vectors as either a single
/// row or a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T = f64> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

fn shape_mismatch(operation: &str, expected: String, actual: String) -> MiniflowError {
    MiniflowError::DimensionMismatch {
        operation: operation.to_string(),
        expected,
        actual,
    }
}

impl<T: Element> Matrix<T> {
    /// Creates a matrix from row-major data.
    ///
    /// # Errors
    /// Returns `MatrixCreation` if `data.len() != rows * cols`.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> Result<Self, MiniflowError> {
        if data.len() != rows * cols {
            return Err(MiniflowError::MatrixCreation {
                data_len: data.len(),
                shape: (rows, cols),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    // Callers guarantee `data.len() == rows * cols`.
    pub(crate) fn from_flat(data: Vec<T>, rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Matrix { rows, cols, data }
    }

    /// Builds a matrix from a list of equally sized rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, MiniflowError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let data: Vec<T> = rows.into_iter().flatten().collect();
        Matrix::new(data, n_rows, n_cols)
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix::full(rows, cols, T::zero())
    }

    pub fn full(rows: usize, cols: usize, value: T) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// A `1 x 1` matrix.
    pub fn scalar(value: T) -> Self {
        Matrix::full(1, 1, value)
    }

    /// A `1 x n` row vector.
    pub fn row(data: Vec<T>) -> Self {
        Matrix {
            rows: 1,
            cols: data.len(),
            data,
        }
    }

    /// An `n x 1` column vector.
    pub fn column(data: Vec<T>) -> Self {
        Matrix {
            rows: data.len(),
            cols: 1,
            data,
        }
    }

    pub fn zeros_like(other: &Matrix<T>) -> Self {
        Matrix::zeros(other.rows, other.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True for a single row or a single column.
    pub fn is_vector(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Returns the single element of a `1 x 1` matrix.
    pub fn item(&self) -> Result<T, MiniflowError> {
        if self.shape() != (1, 1) {
            return Err(shape_mismatch(
                "item",
                "(1, 1)".to_string(),
                format!("{:?}", self.shape()),
            ));
        }
        Ok(self.data[0])
    }

    /// Same data, new shape. The element count must be preserved.
    pub fn reshape(&self, rows: usize, cols: usize) -> Result<Self, MiniflowError> {
        if rows * cols != self.len() {
            return Err(shape_mismatch(
                "reshape",
                format!("{} elements", rows * cols),
                format!("{:?}", self.shape()),
            ));
        }
        Ok(Matrix {
            rows,
            cols,
            data: self.data.clone(),
        })
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.data[r * self.cols + c]);
            }
        }
        Matrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Matrix product `self · other`.
    pub fn matmul(&self, other: &Matrix<T>) -> Result<Self, MiniflowError> {
        if self.cols != other.rows {
            return Err(shape_mismatch(
                "matmul",
                format!("lhs cols == rhs rows ({})", self.cols),
                format!("rhs rows {}", other.rows),
            ));
        }
        let mut data = vec![T::zero(); self.rows * other.cols];
        for i in 0..self.rows {
            for p in 0..self.cols {
                let a = self.data[i * self.cols + p];
                let rhs_row = &other.data[p * other.cols..(p + 1) * other.cols];
                let out_row = &mut data[i * other.cols..(i + 1) * other.cols];
                for (out, &b) in out_row.iter_mut().zip(rhs_row) {
                    *out += a * b;
                }
            }
        }
        Ok(Matrix {
            rows: self.rows,
            cols: other.cols,
            data,
        })
    }

    /// Adds a vector of length `cols` to every row.
    pub fn add_row_broadcast(&self, bias: &Matrix<T>) -> Result<Self, MiniflowError> {
        if !bias.is_vector() || bias.len() != self.cols {
            return Err(shape_mismatch(
                "add_row_broadcast",
                format!("bias of length {}", self.cols),
                format!("{:?}", bias.shape()),
            ));
        }
        let mut out = self.clone();
        for row in out.data.chunks_mut(self.cols.max(1)) {
            for (v, &b) in row.iter_mut().zip(bias.data.iter()) {
                *v += b;
            }
        }
        Ok(out)
    }

    /// Column-wise sum, returned as a `1 x cols` row.
    pub fn sum_rows(&self) -> Self {
        let mut data = vec![T::zero(); self.cols];
        for row in self.data.chunks(self.cols.max(1)) {
            for (acc, &v) in data.iter_mut().zip(row) {
                *acc += v;
            }
        }
        Matrix::row(data)
    }

    pub fn sum(&self) -> T {
        self.data.iter().copied().sum()
    }

    pub fn map<F: Fn(T) -> T>(&self, f: F) -> Self {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Elementwise combination of two same-shaped matrices.
    pub fn zip_map<F: Fn(T, T) -> T>(&self, other: &Matrix<T>, f: F) -> Result<Self, MiniflowError> {
        if self.shape() != other.shape() {
            return Err(shape_mismatch(
                "zip_map",
                format!("{:?}", self.shape()),
                format!("{:?}", other.shape()),
            ));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    pub fn sub(&self, other: &Matrix<T>) -> Result<Self, MiniflowError> {
        self.zip_map(other, |a, b| a - b)
    }

    pub fn scale(&self, factor: T) -> Self {
        self.map(|v| v * factor)
    }

    /// In-place elementwise addition.
    pub fn add_assign(&mut self, other: &Matrix<T>) -> Result<(), MiniflowError> {
        if self.shape() != other.shape() {
            return Err(shape_mismatch(
                "add_assign",
                format!("{:?}", self.shape()),
                format!("{:?}", other.shape()),
            ));
        }
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
        Ok(())
    }

    /// Gathers the given rows, in order, into a new matrix. Repeated indices are allowed.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self, MiniflowError> {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            if i >= self.rows {
                return Err(shape_mismatch(
                    "select_rows",
                    format!("row index < {}", self.rows),
                    format!("{}", i),
                ));
            }
            data.extend_from_slice(&self.data[i * self.cols..(i + 1) * self.cols]);
        }
        Ok(Matrix {
            rows: indices.len(),
            cols: self.cols,
            data,
        })
    }
}

impl<T: Element> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}x{} [", self.rows, self.cols)?;
        for row in self.data.chunks(self.cols.max(1)) {
            let cells: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
            writeln!(f, "  [{}]", cells.join(", "))?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod tests;
