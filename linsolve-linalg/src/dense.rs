#![allow(clippy::needless_range_loop)]
//! Dense matrix operations on an owned row-major buffer.
//!
//! Provides element access, elementwise arithmetic, matrix-vector and
//! matrix-matrix products, and the cofactor determinant. The
//! factorizations live in [`crate::decomposition`].

use std::ops::{Index, IndexMut};

use crate::error::LinalgError;

/// A dense `nrows x ncols` matrix of `f64`.
///
/// Row-major layout: entry `(i, j)` lives at `data[i * ncols + j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Create a new dense matrix with every entry set to `value`.
    pub fn new(nrows: usize, ncols: usize, value: f64) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![value; nrows * ncols],
        }
    }

    /// Create a new dense matrix filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::new(nrows, ncols, 0.0)
    }

    /// Create a dense matrix from a flat slice in row-major order.
    pub fn from_row_major(nrows: usize, ncols: usize, data: &[f64]) -> Self {
        assert_eq!(data.len(), nrows * ncols);
        Self {
            nrows,
            ncols,
            data: data.to_vec(),
        }
    }

    /// Create a dense matrix from a list of rows.
    ///
    /// The column count is taken from the first row. Panics if a later row
    /// has a different length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), ncols, "ragged rows in DenseMatrix::from_rows");
            data.extend_from_slice(row);
        }
        Self { nrows, ncols, data }
    }

    /// Create an identity matrix of size n x n.
    pub fn identity(n: usize) -> Self {
        Self::scalar(n, 1.0)
    }

    /// Create an n x n matrix with `value` on the diagonal and zeros elsewhere.
    pub fn scalar(n: usize, value: f64) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = value;
        }
        m
    }

    /// Create a diagonal matrix from a vector.
    pub fn from_diag(diag: &[f64]) -> Self {
        let n = diag.len();
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = diag[i];
        }
        m
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// True when `nrows == ncols`.
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// `NotSquare` unless the matrix is square.
    pub(crate) fn ensure_square(&self) -> Result<(), LinalgError> {
        if self.is_square() {
            Ok(())
        } else {
            Err(LinalgError::NotSquare {
                rows: self.nrows,
                cols: self.ncols,
            })
        }
    }

    /// Get element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<f64, LinalgError> {
        LinalgError::check_index(row, self.nrows)?;
        LinalgError::check_index(col, self.ncols)?;
        Ok(self.data[row * self.ncols + col])
    }

    /// Set element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), LinalgError> {
        LinalgError::check_index(row, self.nrows)?;
        LinalgError::check_index(col, self.ncols)?;
        self.data[row * self.ncols + col] = value;
        Ok(())
    }

    /// The underlying row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Borrow row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.nrows, "row {} out of bounds for {} rows", i, self.nrows);
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Extract column as a Vec<f64>.
    pub fn col(&self, j: usize) -> Vec<f64> {
        (0..self.nrows).map(|i| self[(i, j)]).collect()
    }

    /// Diagonal of the matrix (length `min(nrows, ncols)`).
    pub fn diag(&self) -> Vec<f64> {
        let n = self.nrows.min(self.ncols);
        (0..n).map(|i| self[(i, i)]).collect()
    }

    /// Matrix-vector product: self * v.
    pub fn multiply(&self, v: &[f64]) -> Result<Vec<f64>, LinalgError> {
        LinalgError::check_dim(self.ncols, v.len())?;
        Ok(self.mat_vec(v))
    }

    /// Row sums accumulated left to right. Caller guarantees `v.len() == ncols`.
    pub(crate) fn mat_vec(&self, v: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(self.nrows);
        for i in 0..self.nrows {
            let mut sum = 0.0;
            for (a, x) in self.row(i).iter().zip(v) {
                sum += a * x;
            }
            result.push(sum);
        }
        result
    }

    /// Matrix-matrix product: self * other.
    pub fn multiply_matrix(&self, other: &DenseMatrix) -> Result<DenseMatrix, LinalgError> {
        LinalgError::check_dim(self.ncols, other.nrows)?;
        let mut result = DenseMatrix::zeros(self.nrows, other.ncols);
        for i in 0..self.nrows {
            for j in 0..other.ncols {
                let mut sum = 0.0;
                for k in 0..self.ncols {
                    sum += self[(i, k)] * other[(k, j)];
                }
                result[(i, j)] = sum;
            }
        }
        Ok(result)
    }

    /// Transpose.
    pub fn transpose(&self) -> DenseMatrix {
        let mut result = DenseMatrix::zeros(self.ncols, self.nrows);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                result[(j, i)] = self[(i, j)];
            }
        }
        result
    }

    fn check_same_shape(&self, other: &DenseMatrix) -> Result<(), LinalgError> {
        LinalgError::check_dim(self.nrows, other.nrows)?;
        LinalgError::check_dim(self.ncols, other.ncols)
    }

    /// Element-wise addition: self + other.
    pub fn add(&self, other: &DenseMatrix) -> Result<DenseMatrix, LinalgError> {
        self.check_same_shape(other)?;
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a + b).collect();
        Ok(DenseMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            data,
        })
    }

    /// Element-wise subtraction: self - other.
    pub fn subtract(&self, other: &DenseMatrix) -> Result<DenseMatrix, LinalgError> {
        self.check_same_shape(other)?;
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a - b).collect();
        Ok(DenseMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            data,
        })
    }

    /// Scalar multiplication.
    pub fn scale(&self, s: f64) -> DenseMatrix {
        DenseMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            data: self.data.iter().map(|v| v * s).collect(),
        }
    }

    /// Copy of the matrix with row `row` and column `col` removed.
    pub fn minor(&self, row: usize, col: usize) -> DenseMatrix {
        assert!(row < self.nrows && col < self.ncols);
        let mut data = Vec::with_capacity((self.nrows - 1) * (self.ncols - 1));
        for i in (0..self.nrows).filter(|&i| i != row) {
            for j in (0..self.ncols).filter(|&j| j != col) {
                data.push(self[(i, j)]);
            }
        }
        DenseMatrix {
            nrows: self.nrows - 1,
            ncols: self.ncols - 1,
            data,
        }
    }

    /// Determinant by Laplace expansion along the first row.
    ///
    /// Cost grows as `n!`; intended for small matrices. Use the LU factors
    /// for anything large.
    pub fn determinant(&self) -> Result<f64, LinalgError> {
        self.ensure_square()?;
        Ok(self.cofactor_expansion())
    }

    fn cofactor_expansion(&self) -> f64 {
        match self.nrows {
            0 => 1.0,
            1 => self[(0, 0)],
            2 => self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)],
            n => {
                let mut det = 0.0;
                for j in 0..n {
                    let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                    det += sign * self[(0, j)] * self.minor(0, j).cofactor_expansion();
                }
                det
            }
        }
    }

    /// Frobenius norm.
    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Dot product of two vectors, accumulated in index order.
    pub fn dot(a: &[f64], b: &[f64]) -> f64 {
        assert_eq!(a.len(), b.len());
        a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &self.data[row * self.ncols + col]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &mut self.data[row * self.ncols + col]
    }
}

impl std::fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                if j > 0 {
                    write!(f, "\t")?;
                }
                write!(f, "{}", self[(i, j)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
