#![allow(clippy::needless_range_loop)]
//! Sparse matrix in coordinate (dictionary-of-keys) storage.
//!
//! Entries live in a hash map keyed by `(row, col)`; a missing key reads
//! as 0.0. The matrix carries its own iterative solvers through
//! [`SparseMatrix::solve_system`].

use std::collections::HashMap;

use crate::dense::DenseMatrix;
use crate::error::LinalgError;
use crate::iterative::{IterativeMethod, IterativeSolver, LinearOperator};

/// A sparse `nrows x ncols` matrix keyed by coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    nrows: usize,
    ncols: usize,
    entries: HashMap<(usize, usize), f64>,
}

impl SparseMatrix {
    /// Create an empty (all-zero) sparse matrix.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            entries: HashMap::new(),
        }
    }

    /// Create a sparse matrix from COO (coordinate) triplets.
    ///
    /// Duplicate coordinates are summed.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        rows: &[usize],
        cols: &[usize],
        vals: &[f64],
    ) -> Result<Self, LinalgError> {
        LinalgError::check_dim(rows.len(), cols.len())?;
        LinalgError::check_dim(rows.len(), vals.len())?;
        let mut m = Self::new(nrows, ncols);
        for i in 0..rows.len() {
            let current = m.get(rows[i], cols[i])?;
            m.set(rows[i], cols[i], current + vals[i])?;
        }
        Ok(m)
    }

    /// Create from a dense matrix (keeps only non-zero entries).
    pub fn from_dense(dense: &DenseMatrix) -> Self {
        let mut m = Self::new(dense.nrows(), dense.ncols());
        for i in 0..dense.nrows() {
            for (j, &val) in dense.row(i).iter().enumerate() {
                if val != 0.0 {
                    m.entries.insert((i, j), val);
                }
            }
        }
        m
    }

    /// Create a sparse identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m.entries.insert((i, i), 1.0);
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

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Get element at (row, col). Returns 0.0 if not stored.
    pub fn get(&self, row: usize, col: usize) -> Result<f64, LinalgError> {
        LinalgError::check_index(row, self.nrows)?;
        LinalgError::check_index(col, self.ncols)?;
        Ok(self.value(row, col))
    }

    /// Set element at (row, col). Writing 0.0 drops the stored entry.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), LinalgError> {
        LinalgError::check_index(row, self.nrows)?;
        LinalgError::check_index(col, self.ncols)?;
        if value == 0.0 {
            self.entries.remove(&(row, col));
        } else {
            self.entries.insert((row, col), value);
        }
        Ok(())
    }

    fn value(&self, row: usize, col: usize) -> f64 {
        self.entries.get(&(row, col)).copied().unwrap_or(0.0)
    }

    /// Matrix-vector product: self * v.
    ///
    /// Walks every logical position in row order, so the result does not
    /// depend on hash-map iteration order.
    pub fn multiply(&self, v: &[f64]) -> Result<Vec<f64>, LinalgError> {
        LinalgError::check_dim(self.ncols, v.len())?;
        Ok(self.mat_vec(v))
    }

    fn mat_vec(&self, v: &[f64]) -> Vec<f64> {
        let mut result = vec![0.0; self.nrows];
        for i in 0..self.nrows {
            let mut sum = 0.0;
            for j in 0..self.ncols {
                sum += self.value(i, j) * v[j];
            }
            result[i] = sum;
        }
        result
    }

    /// Extract the diagonal entries.
    pub fn diag(&self) -> Vec<f64> {
        let n = self.nrows.min(self.ncols);
        (0..n).map(|i| self.value(i, i)).collect()
    }

    /// Stored entries as `(row, col, value)`, sorted by row then column.
    pub fn triplets(&self) -> Vec<(usize, usize, f64)> {
        let mut out: Vec<(usize, usize, f64)> =
            self.entries.iter().map(|(&(i, j), &v)| (i, j, v)).collect();
        out.sort_by_key(|&(i, j, _)| (i, j));
        out
    }

    /// Expand into a dense matrix.
    pub fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.nrows, self.ncols);
        for (&(i, j), &v) in &self.entries {
            dense[(i, j)] = v;
        }
        dense
    }

    /// Solve self * x = b from a zero initial guess.
    ///
    /// Uses tolerance `1e-6` and at most 1000 iterations.
    pub fn solve_system(&self, b: &[f64], method: IterativeMethod) -> Result<Vec<f64>, LinalgError> {
        Ok(IterativeSolver::default().solve(self, b, method)?.x)
    }
}

impl LinearOperator for SparseMatrix {
    fn nrows(&self) -> usize {
        self.nrows
    }

    fn ncols(&self) -> usize {
        self.ncols
    }

    fn entry(&self, row: usize, col: usize) -> f64 {
        self.value(row, col)
    }

    fn apply(&self, v: &[f64]) -> Vec<f64> {
        self.mat_vec(v)
    }
}

impl std::fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                if j > 0 {
                    write!(f, "\t")?;
                }
                write!(f, "{}", self.value(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
