//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

use crate::iterative::IterativeMethod;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Index {index} out of bounds for extent {extent}")]
    IndexOutOfBounds { index: usize, extent: usize },

    #[error("Singular matrix encountered")]
    Singular,

    #[error("Matrix is not positive definite")]
    NotPositiveDefinite,

    #[error("Zero diagonal entry at row {row}")]
    ZeroDiagonal { row: usize },

    #[error("{method} failed to converge after {iterations} iterations (residual: {residual:.2e})")]
    NonConvergence {
        method: IterativeMethod,
        iterations: usize,
        residual: f64,
    },
}

impl LinalgError {
    /// Check that `got` equals `expected`.
    pub(crate) fn check_dim(expected: usize, got: usize) -> Result<(), LinalgError> {
        if expected == got {
            Ok(())
        } else {
            Err(LinalgError::DimensionMismatch { expected, got })
        }
    }

    /// Check that `index < extent`.
    pub(crate) fn check_index(index: usize, extent: usize) -> Result<(), LinalgError> {
        if index < extent {
            Ok(())
        } else {
            Err(LinalgError::IndexOutOfBounds { index, extent })
        }
    }
}
