//! linsolve-linalg: dense and sparse matrices with direct and iterative solvers
//!
//! Provides a row-major dense matrix with LU, Cholesky, inverse,
//! determinant and power-iteration eigen routines, a coordinate-keyed
//! sparse matrix, and Jacobi, Gauss-Seidel and Conjugate Gradient solvers
//! shared between the two storage types.

pub mod array;
pub mod decomposition;
pub mod dense;
pub mod error;
pub mod iterative;
pub mod solver;
pub mod sparse;

pub use array::NdArray;
pub use decomposition::{CholeskyDecomp, EigenDecomp, LuDecomp};
pub use dense::DenseMatrix;
pub use error::LinalgError;
pub use iterative::{IterativeMethod, IterativeResult, IterativeSolver, LinearOperator};
pub use solver::Method;
pub use sparse::SparseMatrix;
