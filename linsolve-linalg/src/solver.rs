#![allow(clippy::needless_range_loop)]
//! Dense linear system solvers.
//!
//! Each entry point takes a coefficient matrix `A` and right-hand side
//! `b` and returns `x` with `A * x = b`. Direct methods report a
//! non-finite answer as [`LinalgError::Singular`]; iterative methods run
//! with the dense cap of 100 iterations and report
//! [`LinalgError::NonConvergence`] when it is reached.

use tracing::warn;

use crate::decomposition::{back_substitution, forward_substitution, CholeskyDecomp, LuDecomp};
use crate::dense::DenseMatrix;
use crate::error::LinalgError;
use crate::iterative::{IterativeMethod, IterativeSolver, DEFAULT_TOL, DENSE_MAX_ITER};

/// Solution method for [`solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Lu,
    Cholesky,
    Jacobi,
    GaussSeidel,
    ConjugateGradient,
    GaussianElimination,
}

impl Method {
    /// The iterative kernel behind this method, if it has one.
    pub fn iterative(self) -> Option<IterativeMethod> {
        match self {
            Method::Jacobi => Some(IterativeMethod::Jacobi),
            Method::GaussSeidel => Some(IterativeMethod::GaussSeidel),
            Method::ConjugateGradient => Some(IterativeMethod::ConjugateGradient),
            Method::Lu | Method::Cholesky | Method::GaussianElimination => None,
        }
    }
}

/// Solve A * x = b with the chosen method.
pub fn solve(a: &DenseMatrix, b: &[f64], method: Method) -> Result<Vec<f64>, LinalgError> {
    match method {
        Method::Lu => solve_using_lu(a, b),
        Method::Cholesky => solve_using_cholesky(a, b),
        Method::Jacobi => solve_using_jacobi(a, b, DENSE_MAX_ITER, DEFAULT_TOL),
        Method::GaussSeidel => solve_using_gauss_seidel(a, b, DENSE_MAX_ITER, DEFAULT_TOL),
        Method::ConjugateGradient => {
            solve_using_conjugate_gradient(a, b, DENSE_MAX_ITER, DEFAULT_TOL)
        }
        Method::GaussianElimination => solve_using_gaussian_elimination(a, b),
    }
}

/// Factor A = L * U, then forward- and back-substitute.
pub fn solve_using_lu(a: &DenseMatrix, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let lu = LuDecomp::new(a)?;
    ensure_finite(lu.solve(b)?)
}

/// Factor A = L * L', then solve L * y = b and L' * x = y.
pub fn solve_using_cholesky(a: &DenseMatrix, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
    let chol = CholeskyDecomp::new(a)?;
    LinalgError::check_dim(a.nrows(), b.len())?;
    if !chol.is_positive_definite() {
        warn!("Cholesky factor has a non-positive pivot");
        return Err(LinalgError::NotPositiveDefinite);
    }
    let y = forward_substitution(&chol.l, b)?;
    let x = back_substitution(&chol.l.transpose(), &y)?;
    ensure_finite(x)
}

/// Jacobi iteration from the zero vector, stopping once successive
/// iterates differ by less than `tol` or after `max_iter` iterations.
pub fn solve_using_jacobi(
    a: &DenseMatrix,
    b: &[f64],
    max_iter: usize,
    tol: f64,
) -> Result<Vec<f64>, LinalgError> {
    solve_iterative(a, b, IterativeMethod::Jacobi, max_iter, tol)
}

/// Gauss-Seidel iteration with the same stopping rule as Jacobi.
pub fn solve_using_gauss_seidel(
    a: &DenseMatrix,
    b: &[f64],
    max_iter: usize,
    tol: f64,
) -> Result<Vec<f64>, LinalgError> {
    solve_iterative(a, b, IterativeMethod::GaussSeidel, max_iter, tol)
}

/// Unpreconditioned Conjugate Gradient; assumes A is SPD.
pub fn solve_using_conjugate_gradient(
    a: &DenseMatrix,
    b: &[f64],
    max_iter: usize,
    tol: f64,
) -> Result<Vec<f64>, LinalgError> {
    solve_iterative(a, b, IterativeMethod::ConjugateGradient, max_iter, tol)
}

fn solve_iterative(
    a: &DenseMatrix,
    b: &[f64],
    method: IterativeMethod,
    max_iter: usize,
    tol: f64,
) -> Result<Vec<f64>, LinalgError> {
    let solver = IterativeSolver::new(tol, max_iter);
    Ok(solver.solve(a, b, method)?.x)
}

/// Unpivoted elimination on the augmented matrix [A | b], then back-substitution.
pub fn solve_using_gaussian_elimination(
    a: &DenseMatrix,
    b: &[f64],
) -> Result<Vec<f64>, LinalgError> {
    a.ensure_square()?;
    let n = a.nrows();
    LinalgError::check_dim(n, b.len())?;

    let mut aug = DenseMatrix::zeros(n, n + 1);
    for i in 0..n {
        for j in 0..n {
            aug[(i, j)] = a[(i, j)];
        }
        aug[(i, n)] = b[i];
    }

    for i in 0..n.saturating_sub(1) {
        for k in (i + 1)..n {
            let factor = aug[(k, i)] / aug[(i, i)];
            for j in i..=n {
                aug[(k, j)] -= factor * aug[(i, j)];
            }
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += aug[(i, j)] * x[j];
        }
        x[i] = (aug[(i, n)] - sum) / aug[(i, i)];
    }

    ensure_finite(x)
}

fn ensure_finite(x: Vec<f64>) -> Result<Vec<f64>, LinalgError> {
    if x.iter().all(|v| v.is_finite()) {
        Ok(x)
    } else {
        warn!("Direct solve produced a non-finite solution");
        Err(LinalgError::Singular)
    }
}
