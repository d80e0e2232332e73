#![allow(clippy::needless_range_loop)]
//! Stationary and Krylov iterative solvers.
//!
//! Jacobi, Gauss-Seidel and unpreconditioned Conjugate Gradient, written
//! once against [`LinearOperator`] so that dense and sparse storage share
//! the same kernels. Every method starts from the zero vector and is
//! bounded by `max_iter`.

use std::fmt;

use tracing::{debug, warn};

use crate::dense::DenseMatrix;
use crate::error::LinalgError;

/// Default convergence tolerance for all iterative methods.
pub const DEFAULT_TOL: f64 = 1e-6;
/// Iteration cap used by the dense solver layer.
pub const DENSE_MAX_ITER: usize = 100;
/// Iteration cap used by [`crate::SparseMatrix::solve_system`].
pub const SPARSE_MAX_ITER: usize = 1000;

/// Anything that can hand out entries and compute A * v.
pub trait LinearOperator {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;

    /// Entry (row, col); absent entries read as zero.
    fn entry(&self, row: usize, col: usize) -> f64;

    /// A * v with row sums accumulated in column order.
    fn apply(&self, v: &[f64]) -> Vec<f64>;
}

impl LinearOperator for DenseMatrix {
    fn nrows(&self) -> usize {
        DenseMatrix::nrows(self)
    }

    fn ncols(&self) -> usize {
        DenseMatrix::ncols(self)
    }

    fn entry(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    fn apply(&self, v: &[f64]) -> Vec<f64> {
        self.mat_vec(v)
    }
}

/// Iterative method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterativeMethod {
    Jacobi,
    GaussSeidel,
    #[default]
    ConjugateGradient,
}

impl fmt::Display for IterativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IterativeMethod::Jacobi => "Jacobi",
            IterativeMethod::GaussSeidel => "Gauss-Seidel",
            IterativeMethod::ConjugateGradient => "Conjugate Gradient",
        };
        f.write_str(name)
    }
}

/// Tolerance and iteration cap for an iterative solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterativeSolver {
    /// Convergence tolerance on the max-abs step (Jacobi, Gauss-Seidel)
    /// or max-abs residual (Conjugate Gradient).
    pub tol: f64,
    /// Maximum number of iterations.
    pub max_iter: usize,
}

impl Default for IterativeSolver {
    fn default() -> Self {
        Self {
            tol: DEFAULT_TOL,
            max_iter: SPARSE_MAX_ITER,
        }
    }
}

/// Result of an iterative solve.
#[derive(Debug, Clone, PartialEq)]
pub struct IterativeResult {
    /// Solution vector x.
    pub x: Vec<f64>,
    /// Number of iterations used.
    pub iterations: usize,
    /// Final convergence measure.
    pub residual: f64,
    /// Whether the solver converged.
    pub converged: bool,
}

impl IterativeSolver {
    /// Solver with an explicit tolerance and iteration cap.
    pub fn new(tol: f64, max_iter: usize) -> Self {
        Self { tol, max_iter }
    }

    /// Solve A * x = b, treating a non-converged run as an error.
    pub fn solve<A>(
        &self,
        a: &A,
        b: &[f64],
        method: IterativeMethod,
    ) -> Result<IterativeResult, LinalgError>
    where
        A: LinearOperator + ?Sized,
    {
        let result = self.iterate(a, b, method)?;
        if result.converged {
            Ok(result)
        } else {
            warn!(
                "{} did not converge after {} iterations (residual: {:.2e})",
                method, result.iterations, result.residual
            );
            Err(LinalgError::NonConvergence {
                method,
                iterations: result.iterations,
                residual: result.residual,
            })
        }
    }

    /// Run the chosen method and report how it ended.
    ///
    /// Only shape problems and zero diagonals (Jacobi, Gauss-Seidel) are
    /// errors here; running out of iterations or hitting NaN comes back
    /// with `converged == false`.
    pub fn iterate<A>(
        &self,
        a: &A,
        b: &[f64],
        method: IterativeMethod,
    ) -> Result<IterativeResult, LinalgError>
    where
        A: LinearOperator + ?Sized,
    {
        if a.nrows() != a.ncols() {
            return Err(LinalgError::NotSquare {
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }
        LinalgError::check_dim(a.nrows(), b.len())?;

        let result = match method {
            IterativeMethod::Jacobi => {
                check_diagonal(a)?;
                self.jacobi(a, b)
            }
            IterativeMethod::GaussSeidel => {
                check_diagonal(a)?;
                self.gauss_seidel(a, b)
            }
            IterativeMethod::ConjugateGradient => self.conjugate_gradient(a, b),
        };

        if result.converged {
            debug!(
                "{} converged after {} iterations (residual: {:.2e})",
                method, result.iterations, result.residual
            );
        }
        Ok(result)
    }

    fn jacobi<A: LinearOperator + ?Sized>(&self, a: &A, b: &[f64]) -> IterativeResult {
        let n = b.len();
        let mut x = vec![0.0; n];
        let mut residual = f64::INFINITY;

        for iter in 0..self.max_iter {
            let mut x_next = vec![0.0; n];
            for i in 0..n {
                let mut sum = 0.0;
                for j in 0..n {
                    if j != i {
                        sum += a.entry(i, j) * x[j];
                    }
                }
                x_next[i] = (b[i] - sum) / a.entry(i, i);
            }

            residual = max_abs_diff(&x, &x_next);
            if let Some(done) = self.check_step(x_next.as_slice(), iter + 1, residual) {
                return done;
            }
            x = x_next;
        }

        self.exhausted(x, residual)
    }

    fn gauss_seidel<A: LinearOperator + ?Sized>(&self, a: &A, b: &[f64]) -> IterativeResult {
        let n = b.len();
        let mut x = vec![0.0; n];
        let mut residual = f64::INFINITY;

        for iter in 0..self.max_iter {
            let mut x_next = vec![0.0; n];
            for i in 0..n {
                let mut updated = 0.0;
                for j in 0..i {
                    updated += a.entry(i, j) * x_next[j];
                }
                let mut pending = 0.0;
                for j in (i + 1)..n {
                    pending += a.entry(i, j) * x[j];
                }
                x_next[i] = (b[i] - updated - pending) / a.entry(i, i);
            }

            residual = max_abs_diff(&x, &x_next);
            if let Some(done) = self.check_step(x_next.as_slice(), iter + 1, residual) {
                return done;
            }
            x = x_next;
        }

        self.exhausted(x, residual)
    }

    // The residual is kept as r = A*x - b, so x moves against p.
    fn conjugate_gradient<A: LinearOperator + ?Sized>(&self, a: &A, b: &[f64]) -> IterativeResult {
        let n = b.len();
        let mut x = vec![0.0; n];

        let ax = a.apply(&x);
        let mut r: Vec<f64> = ax.iter().zip(b.iter()).map(|(ai, bi)| ai - bi).collect();
        let mut p = r.clone();

        for iter in 0..self.max_iter {
            let residual = max_abs(&r);
            if let Some(done) = self.check_step(x.as_slice(), iter, residual) {
                return done;
            }

            let ap = a.apply(&p);
            let rr = DenseMatrix::dot(&r, &r);
            let alpha = rr / DenseMatrix::dot(&p, &ap);

            for i in 0..n {
                x[i] -= alpha * p[i];
            }

            let r_next: Vec<f64> = r.iter().zip(ap.iter()).map(|(ri, api)| ri - alpha * api).collect();
            let beta = DenseMatrix::dot(&r_next, &r_next) / rr;

            for i in 0..n {
                p[i] = r_next[i] + beta * p[i];
            }
            r = r_next;
        }

        let residual = max_abs(&r);
        match self.check_step(x.as_slice(), self.max_iter, residual) {
            Some(done) => done,
            None => self.exhausted(x, residual),
        }
    }

    /// Finished result if `residual` is below tolerance or has gone NaN.
    fn check_step(&self, x: &[f64], iterations: usize, residual: f64) -> Option<IterativeResult> {
        if residual < self.tol || residual.is_nan() {
            Some(IterativeResult {
                x: x.to_vec(),
                iterations,
                residual,
                converged: residual < self.tol,
            })
        } else {
            None
        }
    }

    fn exhausted(&self, x: Vec<f64>, residual: f64) -> IterativeResult {
        IterativeResult {
            x,
            iterations: self.max_iter,
            residual,
            converged: false,
        }
    }
}

fn check_diagonal<A: LinearOperator + ?Sized>(a: &A) -> Result<(), LinalgError> {
    match (0..a.nrows()).find(|&i| a.entry(i, i) == 0.0) {
        Some(row) => Err(LinalgError::ZeroDiagonal { row }),
        None => Ok(()),
    }
}

/// Largest absolute component; NaN anywhere makes the result NaN.
fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |m, x| {
        let a = x.abs();
        if a.is_nan() || a > m {
            a
        } else {
            m
        }
    })
}

fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    let diff: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| x - y).collect();
    max_abs(&diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spd() -> DenseMatrix {
        DenseMatrix::from_rows(&[[4.0, 2.0, 1.0], [2.0, 5.0, 3.0], [1.0, 3.0, 6.0]])
    }

    fn check_solution(a: &DenseMatrix, x: &[f64], b: &[f64], tol: f64) {
        let ax = a.multiply(x).unwrap();
        for i in 0..b.len() {
            assert!(
                (ax[i] - b[i]).abs() < tol,
                "ax[{}]={} != b[{}]={}",
                i,
                ax[i],
                i,
                b[i]
            );
        }
    }

    #[test]
    fn test_default_config() {
        let s = IterativeSolver::default();
        assert_eq!(s.tol, 1e-6);
        assert_eq!(s.max_iter, 1000);
        assert_eq!(IterativeMethod::default(), IterativeMethod::ConjugateGradient);
    }

    #[test]
    fn test_all_methods_on_spd() {
        let a = spd();
        let b = vec![1.0, 2.0, 3.0];
        let solver = IterativeSolver::default();
        for method in [
            IterativeMethod::Jacobi,
            IterativeMethod::GaussSeidel,
            IterativeMethod::ConjugateGradient,
        ] {
            let result = solver.solve(&a, &b, method).unwrap();
            assert!(result.converged, "{} did not converge", method);
            assert!(result.iterations <= solver.max_iter);
            check_solution(&a, &result.x, &b, 1e-5);
        }
    }

    #[test]
    fn test_gauss_seidel_beats_jacobi() {
        let a = spd();
        let b = vec![1.0, 2.0, 3.0];
        let solver = IterativeSolver::default();
        let jac = solver.iterate(&a, &b, IterativeMethod::Jacobi).unwrap();
        let gs = solver.iterate(&a, &b, IterativeMethod::GaussSeidel).unwrap();
        assert!(gs.iterations < jac.iterations);
    }

    #[test]
    fn test_cg_identity_converges_in_one_step() {
        let a = DenseMatrix::identity(3);
        let b = vec![1.0, 2.0, 3.0];
        let result = IterativeSolver::default()
            .solve(&a, &b, IterativeMethod::ConjugateGradient)
            .unwrap();
        assert_eq!(result.iterations, 1);
        for i in 0..3 {
            assert!((result.x[i] - b[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_rhs_returns_zero() {
        let a = spd();
        let result = IterativeSolver::default()
            .solve(&a, &[0.0, 0.0, 0.0], IterativeMethod::ConjugateGradient)
            .unwrap();
        assert_eq!(result.iterations, 0);
        assert_eq!(result.x, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let a = spd();
        let b = vec![1.0, 2.0, 3.0];
        let solver = IterativeSolver::new(1e-12, 2);
        let raw = solver.iterate(&a, &b, IterativeMethod::Jacobi).unwrap();
        assert!(!raw.converged);
        assert_eq!(raw.iterations, 2);

        match solver.solve(&a, &b, IterativeMethod::Jacobi) {
            Err(LinalgError::NonConvergence {
                method, iterations, ..
            }) => {
                assert_eq!(method, IterativeMethod::Jacobi);
                assert_eq!(iterations, 2);
            }
            other => panic!("expected NonConvergence, got {:?}", other),
        }
    }

    #[test]
    fn test_divergent_jacobi_hits_cap() {
        // Not diagonally dominant: Jacobi iterates blow up.
        let a = DenseMatrix::from_rows(&[[1.0, 3.0], [3.0, 1.0]]);
        let err = IterativeSolver::new(DEFAULT_TOL, DENSE_MAX_ITER)
            .solve(&a, &[1.0, 1.0], IterativeMethod::Jacobi)
            .unwrap_err();
        assert!(matches!(err, LinalgError::NonConvergence { .. }));
    }

    #[test]
    fn test_zero_diagonal_rejected() {
        let a = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 0.0]]);
        let solver = IterativeSolver::default();
        for method in [IterativeMethod::Jacobi, IterativeMethod::GaussSeidel] {
            assert_eq!(
                solver.solve(&a, &[1.0, 1.0], method).unwrap_err(),
                LinalgError::ZeroDiagonal { row: 1 }
            );
        }
    }

    #[test]
    fn test_shape_errors() {
        let solver = IterativeSolver::default();
        assert_eq!(
            solver
                .solve(&DenseMatrix::zeros(2, 3), &[1.0, 1.0], IterativeMethod::Jacobi)
                .unwrap_err(),
            LinalgError::NotSquare { rows: 2, cols: 3 }
        );
        assert_eq!(
            solver
                .solve(&spd(), &[1.0, 1.0], IterativeMethod::ConjugateGradient)
                .unwrap_err(),
            LinalgError::DimensionMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_max_abs_propagates_nan() {
        assert_eq!(max_abs(&[1.0, -3.0, 2.0]), 3.0);
        assert!(max_abs(&[1.0, f64::NAN, 2.0]).is_nan());
        assert!(max_abs(&[f64::NAN, 5.0]).is_nan());
        assert_eq!(max_abs(&[]), 0.0);
    }
}
