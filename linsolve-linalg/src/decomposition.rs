#![allow(clippy::needless_range_loop)]
//! Matrix decompositions and triangular solves.
//!
//! LU (Doolittle, unit-diagonal L, no pivoting), Cholesky, the LU-based
//! inverse, and the power-iteration eigen scheme. None of these guard
//! against zero pivots or non-SPD input: NaN and Infinity flow through to
//! the returned factors. The checked solve entry points live in
//! [`crate::solver`].

use tracing::{debug, warn};

use crate::dense::DenseMatrix;
use crate::error::LinalgError;

/// Power-iteration steps per eigenpair.
const POWER_MAX_ITER: usize = 100;
/// Stop once successive Rayleigh quotients differ by less than this.
const POWER_TOL: f64 = 1e-6;

/// Result of an LU factorization: A = L * U.
#[derive(Debug, Clone)]
pub struct LuDecomp {
    /// Unit lower triangular factor.
    pub l: DenseMatrix,
    /// Upper triangular factor.
    pub u: DenseMatrix,
}

impl LuDecomp {
    /// Factor a square matrix without pivoting.
    pub fn new(a: &DenseMatrix) -> Result<Self, LinalgError> {
        a.ensure_square()?;
        let n = a.nrows();
        let mut l = DenseMatrix::zeros(n, n);
        let mut u = DenseMatrix::zeros(n, n);

        for j in 0..n {
            l[(j, j)] = 1.0;

            for i in 0..=j {
                let mut sum = 0.0;
                for k in 0..i {
                    sum += l[(i, k)] * u[(k, j)];
                }
                u[(i, j)] = a[(i, j)] - sum;
            }

            for i in (j + 1)..n {
                let mut sum = 0.0;
                for k in 0..j {
                    sum += l[(i, k)] * u[(k, j)];
                }
                l[(i, j)] = (a[(i, j)] - sum) / u[(j, j)];
            }
        }

        Ok(LuDecomp { l, u })
    }

    /// Solve L * U * x = b.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
        LinalgError::check_dim(self.l.nrows(), b.len())?;
        let y = forward(&self.l, b);
        Ok(backward(&self.u, &y))
    }

    /// Inverse of the factored matrix, one column per unit vector.
    pub fn inverse(&self) -> DenseMatrix {
        let n = self.l.nrows();
        let mut inv = DenseMatrix::zeros(n, n);
        for i in 0..n {
            let mut e = vec![0.0; n];
            e[i] = 1.0;
            let y = forward(&self.l, &e);
            let x = backward(&self.u, &y);
            for j in 0..n {
                inv[(j, i)] = x[j];
            }
        }
        inv
    }
}

/// Result of a Cholesky decomposition.
#[derive(Debug, Clone)]
pub struct CholeskyDecomp {
    /// Lower triangular factor L such that A = L * L'.
    pub l: DenseMatrix,
}

impl CholeskyDecomp {
    /// Compute the Cholesky factor of a matrix assumed symmetric positive definite.
    ///
    /// Only the lower triangle of `a` is read. Non-SPD input yields NaN
    /// entries rather than an error; see [`CholeskyDecomp::is_positive_definite`].
    pub fn new(a: &DenseMatrix) -> Result<Self, LinalgError> {
        a.ensure_square()?;
        let n = a.nrows();
        let mut l = DenseMatrix::zeros(n, n);

        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[(j, k)] * l[(j, k)];
            }
            l[(j, j)] = (a[(j, j)] - sum).sqrt();

            for i in (j + 1)..n {
                let mut sum = 0.0;
                for k in 0..j {
                    sum += l[(i, k)] * l[(j, k)];
                }
                l[(i, j)] = (a[(i, j)] - sum) / l[(j, j)];
            }
        }

        Ok(CholeskyDecomp { l })
    }

    /// True when every diagonal entry of L is finite and strictly positive.
    pub fn is_positive_definite(&self) -> bool {
        self.l.diag().iter().all(|d| d.is_finite() && *d > 0.0)
    }

    /// Solve L * L' * x = b.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
        LinalgError::check_dim(self.l.nrows(), b.len())?;
        let y = forward(&self.l, b);
        Ok(backward(&self.l.transpose(), &y))
    }
}

/// Eigenvalue estimates from power iteration with deflation.
#[derive(Debug, Clone)]
pub struct EigenDecomp {
    /// One Rayleigh-quotient estimate per round, in extraction order.
    pub values: Vec<f64>,
    /// Unit-norm iterate for each round.
    pub vectors: Vec<Vec<f64>>,
}

impl EigenDecomp {
    /// Run `n` rounds of power iteration on a square matrix.
    ///
    /// Each round starts from the all-ones vector and stops once the
    /// Rayleigh quotient moves by less than `1e-6`, or after 100 steps.
    /// Between rounds the running matrix M is replaced by
    /// `(lambda * I - M)^-1 * M`. Only the first pair is reliable, and only
    /// for a well-separated real dominant eigenvalue.
    pub fn new(a: &DenseMatrix) -> Result<Self, LinalgError> {
        a.ensure_square()?;
        let n = a.nrows();
        let mut running = a.clone();
        let mut values = Vec::with_capacity(n);
        let mut vectors = Vec::with_capacity(n);

        for round in 0..n {
            let (lambda, x) = power_iteration(&running, round);
            values.push(lambda);
            vectors.push(x);

            if round + 1 < n {
                let shifted = DenseMatrix::scalar(n, lambda).subtract(&running)?;
                let inv = LuDecomp::new(&shifted)?.inverse();
                running = inv.multiply_matrix(&running)?;
            }
        }

        Ok(EigenDecomp { values, vectors })
    }
}

fn power_iteration(m: &DenseMatrix, round: usize) -> (f64, Vec<f64>) {
    let n = m.nrows();
    let mut x = vec![1.0; n];
    let mut lambda = 0.0;
    let mut lambda_prev = 0.0;

    for iter in 0..POWER_MAX_ITER {
        let y = m.mat_vec(&x);
        lambda = DenseMatrix::dot(&x, &y);
        if (lambda - lambda_prev).abs() < POWER_TOL {
            debug!("Power iteration round {} converged after {} steps: {}", round, iter + 1, lambda);
            return (lambda, x);
        }
        lambda_prev = lambda;
        let norm = DenseMatrix::dot(&y, &y).sqrt();
        x = y.iter().map(|v| v / norm).collect();
    }

    warn!(
        "Power iteration round {} did not converge in {} steps (last estimate {})",
        round, POWER_MAX_ITER, lambda
    );
    (lambda, x)
}

impl DenseMatrix {
    /// LU factorization without pivoting.
    pub fn lu_factorization(&self) -> Result<LuDecomp, LinalgError> {
        LuDecomp::new(self)
    }

    /// Cholesky factor L with A = L * L'.
    pub fn cholesky_decomposition(&self) -> Result<DenseMatrix, LinalgError> {
        Ok(CholeskyDecomp::new(self)?.l)
    }

    /// Inverse via one LU factorization and n triangular solve pairs.
    ///
    /// A singular matrix produces Infinity/NaN entries, not an error.
    pub fn inverse(&self) -> Result<DenseMatrix, LinalgError> {
        Ok(LuDecomp::new(self)?.inverse())
    }

    /// Dominant-eigenvalue power iteration with deflation.
    pub fn eigen(&self) -> Result<EigenDecomp, LinalgError> {
        EigenDecomp::new(self)
    }
}

/// Solve L * y = b for lower triangular L.
///
/// Reads only the diagonal and the entries left of it.
pub fn forward_substitution(l: &DenseMatrix, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
    l.ensure_square()?;
    LinalgError::check_dim(l.nrows(), b.len())?;
    Ok(forward(l, b))
}

/// Solve U * x = y for upper triangular U.
///
/// Reads only the diagonal and the entries right of it.
pub fn back_substitution(u: &DenseMatrix, y: &[f64]) -> Result<Vec<f64>, LinalgError> {
    u.ensure_square()?;
    LinalgError::check_dim(u.nrows(), y.len())?;
    Ok(backward(u, y))
}

fn forward(l: &DenseMatrix, b: &[f64]) -> Vec<f64> {
    let n = l.nrows();
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[(i, j)] * y[j];
        }
        y[i] = (b[i] - sum) / l[(i, i)];
    }
    y
}

fn backward(u: &DenseMatrix, y: &[f64]) -> Vec<f64> {
    let n = u.nrows();
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += u[(i, j)] * x[j];
        }
        x[i] = (y[i] - sum) / u[(i, i)];
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &DenseMatrix, b: &DenseMatrix, tol: f64) {
        assert_eq!(a.nrows(), b.nrows());
        assert_eq!(a.ncols(), b.ncols());
        for i in 0..a.nrows() {
            for j in 0..a.ncols() {
                assert!(
                    (a[(i, j)] - b[(i, j)]).abs() < tol,
                    "[{},{}]: {} vs {}",
                    i,
                    j,
                    a[(i, j)],
                    b[(i, j)]
                );
            }
        }
    }

    #[test]
    fn test_lu_reconstructs() {
        let a = DenseMatrix::from_rows(&[[2.0, 3.0, 2.0], [4.0, 5.0, 4.0], [6.0, 7.0, 8.0]]);
        let lu = a.lu_factorization().unwrap();
        for i in 0..3 {
            assert_eq!(lu.l[(i, i)], 1.0);
            for j in (i + 1)..3 {
                assert_eq!(lu.l[(i, j)], 0.0);
                assert_eq!(lu.u[(j, i)], 0.0);
            }
        }
        assert_close(&lu.l.multiply_matrix(&lu.u).unwrap(), &a, 1e-12);
    }

    #[test]
    fn test_lu_not_square() {
        let a = DenseMatrix::zeros(2, 3);
        assert_eq!(
            a.lu_factorization().unwrap_err(),
            LinalgError::NotSquare { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn test_lu_zero_pivot_propagates() {
        // Needs a row swap; without pivoting L picks up an infinite entry.
        let a = DenseMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]);
        let lu = a.lu_factorization().unwrap();
        assert!(!lu.l[(1, 0)].is_finite());
    }

    #[test]
    fn test_cholesky() {
        let a = DenseMatrix::from_rows(&[
            [4.0, 12.0, -16.0],
            [12.0, 37.0, -43.0],
            [-16.0, -43.0, 98.0],
        ]);
        let l = a.cholesky_decomposition().unwrap();
        let expected =
            DenseMatrix::from_rows(&[[2.0, 0.0, 0.0], [6.0, 1.0, 0.0], [-8.0, 5.0, 3.0]]);
        assert_close(&l, &expected, 1e-12);
        assert_close(&l.multiply_matrix(&l.transpose()).unwrap(), &a, 1e-12);
    }

    #[test]
    fn test_cholesky_not_pd_gives_nan() {
        let a = DenseMatrix::from_rows(&[[1.0, 3.0], [3.0, 1.0]]);
        let chol = CholeskyDecomp::new(&a).unwrap();
        assert!(chol.l[(1, 1)].is_nan());
        assert!(!chol.is_positive_definite());
    }

    #[test]
    fn test_cholesky_solve() {
        let a = DenseMatrix::from_rows(&[[4.0, 2.0, 1.0], [2.0, 5.0, 3.0], [1.0, 3.0, 6.0]]);
        let b = vec![1.0, 2.0, 3.0];
        let chol = CholeskyDecomp::new(&a).unwrap();
        assert!(chol.is_positive_definite());
        let x = chol.solve(&b).unwrap();
        let ax = a.multiply(&x).unwrap();
        for i in 0..3 {
            assert!(
                (ax[i] - b[i]).abs() < 1e-10,
                "ax[{}]={} != b[{}]={}",
                i,
                ax[i],
                i,
                b[i]
            );
        }
        assert!(chol.solve(&[1.0]).is_err());
    }

    #[test]
    fn test_inverse() {
        let a = DenseMatrix::from_rows(&[[4.0, 7.0], [2.0, 6.0]]);
        let inv = a.inverse().unwrap();
        assert_close(&a.multiply_matrix(&inv).unwrap(), &DenseMatrix::identity(2), 1e-12);
        assert_close(
            &inv,
            &DenseMatrix::from_rows(&[[0.6, -0.7], [-0.2, 0.4]]),
            1e-12,
        );
    }

    #[test]
    fn test_inverse_singular_is_not_finite() {
        let a = DenseMatrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]);
        let inv = a.inverse().unwrap();
        assert!(inv.as_slice().iter().any(|v| !v.is_finite()));
    }

    #[test]
    fn test_substitution() {
        let l = DenseMatrix::from_rows(&[[2.0, 0.0], [1.0, 4.0]]);
        let y = forward_substitution(&l, &[4.0, 10.0]).unwrap();
        assert_eq!(y, vec![2.0, 2.0]);

        let u = DenseMatrix::from_rows(&[[1.0, 2.0], [0.0, 4.0]]);
        let x = back_substitution(&u, &[10.0, 8.0]).unwrap();
        assert_eq!(x, vec![6.0, 2.0]);

        assert!(forward_substitution(&l, &[1.0]).is_err());
        assert!(back_substitution(&DenseMatrix::zeros(2, 3), &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_eigen_dominant_pair() {
        // Eigenvalues 5 and 2; the all-ones start is already the dominant eigenvector.
        let a = DenseMatrix::from_rows(&[[4.0, 1.0], [2.0, 3.0]]);
        let eig = a.eigen().unwrap();
        assert_eq!(eig.values.len(), 2);
        assert_eq!(eig.vectors.len(), 2);
        assert!((eig.values[0] - 5.0).abs() < 1e-9);
        let h = 0.5f64.sqrt();
        assert!((eig.vectors[0][0] - h).abs() < 1e-9);
        assert!((eig.vectors[0][1] - h).abs() < 1e-9);
    }

    #[test]
    fn test_eigen_diagonal() {
        let a = DenseMatrix::from_diag(&[2.0, 1.0]);
        let eig = a.eigen().unwrap();
        assert!((eig.values[0] - 2.0).abs() < 1e-5);
        assert!(eig.vectors[0][0] > 0.999);
    }

    #[test]
    fn test_eigen_exact_first_pair_poisons_later_rounds() {
        // lambda = 2 is found exactly, so lambda * I - M is the zero matrix and
        // every later round works on NaN and records NaN.
        let a = DenseMatrix::scalar(4, 2.0);
        let eig = a.eigen().unwrap();
        assert_eq!(eig.values.len(), 4);
        assert_eq!(eig.vectors.len(), 4);
        assert_eq!(eig.values[0], 2.0);
        assert_eq!(eig.vectors[0], vec![0.5; 4]);
        for round in 1..4 {
            assert!(eig.values[round].is_nan(), "round {}: {}", round, eig.values[round]);
            assert!(eig.vectors[round].iter().all(|v| v.is_nan()));
        }
    }

    #[test]
    fn test_eigen_not_square() {
        assert_eq!(
            DenseMatrix::zeros(3, 2).eigen().unwrap_err(),
            LinalgError::NotSquare { rows: 3, cols: 2 }
        );
    }
}
