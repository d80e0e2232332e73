//! Solve a sparse linear system.
//!
//! linsolve sparse-solve --matrix A.mtx --rhs b.txt --method cg

use std::path::Path;

use anyhow::Result;
use clap::Args;
use tracing::info;

use linsolve_io::{read_matrix_market, read_vector};
use linsolve_linalg::iterative::{DEFAULT_TOL, SPARSE_MAX_ITER};
use linsolve_linalg::{IterativeMethod, IterativeSolver};

use super::report::SolveReport;

#[derive(Args)]
pub struct SparseSolveArgs {
    /// Coefficient matrix in MatrixMarket coordinate format
    #[arg(long)]
    matrix: String,

    /// Right-hand side vector
    #[arg(long)]
    rhs: String,

    /// Method: jacobi, gauss-seidel, or cg
    #[arg(long, default_value = "cg")]
    method: String,

    /// Convergence tolerance
    #[arg(long, default_value_t = DEFAULT_TOL)]
    tol: f64,

    /// Maximum iterations
    #[arg(long, default_value_t = SPARSE_MAX_ITER)]
    max_iter: usize,

    /// Print the result as JSON
    #[arg(long, default_value = "false")]
    json: bool,
}

/// Map a CLI method name onto an iterative kernel.
pub fn parse_iterative_method(name: &str) -> Result<IterativeMethod> {
    let method = match name.to_lowercase().as_str() {
        "jacobi" => IterativeMethod::Jacobi,
        "gauss-seidel" | "gs" => IterativeMethod::GaussSeidel,
        "cg" | "conjugate-gradient" => IterativeMethod::ConjugateGradient,
        _ => anyhow::bail!("Unknown iterative method: {}", name),
    };
    Ok(method)
}

pub fn run(args: SparseSolveArgs) -> Result<()> {
    let method = parse_iterative_method(&args.method)?;
    let a = read_matrix_market(Path::new(&args.matrix))?;
    let b = read_vector(Path::new(&args.rhs))?;
    info!(
        "Solving {}x{} sparse system ({} stored entries) with {}",
        a.nrows(),
        a.ncols(),
        a.nnz(),
        method
    );

    let result = IterativeSolver::new(args.tol, args.max_iter).solve(&a, &b, method)?;
    let ax = a.multiply(&result.x)?;
    SolveReport::new(&args.method, result.x, &ax, &b)
        .with_iterations(result.iterations, result.residual)
        .print(args.json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iterative_method() {
        assert_eq!(parse_iterative_method("jacobi").unwrap(), IterativeMethod::Jacobi);
        assert_eq!(
            parse_iterative_method("Gauss-Seidel").unwrap(),
            IterativeMethod::GaussSeidel
        );
        assert!(parse_iterative_method("lu").is_err());
    }
}
