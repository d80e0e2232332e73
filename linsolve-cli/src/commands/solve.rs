//! Solve a dense linear system.
//!
//! linsolve solve --matrix A.txt --rhs b.txt --method lu

use std::path::Path;

use anyhow::Result;
use clap::Args;
use tracing::info;

use linsolve_io::{read_dense_matrix, read_vector};
use linsolve_linalg::iterative::{DEFAULT_TOL, DENSE_MAX_ITER};
use linsolve_linalg::solver::{self, Method};
use linsolve_linalg::IterativeSolver;

use super::report::SolveReport;

#[derive(Args)]
pub struct SolveArgs {
    /// Coefficient matrix: one whitespace-delimited row per line
    #[arg(long)]
    matrix: String,

    /// Right-hand side vector
    #[arg(long)]
    rhs: String,

    /// Method: lu, cholesky, jacobi, gauss-seidel, cg, or gaussian
    #[arg(long, default_value = "lu")]
    method: String,

    /// Convergence tolerance for iterative methods
    #[arg(long, default_value_t = DEFAULT_TOL)]
    tol: f64,

    /// Maximum iterations for iterative methods
    #[arg(long, default_value_t = DENSE_MAX_ITER)]
    max_iter: usize,

    /// Print the result as JSON
    #[arg(long, default_value = "false")]
    json: bool,
}

/// Map a CLI method name onto a dense solver method.
pub fn parse_method(name: &str) -> Result<Method> {
    let method = match name.to_lowercase().as_str() {
        "lu" => Method::Lu,
        "cholesky" | "chol" => Method::Cholesky,
        "jacobi" => Method::Jacobi,
        "gauss-seidel" | "gs" => Method::GaussSeidel,
        "cg" | "conjugate-gradient" => Method::ConjugateGradient,
        "gaussian" | "gauss" => Method::GaussianElimination,
        _ => anyhow::bail!("Unknown method: {}", name),
    };
    Ok(method)
}

pub fn run(args: SolveArgs) -> Result<()> {
    let method = parse_method(&args.method)?;
    let a = read_dense_matrix(Path::new(&args.matrix))?;
    let b = read_vector(Path::new(&args.rhs))?;
    info!("Solving {}x{} system with {:?}", a.nrows(), a.ncols(), method);

    let report = match method.iterative() {
        Some(kind) => {
            let result = IterativeSolver::new(args.tol, args.max_iter).solve(&a, &b, kind)?;
            let ax = a.multiply(&result.x)?;
            SolveReport::new(&args.method, result.x, &ax, &b)
                .with_iterations(result.iterations, result.residual)
        }
        None => {
            let x = solver::solve(&a, &b, method)?;
            let ax = a.multiply(&x)?;
            SolveReport::new(&args.method, x, &ax, &b)
        }
    };

    report.print(args.json)
}
