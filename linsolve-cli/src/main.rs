//! linsolve: dense and sparse linear system solver.
//!
//! CLI entry point using clap for argument parsing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "linsolve",
    version,
    about = "Solve dense and sparse linear systems",
    long_about = "Factor matrices and solve A x = b with LU, Cholesky, Gaussian elimination,\n\
                   Jacobi, Gauss-Seidel or Conjugate Gradient."
)]
struct Cli {
    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a dense system read from whitespace-delimited text
    Solve(commands::solve::SolveArgs),

    /// Solve a sparse system read from a MatrixMarket file
    SparseSolve(commands::sparse_solve::SparseSolveArgs),

    /// Print a factorization, inverse, determinant or eigen estimate
    Decompose(commands::decompose::DecomposeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("linsolve v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Solve(args) => commands::solve::run(args),
        Commands::SparseSolve(args) => commands::sparse_solve::run(args),
        Commands::Decompose(args) => commands::decompose::run(args),
    }
}
