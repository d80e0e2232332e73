//! Print a factorization or derived quantity of a dense matrix.
//!
//! linsolve decompose --matrix A.txt --kind lu

use std::path::Path;

use anyhow::Result;
use clap::Args;

use linsolve_io::read_dense_matrix;

#[derive(Args)]
pub struct DecomposeArgs {
    /// Square matrix: one whitespace-delimited row per line
    #[arg(long)]
    matrix: String,

    /// What to compute: lu, cholesky, inverse, det, or eigen
    #[arg(long, default_value = "lu")]
    kind: String,
}

pub fn run(args: DecomposeArgs) -> Result<()> {
    let a = read_dense_matrix(Path::new(&args.matrix))?;

    match args.kind.to_lowercase().as_str() {
        "lu" => {
            let lu = a.lu_factorization()?;
            println!("L:\n{}", lu.l);
            println!("U:\n{}", lu.u);
        }
        "cholesky" | "chol" => {
            let l = a.cholesky_decomposition()?;
            println!("L:\n{}", l);
        }
        "inverse" | "inv" => {
            println!("{}", a.inverse()?);
        }
        "det" | "determinant" => {
            println!("{}", a.determinant()?);
        }
        "eigen" => {
            let eig = a.eigen()?;
            for (value, vector) in eig.values.iter().zip(eig.vectors.iter()) {
                let formatted: Vec<String> = vector.iter().map(|v| format!("{:.6}", v)).collect();
                println!("{:.6}\t[{}]", value, formatted.join(", "));
            }
        }
        _ => anyhow::bail!("Unknown decomposition kind: {}", args.kind),
    }

    Ok(())
}
