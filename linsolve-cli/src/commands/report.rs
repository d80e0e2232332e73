//! Solve result printing shared by the solve subcommands.

use anyhow::Result;
use serde::Serialize;

/// What a solve subcommand prints.
#[derive(Debug, Serialize)]
pub struct SolveReport {
    pub method: String,
    pub n: usize,
    pub x: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual: Option<f64>,
    /// max |A x - b| over all rows.
    pub max_abs_error: f64,
}

impl SolveReport {
    pub fn new(method: &str, x: Vec<f64>, ax: &[f64], b: &[f64]) -> Self {
        let max_abs_error = ax
            .iter()
            .zip(b.iter())
            .map(|(l, r)| (l - r).abs())
            .fold(0.0, f64::max);
        Self {
            method: method.to_string(),
            n: x.len(),
            x,
            iterations: None,
            residual: None,
            max_abs_error,
        }
    }

    pub fn with_iterations(mut self, iterations: usize, residual: f64) -> Self {
        self.iterations = Some(iterations);
        self.residual = Some(residual);
        self
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }

        println!("Method: {}", self.method);
        if let Some(iterations) = self.iterations {
            println!("Iterations: {}", iterations);
        }
        if let Some(residual) = self.residual {
            println!("Residual: {:.3e}", residual);
        }
        println!("max |Ax - b|: {:.3e}", self.max_abs_error);
        for (i, v) in self.x.iter().enumerate() {
            println!("x[{}] = {:.10}", i, v);
        }
        Ok(())
    }
}
