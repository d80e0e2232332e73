//! Whitespace-delimited dense matrix and vector files.
//!
//! One matrix row per line, entries separated by tabs or spaces. Blank
//! lines and lines starting with `#` are skipped. Vectors may be written
//! one value per line or all on one line.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use linsolve_linalg::DenseMatrix;

/// Read a dense matrix from a text file.
pub fn read_dense_matrix(path: &Path) -> Result<DenseMatrix> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read matrix file: {}", path.display()))?;
    let matrix = parse_dense_matrix(&contents)
        .with_context(|| format!("Malformed matrix file: {}", path.display()))?;
    info!(
        "Loaded {}x{} dense matrix from {}",
        matrix.nrows(),
        matrix.ncols(),
        path.display()
    );
    Ok(matrix)
}

/// Parse dense matrix text.
pub fn parse_dense_matrix(contents: &str) -> Result<DenseMatrix> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (lineno, line) in data_lines(contents) {
        let row = parse_values(line).with_context(|| format!("line {}", lineno))?;
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                bail!(
                    "line {}: expected {} columns, found {}",
                    lineno,
                    first.len(),
                    row.len()
                );
            }
        }
        rows.push(row);
    }
    if rows.is_empty() {
        bail!("No matrix rows found");
    }
    Ok(DenseMatrix::from_rows(&rows))
}

/// Write a dense matrix, one tab-separated row per line.
pub fn write_dense_matrix(matrix: &DenseMatrix, path: &Path) -> Result<()> {
    std::fs::write(path, matrix.to_string())
        .with_context(|| format!("Failed to write matrix file: {}", path.display()))?;
    info!(
        "Wrote {}x{} dense matrix to {}",
        matrix.nrows(),
        matrix.ncols(),
        path.display()
    );
    Ok(())
}

/// Read a vector of values from a text file.
pub fn read_vector(path: &Path) -> Result<Vec<f64>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read vector file: {}", path.display()))?;
    parse_vector(&contents).with_context(|| format!("Malformed vector file: {}", path.display()))
}

/// Parse vector text: every value on every data line, in order.
pub fn parse_vector(contents: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for (lineno, line) in data_lines(contents) {
        values.extend(parse_values(line).with_context(|| format!("line {}", lineno))?);
    }
    Ok(values)
}

fn data_lines(contents: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    contents
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
}

fn parse_values(line: &str) -> Result<Vec<f64>> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .with_context(|| format!("Invalid number '{}'", s))
        })
        .collect()
}
