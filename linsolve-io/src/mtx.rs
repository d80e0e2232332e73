//! Sparse matrix reader/writer in MatrixMarket coordinate format.
//!
//! Header line `%%MatrixMarket matrix coordinate real general|symmetric`,
//! then `%` comments, a size line `nrows ncols nnz`, and one
//! `row col value` entry per line with 1-based indices. Symmetric files
//! store one triangle; the reader mirrors off-diagonal entries. Repeated
//! coordinates are summed.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use linsolve_linalg::SparseMatrix;

const BANNER: &str = "%%MatrixMarket";

/// Read a sparse matrix from a MatrixMarket coordinate file.
pub fn read_matrix_market(path: &Path) -> Result<SparseMatrix> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read MatrixMarket file: {}", path.display()))?;
    let matrix = parse_matrix_market(&contents)
        .with_context(|| format!("Malformed MatrixMarket file: {}", path.display()))?;
    info!(
        "Loaded {}x{} sparse matrix with {} stored entries from {}",
        matrix.nrows(),
        matrix.ncols(),
        matrix.nnz(),
        path.display()
    );
    Ok(matrix)
}

/// Parse MatrixMarket coordinate text.
pub fn parse_matrix_market(contents: &str) -> Result<SparseMatrix> {
    let mut lines = contents.lines();

    let banner = lines.next().unwrap_or_default();
    let fields: Vec<String> = banner.split_whitespace().map(|s| s.to_lowercase()).collect();
    if fields.len() < 5 || !fields[0].eq_ignore_ascii_case(BANNER) {
        bail!("Missing MatrixMarket banner line");
    }
    if fields[1] != "matrix" || fields[2] != "coordinate" {
        bail!("Only 'matrix coordinate' files are supported, got '{}'", banner.trim());
    }
    if fields[3] != "real" && fields[3] != "integer" {
        bail!("Unsupported field type '{}'", fields[3]);
    }
    let symmetric = match fields[4].as_str() {
        "general" => false,
        "symmetric" => true,
        other => bail!("Unsupported symmetry '{}'", other),
    };

    let mut body = lines
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('%'));

    let size_line = body
        .next()
        .ok_or_else(|| anyhow::anyhow!("Missing size line"))?;
    let size: Vec<usize> = size_line
        .split_whitespace()
        .map(|s| s.parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Invalid size line: '{}'", size_line))?;
    if size.len() != 3 {
        bail!("Size line must be 'nrows ncols nnz', got '{}'", size_line);
    }
    let (nrows, ncols, nnz) = (size[0], size[1], size[2]);

    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut vals = Vec::new();
    let mut count = 0;
    for line in body {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            bail!("Entry line must be 'row col value', got '{}'", line);
        }
        let row = one_based(fields[0])?;
        let col = one_based(fields[1])?;
        let val: f64 = fields[2]
            .parse()
            .with_context(|| format!("Invalid value '{}'", fields[2]))?;

        rows.push(row);
        cols.push(col);
        vals.push(val);
        if symmetric && row != col {
            rows.push(col);
            cols.push(row);
            vals.push(val);
        }
        count += 1;
    }

    if count != nnz {
        bail!("Header declares {} entries but file has {}", nnz, count);
    }
    Ok(SparseMatrix::from_triplets(nrows, ncols, &rows, &cols, &vals)?)
}

fn one_based(field: &str) -> Result<usize> {
    let idx: usize = field
        .parse()
        .with_context(|| format!("Invalid index '{}'", field))?;
    if idx == 0 {
        bail!("MatrixMarket indices are 1-based, got 0");
    }
    Ok(idx - 1)
}

/// Write a sparse matrix as a `general` MatrixMarket coordinate file.
pub fn write_matrix_market(matrix: &SparseMatrix, path: &Path) -> Result<()> {
    use std::io::Write;

    let mut f = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writeln!(f, "{} matrix coordinate real general", BANNER)?;

    let entries = matrix.triplets();
    writeln!(f, "{} {} {}", matrix.nrows(), matrix.ncols(), entries.len())?;
    for (i, j, v) in entries {
        writeln!(f, "{} {} {:e}", i + 1, j + 1, v)?;
    }

    info!("Wrote {} entries to {}", matrix.nnz(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as IoWrite;

    #[test]
    fn test_read_symmetric() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mtx");

        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "%%MatrixMarket matrix coordinate real symmetric").unwrap();
        writeln!(f, "% lower triangle only").unwrap();
        writeln!(f, "3 3 4").unwrap();
        writeln!(f, "1 1 -4.0").unwrap();
        writeln!(f, "2 2 4.0").unwrap();
        writeln!(f, "3 2 -1.0").unwrap();
        writeln!(f, "3 3 1.0").unwrap();

        let m = read_matrix_market(&path).unwrap();
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.nnz(), 5);
        assert_eq!(m.get(0, 0).unwrap(), -4.0);
        assert_eq!(m.get(2, 1).unwrap(), -1.0);
        assert_eq!(m.get(1, 2).unwrap(), -1.0);
        assert_eq!(m.get(0, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.mtx");

        let m = SparseMatrix::from_triplets(2, 3, &[0, 1, 1], &[2, 0, 1], &[0.125, -3.5, 1e-9])
            .unwrap();
        write_matrix_market(&m, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("%%MatrixMarket matrix coordinate real general\n2 3 3\n1 3 "));

        let back = read_matrix_market(&path).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_repeated_coordinates_sum() {
        let text = "%%MatrixMarket matrix coordinate real general\n\
                    2 2 3\n1 1 2.0\n1 1 3.0\n2 2 1.0\n";
        let m = parse_matrix_market(text).unwrap();
        assert_eq!(m.get(0, 0).unwrap(), 5.0);
        assert_eq!(m.get(1, 1).unwrap(), 1.0);
        assert_eq!(m.nnz(), 2);

        let expected =
            SparseMatrix::from_triplets(2, 2, &[0, 0, 1], &[0, 0, 1], &[2.0, 3.0, 1.0]).unwrap();
        assert_eq!(m, expected);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_matrix_market("").is_err());
        assert!(parse_matrix_market("%%MatrixMarket matrix array real general\n2 2\n").is_err());
        assert!(parse_matrix_market(
            "%%MatrixMarket matrix coordinate real general\n2 2 1\n0 1 1.0\n"
        )
        .is_err());
        // Entry outside the declared shape.
        assert!(parse_matrix_market(
            "%%MatrixMarket matrix coordinate real general\n2 2 1\n3 1 1.0\n"
        )
        .is_err());
        // Count mismatch.
        assert!(parse_matrix_market(
            "%%MatrixMarket matrix coordinate real general\n2 2 2\n1 1 1.0\n"
        )
        .is_err());
    }
}
