//! linsolve-io: file formats for linsolve matrices
//!
//! Dense matrices and vectors as whitespace-delimited text, sparse
//! matrices as MatrixMarket coordinate files.

pub mod dense_io;
pub mod mtx;

pub use dense_io::{read_dense_matrix, read_vector, write_dense_matrix};
pub use mtx::{read_matrix_market, write_matrix_market};
