pub mod decompose;
pub mod report;
pub mod solve;
pub mod sparse_solve;
