// Document features — per-document aggregation and the corpus feature matrix.

pub mod aggregate;
pub mod matrix;
