// Corpus handling — tokenization and the word-document weight matrix.

pub mod builder;
pub mod matrix;
pub mod tokenize;
pub mod traits;
