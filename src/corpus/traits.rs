// Word-document matrix builder trait — swap-ready abstraction.
//
// The feature pipeline only needs (matrix, document ids, words, labels) for a
// corpus path. The default builder tokenizes a labelled TSV file, but any
// source of word-document weights can stand in.

use std::path::Path;

use anyhow::Result;

use super::matrix::WordDocMatrix;

/// Trait for turning a corpus into a word-document weight matrix.
pub trait WeightMatrixBuilder {
    fn build(&self, corpus: &Path) -> Result<WordDocMatrix>;
}
