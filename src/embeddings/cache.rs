// Per-corpus embedding cache.
//
// The full GloVe table has hundreds of thousands of rows, but a training
// corpus only touches a few thousand of them. The cache copies exactly that
// vocabulary out once, then every document aggregation reads from it.
//
// The cache is a plain value owned by whoever built it. Building a second
// cache for a different vocabulary yields a second value; nothing is shared.

use std::borrow::Cow;
use std::collections::HashMap;

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info};

use super::table::EmbeddingTable;
use super::traits::WordVectors;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Word was not part of the vocabulary the cache was built over
    #[error("word {0:?} is not in the embedding cache")]
    MissingWord(String),
}

/// Read-only restriction of an [`EmbeddingTable`] to one corpus vocabulary.
#[derive(Debug, Clone)]
pub struct EmbeddingCache {
    vectors: HashMap<String, Vec<f64>>,
    dim: usize,
    /// Cached words that were not in the embedding table (stored as zero vectors)
    oov_count: usize,
}

impl EmbeddingCache {
    /// Build a cache over `words`. Duplicates are collapsed; words missing
    /// from the table are cached as zero vectors.
    pub fn build<S: AsRef<str>>(table: &EmbeddingTable, words: &[S]) -> Self {
        let mut vectors = HashMap::with_capacity(words.len());
        let mut oov_count = 0;

        for word in words {
            let word = word.as_ref();
            if vectors.contains_key(word) {
                continue;
            }
            if !table.contains(word) {
                oov_count += 1;
                debug!(word = word, "Out-of-vocabulary word cached as zero vector");
            }
            vectors.insert(word.to_string(), table.lookup_with_fallback(word).into_owned());
        }

        info!(
            vocabulary = vectors.len(),
            out_of_vocabulary = oov_count,
            "Built embedding cache"
        );

        Self {
            vectors,
            dim: table.dim(),
            oov_count,
        }
    }

    /// Cached vector for `word`. Fails when the word wasn't part of the
    /// vocabulary this cache was built over.
    pub fn lookup_strict(&self, word: &str) -> Result<&[f64], LookupError> {
        self.vectors
            .get(word)
            .map(Vec::as_slice)
            .ok_or_else(|| LookupError::MissingWord(word.to_string()))
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of distinct cached words.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn oov_count(&self) -> usize {
        self.oov_count
    }
}

impl WordVectors for EmbeddingCache {
    fn dim(&self) -> usize {
        self.dim
    }

    fn vector(&self, word: &str) -> Result<Cow<'_, [f64]>> {
        Ok(Cow::Borrowed(self.lookup_strict(word)?))
    }
}
