// In-memory GloVe embedding table.
//
// Words and vectors are stored positionally (word i <-> vector i) with a
// word -> index map on the side, so lookups don't scan the whole vocabulary.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::delimited::{read_table, DelimitedFormat};
use super::traits::WordVectors;

/// Dimension of the glove.6B.50d vectors.
pub const DEFAULT_DIM: usize = 50;

/// Pre-trained word vectors, loaded once and immutable afterwards.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    words: Vec<String>,
    vectors: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
    dim: usize,
}

impl EmbeddingTable {
    /// Build a table from parallel word and vector lists.
    ///
    /// Every vector must have exactly `dim` values and words must be unique.
    pub fn from_rows(words: Vec<String>, vectors: Vec<Vec<f64>>, dim: usize) -> Result<Self> {
        if words.len() != vectors.len() {
            anyhow::bail!(
                "Embedding table has {} words but {} vectors",
                words.len(),
                vectors.len()
            );
        }

        let mut index = HashMap::with_capacity(words.len());
        for (i, (word, vector)) in words.iter().zip(&vectors).enumerate() {
            if vector.len() != dim {
                anyhow::bail!(
                    "Vector for {word:?} has {} values, expected {dim}",
                    vector.len()
                );
            }
            if index.insert(word.clone(), i).is_some() {
                anyhow::bail!("Duplicate word {word:?} in embedding table");
            }
        }

        Ok(Self {
            words,
            vectors,
            index,
            dim,
        })
    }

    /// Load an embedding table from a delimited text file.
    pub fn load(path: &Path, format: &DelimitedFormat, dim: usize) -> Result<Self> {
        let raw = read_table(path, format)?;
        let table = Self::from_rows(raw.row_names, raw.rows, dim)
            .with_context(|| format!("Invalid embedding table {}", path.display()))?;

        info!(
            path = %path.display(),
            words = table.len(),
            dim = dim,
            "Loaded embedding table"
        );

        Ok(table)
    }

    /// Stored vector for `word`, or the zero vector when it's out of vocabulary.
    pub fn lookup_with_fallback(&self, word: &str) -> Cow<'_, [f64]> {
        match self.get(word) {
            Some(v) => Cow::Borrowed(v),
            None => Cow::Owned(vec![0.0; self.dim]),
        }
    }

    /// Stored vector for `word`, if present.
    pub fn get(&self, word: &str) -> Option<&[f64]> {
        self.index.get(word).map(|&i| self.vectors[i].as_slice())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Vocabulary in file order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordVectors for EmbeddingTable {
    fn dim(&self) -> usize {
        self.dim
    }

    fn vector(&self, word: &str) -> Result<Cow<'_, [f64]>> {
        Ok(self.lookup_with_fallback(word))
    }
}
