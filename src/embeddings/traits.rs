// Word vector source trait.
//
// The feature aggregator only needs "give me the vector for this word". The
// full table answers leniently (zero vector for unknown words), the per-corpus
// cache answers strictly (unknown words are an error), and the aggregator runs
// against either.

use std::borrow::Cow;

use anyhow::Result;

/// Anything that can map a word to a fixed-length embedding vector.
pub trait WordVectors {
    /// Length of every vector this source returns.
    fn dim(&self) -> usize;

    /// Vector for `word`, following the source's own out-of-vocabulary policy.
    fn vector(&self, word: &str) -> Result<Cow<'_, [f64]>>;
}
