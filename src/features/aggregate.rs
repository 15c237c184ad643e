// Document feature aggregation.
//
// A document arrives as a row of per-word weights aligned with the corpus
// vocabulary. Its feature vector is a mean of the embeddings of its words,
// either weighted by those weights (default) or an unweighted mean over the
// words with nonzero weight.

use anyhow::Result;
use thiserror::Error;

use crate::embeddings::traits::WordVectors;

/// Which mean to take over a document's word vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// Σ wᵢ·vᵢ / Σ wᵢ
    #[default]
    Weighted,
    /// Mean of vᵢ over words with wᵢ ≠ 0
    Unweighted,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    /// Row and vocabulary have different lengths
    #[error("document row has {row} weights but the vocabulary has {words} words")]
    LengthMismatch { row: usize, words: usize },

    /// No nonzero weight, or weights summing to exactly zero
    #[error("document has no weighted words")]
    EmptyDocument,

    /// Weights overflowed or contained NaN
    #[error("document weights sum to a non-finite total ({total})")]
    NonFiniteWeight { total: f64 },
}

/// Aggregate one document with the chosen strategy.
pub fn aggregate<V: WordVectors + ?Sized>(
    aggregation: Aggregation,
    row: &[f64],
    words: &[String],
    vectors: &V,
) -> Result<Vec<f64>> {
    match aggregation {
        Aggregation::Weighted => weighted_mean(row, words, vectors),
        Aggregation::Unweighted => unweighted_mean(row, words, vectors),
    }
}

/// Weighted mean of word vectors, weights taken from `row`.
///
/// Words with zero weight are not looked up. Fails with
/// [`AggregateError::EmptyDocument`] when the weights sum to zero and with
/// [`AggregateError::NonFiniteWeight`] when they overflow or include NaN.
pub fn weighted_mean<V: WordVectors + ?Sized>(
    row: &[f64],
    words: &[String],
    vectors: &V,
) -> Result<Vec<f64>> {
    check_lengths(row, words)?;

    let mut sum = vec![0.0_f64; vectors.dim()];
    let mut total = 0.0_f64;

    for (&weight, word) in row.iter().zip(words) {
        if weight == 0.0 {
            continue;
        }
        total += weight;
        let vec = vectors.vector(word)?;
        for (s, &v) in sum.iter_mut().zip(vec.iter()) {
            *s += weight * v;
        }
    }

    if !total.is_finite() {
        return Err(AggregateError::NonFiniteWeight { total }.into());
    }
    if total == 0.0 {
        return Err(AggregateError::EmptyDocument.into());
    }

    for s in &mut sum {
        *s /= total;
    }
    Ok(sum)
}

/// Plain mean of the vectors of words with nonzero weight.
pub fn unweighted_mean<V: WordVectors + ?Sized>(
    row: &[f64],
    words: &[String],
    vectors: &V,
) -> Result<Vec<f64>> {
    check_lengths(row, words)?;

    let mut sum = vec![0.0_f64; vectors.dim()];
    let mut count = 0usize;

    for (&weight, word) in row.iter().zip(words) {
        if weight == 0.0 {
            continue;
        }
        count += 1;
        let vec = vectors.vector(word)?;
        for (s, &v) in sum.iter_mut().zip(vec.iter()) {
            *s += v;
        }
    }

    if count == 0 {
        return Err(AggregateError::EmptyDocument.into());
    }

    let n = count as f64;
    for s in &mut sum {
        *s /= n;
    }
    Ok(sum)
}

fn check_lengths(row: &[f64], words: &[String]) -> Result<(), AggregateError> {
    if row.len() != words.len() {
        return Err(AggregateError::LengthMismatch {
            row: row.len(),
            words: words.len(),
        });
    }
    Ok(())
}

/// True when `err` is (or wraps) [`AggregateError::EmptyDocument`].
pub fn is_empty_document(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<AggregateError>(),
        Some(AggregateError::EmptyDocument)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::table::EmbeddingTable;

    fn table() -> EmbeddingTable {
        EmbeddingTable::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            2,
        )
        .unwrap()
    }

    fn words() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn test_weighted_uneven() {
        let v = weighted_mean(&[3.0, 1.0], &words(), &table()).unwrap();
        assert!((v[0] - 0.75).abs() < 1e-12);
        assert!((v[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_unweighted_ignores_magnitude() {
        let v = unweighted_mean(&[3.0, 1.0], &words(), &table()).unwrap();
        assert!((v[0] - 0.5).abs() < 1e-12);
        assert!((v[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unweighted_skips_zero_weight() {
        let v = unweighted_mean(&[0.0, 4.0], &words(), &table()).unwrap();
        assert_eq!(v, vec![0.0, 1.0]);
    }

    #[test]
    fn test_unweighted_empty_document() {
        let err = unweighted_mean(&[0.0, 0.0], &words(), &table()).unwrap_err();
        assert!(is_empty_document(&err));
    }

    #[test]
    fn test_weighted_cancelling_weights_is_empty() {
        let err = weighted_mean(&[1.0, -1.0], &words(), &table()).unwrap_err();
        assert!(is_empty_document(&err));
    }

    #[test]
    fn test_weighted_overflowing_total() {
        let err = weighted_mean(&[f64::MAX, f64::MAX], &words(), &table()).unwrap_err();
        assert!(!is_empty_document(&err));
        assert!(matches!(
            err.downcast_ref::<AggregateError>(),
            Some(AggregateError::NonFiniteWeight { total }) if total.is_infinite()
        ));
    }

    #[test]
    fn test_weighted_nan_weight() {
        let err = weighted_mean(&[f64::NAN, 1.0], &words(), &table()).unwrap_err();
        assert!(!is_empty_document(&err));
        assert!(matches!(
            err.downcast_ref::<AggregateError>(),
            Some(AggregateError::NonFiniteWeight { total }) if total.is_nan()
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let err = weighted_mean(&[1.0], &words(), &table()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AggregateError>(),
            Some(&AggregateError::LengthMismatch { row: 1, words: 2 })
        );
        assert!(!is_empty_document(&err));
    }

    #[test]
    fn test_aggregate_dispatch() {
        let w = aggregate(Aggregation::Weighted, &[3.0, 1.0], &words(), &table()).unwrap();
        let u = aggregate(Aggregation::Unweighted, &[3.0, 1.0], &words(), &table()).unwrap();
        assert_ne!(w, u);
    }
}
