// Feature matrix construction for a whole corpus.
//
// Order matters here: the embedding cache is built over the full corpus
// vocabulary *before* any document is aggregated, so every strict cache
// lookup during aggregation is guaranteed to hit.

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::aggregate::{aggregate, is_empty_document, Aggregation};
use crate::corpus::matrix::WordDocMatrix;
use crate::corpus::traits::WeightMatrixBuilder;
use crate::embeddings::cache::EmbeddingCache;
use crate::embeddings::table::EmbeddingTable;

/// What to do with a document whose words carry no weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyDocumentPolicy {
    /// Emit a zero feature row and record the document in `empty_rows`
    #[default]
    ZeroVector,
    /// Abort the build
    Fail,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureOptions {
    pub aggregation: Aggregation,
    pub empty_documents: EmptyDocumentPolicy,
    /// Show a terminal progress bar while aggregating
    pub progress: bool,
}

/// One dense feature row per document.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub rows: Vec<Vec<f64>>,
    pub doc_ids: Vec<String>,
    pub dim: usize,
    /// Indices of documents that had no weighted words
    pub empty_rows: Vec<usize>,
}

impl FeatureMatrix {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

/// Build the feature matrix for an already-built word-document matrix.
pub fn build_feature_matrix(
    wd: &WordDocMatrix,
    table: &EmbeddingTable,
    options: &FeatureOptions,
) -> Result<FeatureMatrix> {
    wd.validate()?;

    let docs = wd.transpose();
    let cache = EmbeddingCache::build(table, &wd.words);

    info!(
        documents = docs.len(),
        aggregation = ?options.aggregation,
        "Building feature matrix"
    );

    let pb = if options.progress {
        let pb = ProgressBar::new(docs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Features [{bar:30}] {pos}/{len} ({eta})")
                .unwrap(),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut rows = Vec::with_capacity(docs.len());
    let mut empty_rows = Vec::new();

    for (i, row) in docs.iter().enumerate() {
        match aggregate(options.aggregation, row, &wd.words, &cache) {
            Ok(features) => rows.push(features),
            Err(e) if is_empty_document(&e) => match options.empty_documents {
                EmptyDocumentPolicy::ZeroVector => {
                    rows.push(vec![0.0; cache.dim()]);
                    empty_rows.push(i);
                }
                EmptyDocumentPolicy::Fail => {
                    pb.finish_and_clear();
                    return Err(e).with_context(|| format!("document {:?}", wd.doc_ids[i]));
                }
            },
            Err(e) => {
                pb.finish_and_clear();
                return Err(e).with_context(|| format!("document {:?}", wd.doc_ids[i]));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if !empty_rows.is_empty() {
        warn!(
            count = empty_rows.len(),
            "Documents with no weighted words were given zero feature vectors"
        );
    }

    Ok(FeatureMatrix {
        rows,
        doc_ids: wd.doc_ids.clone(),
        dim: cache.dim(),
        empty_rows,
    })
}

/// Read a corpus through `builder` and build its feature matrix.
pub fn build_train_matrix<B: WeightMatrixBuilder + ?Sized>(
    corpus: &Path,
    builder: &B,
    table: &EmbeddingTable,
    options: &FeatureOptions,
) -> Result<FeatureMatrix> {
    let wd = builder.build(corpus)?;
    build_feature_matrix(&wd, table, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::aggregate::AggregateError;

    fn table() -> EmbeddingTable {
        EmbeddingTable::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            2,
        )
        .unwrap()
    }

    fn wd(weights: Vec<Vec<f64>>, n_docs: usize) -> WordDocMatrix {
        WordDocMatrix {
            weights,
            doc_ids: (0..n_docs).map(|i| format!("d{i}")).collect(),
            words: vec!["a".to_string(), "b".to_string()],
            labels: vec!["Sports".to_string(); n_docs],
        }
    }

    #[test]
    fn test_single_document_single_row() {
        let m = build_feature_matrix(
            &wd(vec![vec![2.0], vec![2.0]], 1),
            &table(),
            &FeatureOptions::default(),
        )
        .unwrap();
        assert_eq!(m.num_rows(), 1);
        assert_eq!(m.rows[0], vec![0.5, 0.5]);
        assert_eq!(m.dim, 2);
    }

    #[test]
    fn test_empty_document_zero_row() {
        let m = build_feature_matrix(
            &wd(vec![vec![1.0, 0.0], vec![0.0, 0.0]], 2),
            &table(),
            &FeatureOptions::default(),
        )
        .unwrap();
        assert_eq!(m.rows[1], vec![0.0, 0.0]);
        assert_eq!(m.empty_rows, vec![1]);
    }

    #[test]
    fn test_empty_document_fail_policy() {
        let options = FeatureOptions {
            empty_documents: EmptyDocumentPolicy::Fail,
            ..FeatureOptions::default()
        };
        let err = build_feature_matrix(
            &wd(vec![vec![0.0], vec![0.0]], 1),
            &table(),
            &options,
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<AggregateError>(),
            Some(&AggregateError::EmptyDocument)
        );
    }

    #[test]
    fn test_overflowing_weights_not_zeroed() {
        let err = build_feature_matrix(
            &wd(vec![vec![1.0, f64::MAX], vec![0.0, f64::MAX]], 2),
            &table(),
            &FeatureOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AggregateError>(),
            Some(AggregateError::NonFiniteWeight { .. })
        ));
    }

    #[test]
    fn test_invalid_matrix_rejected() {
        let result = build_feature_matrix(
            &wd(vec![vec![1.0]], 1),
            &table(),
            &FeatureOptions::default(),
        );
        assert!(result.is_err());
    }
}
