// Held-out evaluation of a classifier on corpus features.
//
// Labels are re-read from the corpus through the weight matrix builder and
// binarized against the target category. When no feature matrix is supplied
// it's built from scratch, so each evaluator can also run standalone.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::knn::KnnClassifier;
use super::logreg::LogisticRegression;
use super::metrics::{compute_validation_metrics, ValidationMetrics};
use super::split::{train_test_split, DEFAULT_TRAIN_PERCENT};
use super::traits::Classifier;
use crate::corpus::traits::WeightMatrixBuilder;
use crate::embeddings::table::EmbeddingTable;
use crate::features::matrix::{build_feature_matrix, FeatureMatrix, FeatureOptions};

/// Category treated as the positive class.
pub const DEFAULT_TARGET_LABEL: &str = "Sports";

#[derive(Debug, Clone)]
pub struct EvalSettings {
    pub target_label: String,
    pub train_percent: usize,
    /// Used only when the feature matrix has to be built
    pub features: FeatureOptions,
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            target_label: DEFAULT_TARGET_LABEL.to_string(),
            train_percent: DEFAULT_TRAIN_PERCENT,
            features: FeatureOptions::default(),
        }
    }
}

/// Outcome of one held-out evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub model: String,
    /// Fraction of evaluation rows classified correctly, in [0, 1]
    pub accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub metrics: ValidationMetrics,
}

/// 1.0 where the label equals `target`, else 0.0.
pub fn binarize_labels(labels: &[String], target: &str) -> Vec<f64> {
    labels
        .iter()
        .map(|l| if l == target { 1.0 } else { 0.0 })
        .collect()
}

/// Fit `model` on the first part of the rows and score it on the rest.
pub fn evaluate<C: Classifier + ?Sized>(
    model: &mut C,
    features: &FeatureMatrix,
    labels: &[f64],
    train_percent: usize,
) -> Result<Evaluation> {
    let split = train_test_split(&features.rows, labels, train_percent)?;

    model
        .fit(split.train_rows, split.train_labels)
        .with_context(|| format!("{} fit failed", model.name()))?;

    let predictions = model.predict_all(split.test_rows)?;
    let metrics = compute_validation_metrics(&predictions, split.test_labels);
    let accuracy = metrics.accuracy;

    info!(
        model = model.name(),
        accuracy = accuracy,
        train_rows = split.train_rows.len(),
        test_rows = split.test_rows.len(),
        "Evaluated classifier"
    );

    Ok(Evaluation {
        model: model.name().to_string(),
        accuracy,
        train_rows: split.train_rows.len(),
        test_rows: split.test_rows.len(),
        metrics,
    })
}

/// Evaluate `model` on a corpus, building the feature matrix if not given.
pub fn evaluate_corpus<C, B>(
    model: &mut C,
    corpus: &Path,
    builder: &B,
    table: &EmbeddingTable,
    settings: &EvalSettings,
    features: Option<&FeatureMatrix>,
) -> Result<Evaluation>
where
    C: Classifier + ?Sized,
    B: WeightMatrixBuilder + ?Sized,
{
    let wd = builder.build(corpus)?;

    let built;
    let features = match features {
        Some(f) => f,
        None => {
            built = build_feature_matrix(&wd, table, &settings.features)?;
            &built
        }
    };

    let labels = binarize_labels(&wd.labels, &settings.target_label);
    if labels.len() != features.num_rows() {
        anyhow::bail!(
            "Corpus has {} labels but the feature matrix has {} rows",
            labels.len(),
            features.num_rows()
        );
    }

    evaluate(model, features, &labels, settings.train_percent)
}

/// Nearest-neighbor held-out accuracy for a corpus.
pub fn evaluate_knn<B: WeightMatrixBuilder + ?Sized>(
    corpus: &Path,
    builder: &B,
    table: &EmbeddingTable,
    settings: &EvalSettings,
    k: usize,
    features: Option<&FeatureMatrix>,
) -> Result<Evaluation> {
    let mut model = KnnClassifier::new(k);
    evaluate_corpus(&mut model, corpus, builder, table, settings, features)
}

/// Logistic regression held-out accuracy for a corpus.
pub fn evaluate_logreg<B: WeightMatrixBuilder + ?Sized>(
    corpus: &Path,
    builder: &B,
    table: &EmbeddingTable,
    settings: &EvalSettings,
    features: Option<&FeatureMatrix>,
) -> Result<Evaluation> {
    let mut model = LogisticRegression::default();
    evaluate_corpus(&mut model, corpus, builder, table, settings, features)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Wraps a classifier and counts calls to `predict`.
    struct Counting {
        inner: KnnClassifier,
        predictions: Cell<usize>,
    }

    impl Classifier for Counting {
        fn name(&self) -> &'static str {
            "Counting"
        }

        fn fit(&mut self, rows: &[Vec<f64>], labels: &[f64]) -> Result<()> {
            self.inner.fit(rows, labels)
        }

        fn predict(&self, row: &[f64]) -> Result<f64> {
            self.predictions.set(self.predictions.get() + 1);
            self.inner.predict(row)
        }
    }

    fn matrix(rows: Vec<Vec<f64>>) -> FeatureMatrix {
        FeatureMatrix {
            doc_ids: (0..rows.len()).map(|i| i.to_string()).collect(),
            dim: rows.first().map(Vec::len).unwrap_or(0),
            rows,
            empty_rows: Vec::new(),
        }
    }

    #[test]
    fn test_binarize_labels() {
        let labels = vec!["Sports".to_string(), "sports".to_string(), "News".to_string()];
        assert_eq!(binarize_labels(&labels, "Sports"), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_evaluate_reports_split_sizes() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![(i % 2) as f64]).collect();
        let labels: Vec<f64> = (0..10).map(|i| (i % 2) as f64).collect();
        let mut knn = KnnClassifier::new(1);
        let eval = evaluate(&mut knn, &matrix(rows), &labels, 70).unwrap();
        assert_eq!(eval.train_rows, 7);
        assert_eq!(eval.test_rows, 3);
        assert_eq!(eval.accuracy, 1.0);
        assert_eq!(eval.model, "KNN");
    }

    #[test]
    fn test_evaluate_predicts_each_test_row_once() {
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![(i % 2) as f64, 0.5]).collect();
        let labels: Vec<f64> = (0..20).map(|i| ((i + 1) % 2) as f64).collect();
        let mut model = Counting {
            inner: KnnClassifier::new(1),
            predictions: Cell::new(0),
        };
        let eval = evaluate(&mut model, &matrix(rows), &labels, 70).unwrap();
        assert_eq!(model.predictions.get(), eval.test_rows);
        assert_eq!(eval.accuracy, eval.metrics.accuracy);
    }

    #[test]
    fn test_evaluate_single_class_logreg_fails() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        // Positives only in the evaluation rows
        let labels: Vec<f64> = (0..10).map(|i| if i >= 7 { 1.0 } else { 0.0 }).collect();
        let mut model = LogisticRegression::default();
        assert!(evaluate(&mut model, &matrix(rows), &labels, 70).is_err());
    }
}
