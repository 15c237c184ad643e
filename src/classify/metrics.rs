//! Validation metrics for the held-out split.
//!
//! Computes confusion-matrix-derived metrics from predicted and true labels.

use serde::Serialize;

/// Validation metrics computed from a confusion matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_count: usize,
}

/// Compute validation metrics from predictions and ground truth.
///
/// Class 1.0 = target category, class 0.0 = everything else. Ratios with a
/// zero denominator are reported as 0.0.
pub fn compute_validation_metrics(predictions: &[f64], labels: &[f64]) -> ValidationMetrics {
    let mut tp = 0;
    let mut fp = 0;
    let mut tn = 0;
    let mut fn_count = 0;

    for (&pred, &label) in predictions.iter().zip(labels) {
        match (pred == 1.0, label == 1.0) {
            (true, true) => tp += 1,
            (true, false) => fp += 1,
            (false, false) => tn += 1,
            (false, true) => fn_count += 1,
        }
    }

    let ratio = |num: usize, den: usize| if den > 0 { num as f64 / den as f64 } else { 0.0 };

    let accuracy = ratio(tp + tn, tp + fp + tn + fn_count);
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_count);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ValidationMetrics {
        accuracy,
        precision,
        recall,
        f1,
        tp,
        fp,
        tn,
        fn_count,
    }
}

impl std::fmt::Display for ValidationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "acc={:.4} prec={:.4} rec={:.4} f1={:.4} (tp={} fp={} tn={} fn={})",
            self.accuracy, self.precision, self.recall, self.f1, self.tp, self.fp, self.tn,
            self.fn_count,
        )
    }
}
