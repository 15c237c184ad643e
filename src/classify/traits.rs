// Binary classifier trait.
//
// Both evaluators share the same fit-then-score flow; only the model differs.
// Labels are 0.0 / 1.0 throughout.

use anyhow::Result;

pub trait Classifier {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Train on `rows` with binary `labels`.
    fn fit(&mut self, rows: &[Vec<f64>], labels: &[f64]) -> Result<()>;

    /// Predict the class (0.0 or 1.0) of a single row.
    fn predict(&self, row: &[f64]) -> Result<f64>;

    /// Predict every row.
    fn predict_all(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|r| self.predict(r)).collect()
    }

    /// Fraction of `rows` whose prediction equals the label.
    fn score(&self, rows: &[Vec<f64>], labels: &[f64]) -> Result<f64> {
        if rows.len() != labels.len() {
            anyhow::bail!("{} rows but {} labels", rows.len(), labels.len());
        }
        if rows.is_empty() {
            anyhow::bail!("Cannot score an empty set");
        }
        let predictions = self.predict_all(rows)?;
        let correct = predictions
            .iter()
            .zip(labels)
            .filter(|(p, l)| p == l)
            .count();
        Ok(correct as f64 / rows.len() as f64)
    }
}

/// Shared input checks for `fit` implementations.
pub(crate) fn check_training_set(rows: &[Vec<f64>], labels: &[f64]) -> Result<usize> {
    if rows.len() != labels.len() {
        anyhow::bail!("{} training rows but {} labels", rows.len(), labels.len());
    }
    let Some(first) = rows.first() else {
        anyhow::bail!("Training set is empty");
    };
    let dim = first.len();
    if let Some(bad) = rows.iter().position(|r| r.len() != dim) {
        anyhow::bail!(
            "Training row {bad} has {} features, expected {dim}",
            rows[bad].len()
        );
    }
    if let Some(bad) = labels.iter().find(|&&l| l != 0.0 && l != 1.0) {
        anyhow::bail!("Label {bad} is not binary (expected 0 or 1)");
    }
    Ok(dim)
}
