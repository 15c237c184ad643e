// k-nearest-neighbors classifier.
//
// Brute-force Euclidean search over the stored training rows, uniform
// majority vote among the k closest. Training "fit" just stores the data.

use anyhow::Result;

use super::traits::{check_training_set, Classifier};

pub const DEFAULT_K: usize = 5;

pub struct KnnClassifier {
    pub k: usize,
    rows: Vec<Vec<f64>>,
    labels: Vec<f64>,
}

impl KnnClassifier {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            rows: Vec::new(),
            labels: Vec::new(),
        }
    }
}

impl Default for KnnClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_K)
    }
}

impl Classifier for KnnClassifier {
    fn name(&self) -> &'static str {
        "KNN"
    }

    fn fit(&mut self, rows: &[Vec<f64>], labels: &[f64]) -> Result<()> {
        if self.k == 0 {
            anyhow::bail!("k must be at least 1");
        }
        check_training_set(rows, labels)?;
        if rows.len() < self.k {
            anyhow::bail!(
                "k = {} but only {} training rows are available",
                self.k,
                rows.len()
            );
        }
        self.rows = rows.to_vec();
        self.labels = labels.to_vec();
        Ok(())
    }

    /// Majority vote of the k nearest training rows. Equidistant rows are
    /// ordered by training position; a tied vote goes to class 0.
    fn predict(&self, row: &[f64]) -> Result<f64> {
        if self.rows.is_empty() {
            anyhow::bail!("KNN classifier has not been fitted");
        }
        if row.len() != self.rows[0].len() {
            anyhow::bail!(
                "Row has {} features, model was fitted on {}",
                row.len(),
                self.rows[0].len()
            );
        }

        let mut distances: Vec<(usize, f64)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i, squared_distance(row, r)))
            .collect();
        // Stable sort keeps training order among equal distances
        distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let positive = distances
            .iter()
            .take(self.k)
            .filter(|(i, _)| self.labels[*i] == 1.0)
            .count();
        let negative = self.k.min(distances.len()) - positive;

        Ok(if positive > negative { 1.0 } else { 0.0 })
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
