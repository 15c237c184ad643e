// L2-regularised logistic regression.
//
// Full-batch gradient descent on the mean log loss plus ||w||² / (2·C·n).
// The intercept is not penalised. Columns are standardised before fitting
// and the weights are mapped back afterwards, so averaged embeddings that
// share a large common component train as well as centred ones. The step
// is 1/L where L bounds the curvature of the objective.

use anyhow::Result;
use tracing::{debug, warn};

use super::traits::{check_training_set, Classifier};

#[derive(Debug, Clone)]
pub struct LogRegParams {
    /// Inverse regularisation strength
    pub c: f64,
    pub max_iter: usize,
    /// Stop when the gradient's L2 norm drops below this
    pub tolerance: f64,
}

impl Default for LogRegParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 5000,
            tolerance: 1e-4,
        }
    }
}

pub struct LogisticRegression {
    pub params: LogRegParams,
    weights: Vec<f64>,
    intercept: f64,
    fitted: bool,
    converged: bool,
}

impl LogisticRegression {
    pub fn new(params: LogRegParams) -> Self {
        Self {
            params,
            weights: Vec::new(),
            intercept: 0.0,
            fitted: false,
            converged: false,
        }
    }

    /// P(class = 1 | row).
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        if !self.fitted {
            anyhow::bail!("Logistic regression has not been fitted");
        }
        if row.len() != self.weights.len() {
            anyhow::bail!(
                "Row has {} features, model was fitted on {}",
                row.len(),
                self.weights.len()
            );
        }
        Ok(sigmoid(self.decision(row)))
    }

    /// Weights in the space of the original (unscaled) features.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Whether the last fit met `tolerance` within `max_iter` iterations.
    pub fn converged(&self) -> bool {
        self.converged
    }

    fn decision(&self, row: &[f64]) -> f64 {
        self.intercept + dot(&self.weights, row)
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(LogRegParams::default())
    }
}

/// Per-column mean and scale of the training rows. Constant columns keep
/// a scale of 1 so they standardise to zero.
struct Standardizer {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Standardizer {
    fn fit(rows: &[Vec<f64>], dim: usize) -> Self {
        let n = rows.len() as f64;
        let mut mean = vec![0.0; dim];
        for row in rows {
            for (m, &x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0; dim];
        for row in rows {
            for ((v, &x), &m) in var.iter_mut().zip(row).zip(&mean) {
                *v += (x - m) * (x - m);
            }
        }
        let scale = var
            .into_iter()
            .map(|v| {
                let sd = (v / n).sqrt();
                if sd > f64::EPSILON && sd.is_finite() {
                    sd
                } else {
                    1.0
                }
            })
            .collect();

        Self { mean, scale }
    }

    fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((&x, &m), &s)| (x - m) / s)
            .collect()
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str {
        "LogReg"
    }

    fn fit(&mut self, rows: &[Vec<f64>], labels: &[f64]) -> Result<()> {
        let dim = check_training_set(rows, labels)?;
        if self.params.c <= 0.0 {
            anyhow::bail!("C must be positive, got {}", self.params.c);
        }

        let positives = labels.iter().filter(|&&l| l == 1.0).count();
        if positives == 0 || positives == labels.len() {
            anyhow::bail!(
                "Training split contains only one class ({}); logistic regression needs both",
                labels[0]
            );
        }

        let scaler = Standardizer::fit(rows, dim);
        let scaled: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r)).collect();

        let n = rows.len() as f64;
        let penalty = 1.0 / (self.params.c * n);
        // Hessian of the mean log loss is at most 0.25 · mean(x xᵀ) with the
        // intercept column appended; its trace bounds the largest eigenvalue.
        let curvature = 0.25 * scaled.iter().map(|z| dot(z, z) + 1.0).sum::<f64>() / n + penalty;
        let step = 1.0 / curvature;

        let mut w = vec![0.0; dim];
        let mut b = 0.0;
        let mut grad_w = vec![0.0; dim];
        let mut iterations = 0;
        let mut norm = f64::INFINITY;
        self.converged = false;

        for iter in 0..self.params.max_iter {
            iterations = iter + 1;
            grad_w.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0;

            for (z, &label) in scaled.iter().zip(labels) {
                let err = sigmoid(b + dot(&w, z)) - label;
                for (g, &x) in grad_w.iter_mut().zip(z) {
                    *g += err * x;
                }
                grad_b += err;
            }

            for (g, &wj) in grad_w.iter_mut().zip(&w) {
                *g = *g / n + penalty * wj;
            }
            grad_b /= n;

            norm = (dot(&grad_w, &grad_w) + grad_b * grad_b).sqrt();
            if norm < self.params.tolerance {
                self.converged = true;
                break;
            }

            for (wj, &g) in w.iter_mut().zip(&grad_w) {
                *wj -= step * g;
            }
            b -= step * grad_b;
        }

        if !self.converged {
            warn!(
                iterations = iterations,
                gradient_norm = norm,
                tolerance = self.params.tolerance,
                "Logistic regression stopped before converging"
            );
        }

        self.weights = w.iter().zip(&scaler.scale).map(|(&wj, &s)| wj / s).collect();
        self.intercept = b - dot(&self.weights, &scaler.mean);

        debug!(
            iterations = iterations,
            step = step,
            intercept = self.intercept,
            "Fitted logistic regression"
        );

        self.fitted = true;
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        Ok(if self.predict_proba(row)? > 0.5 { 1.0 } else { 0.0 })
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
