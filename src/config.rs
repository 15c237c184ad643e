use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::classify::evaluate::DEFAULT_TARGET_LABEL;
use crate::classify::knn::DEFAULT_K;
use crate::classify::split::DEFAULT_TRAIN_PERCENT;
use crate::embeddings::table::DEFAULT_DIM;

pub const DEFAULT_GLOVE_PATH: &str = "data/glove.6B.50d.txt";
pub const DEFAULT_TRAIN_FILE: &str = "data/training.txt";

/// Run configuration loaded from environment variables.
///
/// Every value has a default, so an empty environment reproduces the
/// standard run. The .env file is loaded at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// GloVe embedding file (space separated, no header)
    pub glove_path: PathBuf,
    /// Labelled training corpus (TSV with id/label/text columns)
    pub train_file: PathBuf,
    pub embedding_dim: usize,
    /// Label value treated as the positive class
    pub target_label: String,
    /// Neighbors consulted by the KNN evaluator
    pub knn_k: usize,
    /// Percentage of rows (in file order) used for training
    pub train_percent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            glove_path: PathBuf::from(DEFAULT_GLOVE_PATH),
            train_file: PathBuf::from(DEFAULT_TRAIN_FILE),
            embedding_dim: DEFAULT_DIM,
            target_label: DEFAULT_TARGET_LABEL.to_string(),
            knn_k: DEFAULT_K,
            train_percent: DEFAULT_TRAIN_PERCENT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            glove_path: env::var("TWEETVEC_GLOVE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.glove_path),
            train_file: env::var("TWEETVEC_TRAIN_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.train_file),
            embedding_dim: parse_var("TWEETVEC_EMBEDDING_DIM", defaults.embedding_dim)?,
            target_label: env::var("TWEETVEC_TARGET_LABEL").unwrap_or(defaults.target_label),
            knn_k: parse_var("TWEETVEC_KNN_K", defaults.knn_k)?,
            train_percent: parse_var("TWEETVEC_TRAIN_PERCENT", defaults.train_percent)?,
        })
    }

    /// Check that both input files exist.
    /// Call this before loading anything so the error names the missing path.
    pub fn require_inputs(&self) -> Result<()> {
        if !self.glove_path.exists() {
            anyhow::bail!(
                "Embedding file not found: {}\n\
                 Download glove.6B.zip from https://nlp.stanford.edu/projects/glove/ \
                 or set TWEETVEC_GLOVE_PATH.",
                self.glove_path.display()
            );
        }
        if !self.train_file.exists() {
            anyhow::bail!(
                "Training corpus not found: {}\nSet TWEETVEC_TRAIN_FILE to its location.",
                self.train_file.display()
            );
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
