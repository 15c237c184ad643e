use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::info;

use tweetvec::classify::evaluate::{evaluate_knn, evaluate_logreg, EvalSettings};
use tweetvec::config::Config;
use tweetvec::corpus::builder::{CorpusWeightBuilder, Weighting};
use tweetvec::embeddings::delimited::DelimitedFormat;
use tweetvec::embeddings::table::EmbeddingTable;
use tweetvec::features::aggregate::Aggregation;
use tweetvec::features::matrix::{build_train_matrix, EmptyDocumentPolicy, FeatureOptions};
use tweetvec::output::{evaluations_json, terminal};

/// tweetvec: GloVe document features for Sports-tweet classification.
///
/// Averages pre-trained word vectors into one feature vector per tweet, then
/// reports held-out accuracy for k-nearest-neighbors and logistic regression.
/// With no arguments, runs on the default data paths.
#[derive(Parser)]
#[command(name = "tweetvec", version, about)]
struct Cli {
    /// GloVe embedding file (overrides TWEETVEC_GLOVE_PATH)
    #[arg(long)]
    glove: Option<PathBuf>,

    /// Labelled training corpus (overrides TWEETVEC_TRAIN_FILE)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Embedding dimension (overrides TWEETVEC_EMBEDDING_DIM)
    #[arg(long)]
    dim: Option<usize>,

    /// Label treated as the positive class (overrides TWEETVEC_TARGET_LABEL)
    #[arg(long)]
    target: Option<String>,

    /// Neighbors for the KNN evaluator (overrides TWEETVEC_KNN_K)
    #[arg(long)]
    k: Option<usize>,

    /// How word vectors are averaged per document
    #[arg(long, value_enum, default_value_t = MeanArg::Weighted)]
    mean: MeanArg,

    /// How word occurrences become weights
    #[arg(long, value_enum, default_value_t = WeightingArg::Count)]
    weighting: WeightingArg,

    /// Abort instead of using zero features for documents with no weighted words
    #[arg(long)]
    fail_on_empty: bool,

    /// Also print precision, recall and the confusion counts
    #[arg(long)]
    details: bool,

    /// Print the evaluations as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum MeanArg {
    Weighted,
    Unweighted,
}

#[derive(Clone, Copy, ValueEnum)]
enum WeightingArg {
    Presence,
    Count,
    Tfidf,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tweetvec=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = apply_overrides(Config::load()?, &cli);
    config.require_inputs()?;

    let options = FeatureOptions {
        aggregation: match cli.mean {
            MeanArg::Weighted => Aggregation::Weighted,
            MeanArg::Unweighted => Aggregation::Unweighted,
        },
        empty_documents: if cli.fail_on_empty {
            EmptyDocumentPolicy::Fail
        } else {
            EmptyDocumentPolicy::ZeroVector
        },
        progress: !cli.json,
    };
    let builder = CorpusWeightBuilder::new(match cli.weighting {
        WeightingArg::Presence => Weighting::Presence,
        WeightingArg::Count => Weighting::Count,
        WeightingArg::Tfidf => Weighting::TfIdf,
    });

    info!(path = %config.glove_path.display(), "Loading embeddings");
    let table = EmbeddingTable::load(
        &config.glove_path,
        &DelimitedFormat::glove(),
        config.embedding_dim,
    )?;

    info!(path = %config.train_file.display(), "Building training matrix");
    let features = build_train_matrix(&config.train_file, &builder, &table, &options)?;
    if !cli.json {
        terminal::display_matrix_summary(&features);
    }

    let settings = EvalSettings {
        target_label: config.target_label.clone(),
        train_percent: config.train_percent,
        features: options,
    };

    let knn = evaluate_knn(
        &config.train_file,
        &builder,
        &table,
        &settings,
        config.knn_k,
        Some(&features),
    )?;
    let logreg = evaluate_logreg(&config.train_file, &builder, &table, &settings, Some(&features))?;
    let evaluations = [knn, logreg];

    if cli.json {
        println!("{}", evaluations_json(&evaluations)?);
        return Ok(());
    }

    terminal::display_scores(&evaluations);
    if cli.details {
        terminal::display_details(&evaluations);
    } else {
        eprintln!(
            "{}",
            "Run with --details for precision, recall and confusion counts.".dimmed()
        );
    }

    Ok(())
}

/// CLI flags take precedence over environment configuration.
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(path) = &cli.glove {
        config.glove_path = path.clone();
    }
    if let Some(path) = &cli.corpus {
        config.train_file = path.clone();
    }
    if let Some(dim) = cli.dim {
        config.embedding_dim = dim;
    }
    if let Some(target) = &cli.target {
        config.target_label = target.clone();
    }
    if let Some(k) = cli.k {
        config.knn_k = k;
    }
    config
}
