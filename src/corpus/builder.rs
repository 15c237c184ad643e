// Labelled corpus -> word-document weight matrix.
//
// The corpus is a tab-separated file with a header row naming at least the
// `id`, `label` and `text` columns. Each row is one tweet. The vocabulary is
// every token that survives tokenization, in order of first appearance.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::matrix::WordDocMatrix;
use super::tokenize::Tokenizer;
use super::traits::WeightMatrixBuilder;
use crate::embeddings::delimited::{read_records, DelimitedFormat};

/// How a word's occurrences in a document become a weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weighting {
    /// 1.0 if the word occurs in the document, else 0.0
    Presence,
    /// Raw occurrence count
    #[default]
    Count,
    /// count * ln(N / document frequency)
    TfIdf,
}

/// A single labelled document as read from the corpus file.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledDoc {
    pub id: String,
    pub label: String,
    pub text: String,
}

/// Default [`WeightMatrixBuilder`]: reads a labelled TSV corpus.
pub struct CorpusWeightBuilder {
    pub weighting: Weighting,
    pub format: DelimitedFormat,
    pub tokenizer: Tokenizer,
}

impl Default for CorpusWeightBuilder {
    fn default() -> Self {
        Self {
            weighting: Weighting::default(),
            format: DelimitedFormat::tsv(),
            tokenizer: Tokenizer::default(),
        }
    }
}

impl CorpusWeightBuilder {
    pub fn new(weighting: Weighting) -> Self {
        Self {
            weighting,
            ..Self::default()
        }
    }

    /// Parse corpus text into labelled documents.
    pub fn parse_docs(&self, text: &str) -> Result<Vec<LabelledDoc>> {
        let mut format = self.format.clone();
        format.header = true;
        let (header, records) = read_records(text, &format)?;
        let header = header.context("Corpus has no header row")?;

        let column = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .with_context(|| format!("Corpus header is missing the {name:?} column"))
        };
        let id_col = column("id")?;
        let label_col = column("label")?;
        let text_col = column("text")?;
        let width = id_col.max(label_col).max(text_col) + 1;

        records
            .into_iter()
            .map(|(line_no, fields)| {
                if fields.len() < width {
                    anyhow::bail!(
                        "line {line_no}: expected at least {width} fields, found {}",
                        fields.len()
                    );
                }
                Ok(LabelledDoc {
                    id: fields[id_col].trim().to_string(),
                    label: fields[label_col].trim().to_string(),
                    text: fields[text_col].clone(),
                })
            })
            .collect()
    }

    /// Build the weight matrix for already-parsed documents.
    pub fn build_from_docs(&self, docs: &[LabelledDoc]) -> WordDocMatrix {
        let mut words: Vec<String> = Vec::new();
        let mut word_index: HashMap<String, usize> = HashMap::new();
        // Per document: word index -> occurrence count
        let mut doc_counts: Vec<HashMap<usize, f64>> = Vec::with_capacity(docs.len());

        for doc in docs {
            let mut counts = HashMap::new();
            for token in self.tokenizer.tokenize(&doc.text) {
                let idx = *word_index.entry(token.clone()).or_insert_with(|| {
                    words.push(token);
                    words.len() - 1
                });
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
            doc_counts.push(counts);
        }

        let n_docs = docs.len();
        let mut doc_freq = vec![0usize; words.len()];
        for counts in &doc_counts {
            for &idx in counts.keys() {
                doc_freq[idx] += 1;
            }
        }

        let mut weights = vec![vec![0.0; n_docs]; words.len()];
        for (d, counts) in doc_counts.iter().enumerate() {
            for (&w, &count) in counts {
                weights[w][d] = match self.weighting {
                    Weighting::Presence => 1.0,
                    Weighting::Count => count,
                    Weighting::TfIdf => count * (n_docs as f64 / doc_freq[w] as f64).ln(),
                };
            }
        }

        WordDocMatrix {
            weights,
            doc_ids: docs.iter().map(|d| d.id.clone()).collect(),
            words,
            labels: docs.iter().map(|d| d.label.clone()).collect(),
        }
    }
}

impl WeightMatrixBuilder for CorpusWeightBuilder {
    fn build(&self, corpus: &Path) -> Result<WordDocMatrix> {
        let text = fs::read_to_string(corpus)
            .with_context(|| format!("Failed to read corpus {}", corpus.display()))?;
        let docs = self
            .parse_docs(&text)
            .with_context(|| format!("Failed to parse corpus {}", corpus.display()))?;
        let matrix = self.build_from_docs(&docs);

        info!(
            path = %corpus.display(),
            documents = matrix.num_docs(),
            words = matrix.num_words(),
            weighting = ?self.weighting,
            "Built word-document matrix"
        );

        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<LabelledDoc> {
        vec![
            LabelledDoc {
                id: "1".into(),
                label: "Sports".into(),
                text: "goal goal keeper".into(),
            },
            LabelledDoc {
                id: "2".into(),
                label: "Politics".into(),
                text: "senate keeper".into(),
            },
        ]
    }

    fn builder(weighting: Weighting) -> CorpusWeightBuilder {
        CorpusWeightBuilder {
            weighting,
            format: DelimitedFormat::tsv(),
            tokenizer: Tokenizer::new(false),
        }
    }

    #[test]
    fn test_vocabulary_in_first_appearance_order() {
        let m = builder(Weighting::Count).build_from_docs(&docs());
        assert_eq!(m.words, vec!["goal", "keeper", "senate"]);
        assert_eq!(m.doc_ids, vec!["1", "2"]);
        assert_eq!(m.labels, vec!["Sports", "Politics"]);
    }

    #[test]
    fn test_count_weights_word_major() {
        let m = builder(Weighting::Count).build_from_docs(&docs());
        assert_eq!(m.weights[0], vec![2.0, 0.0]);
        assert_eq!(m.weights[1], vec![1.0, 1.0]);
        assert_eq!(m.weights[2], vec![0.0, 1.0]);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_presence_weights() {
        let m = builder(Weighting::Presence).build_from_docs(&docs());
        assert_eq!(m.weights[0], vec![1.0, 0.0]);
    }

    #[test]
    fn test_tfidf_zero_for_ubiquitous_word() {
        let m = builder(Weighting::TfIdf).build_from_docs(&docs());
        assert_eq!(m.weights[1], vec![0.0, 0.0]);
        assert!((m.weights[0][0] - 2.0 * 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_parse_docs_by_header_name() {
        let text = "label\tid\ttext\nSports\t7\tbig win\nOther\t8\tquiet day\n";
        let parsed = builder(Weighting::Count).parse_docs(text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "7");
        assert_eq!(parsed[0].label, "Sports");
        assert_eq!(parsed[1].text, "quiet day");
    }

    #[test]
    fn test_parse_docs_missing_column() {
        let text = "id\ttext\n1\thello\n";
        assert!(builder(Weighting::Count).parse_docs(text).is_err());
    }

    #[test]
    fn test_parse_docs_short_row() {
        let text = "id\tlabel\ttext\n1\tSports\n";
        assert!(builder(Weighting::Count).parse_docs(text).is_err());
    }
}
