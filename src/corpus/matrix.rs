// Word-document weight matrix.
//
// Stored word-major (one row per vocabulary word, one column per document),
// which is the orientation a term-document builder naturally produces. The
// feature pipeline wants document-major rows, hence `transpose`.

use anyhow::Result;

/// A word-document weight matrix together with its row and column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct WordDocMatrix {
    /// `weights[word][doc]`
    pub weights: Vec<Vec<f64>>,
    pub doc_ids: Vec<String>,
    pub words: Vec<String>,
    /// One category label per document
    pub labels: Vec<String>,
}

impl WordDocMatrix {
    /// Check that rows, columns and labels line up.
    pub fn validate(&self) -> Result<()> {
        if self.weights.len() != self.words.len() {
            anyhow::bail!(
                "Weight matrix has {} rows but {} words",
                self.weights.len(),
                self.words.len()
            );
        }
        if self.labels.len() != self.doc_ids.len() {
            anyhow::bail!(
                "{} labels for {} documents",
                self.labels.len(),
                self.doc_ids.len()
            );
        }
        if let Some((i, row)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.doc_ids.len())
        {
            anyhow::bail!(
                "Row for word {:?} has {} columns, expected {}",
                self.words[i],
                row.len(),
                self.doc_ids.len()
            );
        }
        Ok(())
    }

    /// Document-major copy of the weights: `result[doc][word]`.
    pub fn transpose(&self) -> Vec<Vec<f64>> {
        let n_docs = self.doc_ids.len();
        let mut docs = vec![vec![0.0; self.words.len()]; n_docs];
        for (w, row) in self.weights.iter().enumerate() {
            for (d, &value) in row.iter().enumerate().take(n_docs) {
                docs[d][w] = value;
            }
        }
        docs
    }

    pub fn num_docs(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn num_words(&self) -> usize {
        self.words.len()
    }
}
