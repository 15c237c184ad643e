// Deterministic held-out split.
//
// Rows are split by position, not shuffled and not stratified: the first
// `train_percent`% of rows train, the rest evaluate.

use anyhow::Result;

pub const DEFAULT_TRAIN_PERCENT: usize = 70;

/// Index of the first evaluation row for `n` rows.
pub fn split_index(n: usize, train_percent: usize) -> usize {
    n * train_percent / 100
}

/// A train/test partition borrowed from a feature matrix and its labels.
#[derive(Debug)]
pub struct Split<'a> {
    pub train_rows: &'a [Vec<f64>],
    pub train_labels: &'a [f64],
    pub test_rows: &'a [Vec<f64>],
    pub test_labels: &'a [f64],
}

/// Split rows and labels at the same position.
///
/// Fails when there are fewer than 2 rows, when the lengths differ, or when
/// either side of the split would be empty.
pub fn train_test_split<'a>(
    rows: &'a [Vec<f64>],
    labels: &'a [f64],
    train_percent: usize,
) -> Result<Split<'a>> {
    if rows.len() != labels.len() {
        anyhow::bail!("{} feature rows but {} labels", rows.len(), labels.len());
    }
    if rows.len() < 2 {
        anyhow::bail!(
            "Need at least 2 documents for a train/test split, found {}",
            rows.len()
        );
    }
    if !(1..100).contains(&train_percent) {
        anyhow::bail!("Train percentage must be between 1 and 99, got {train_percent}");
    }

    let at = split_index(rows.len(), train_percent);
    if at == 0 || at == rows.len() {
        anyhow::bail!(
            "A {train_percent}% split of {} rows leaves one side empty",
            rows.len()
        );
    }

    let (train_rows, test_rows) = rows.split_at(at);
    let (train_labels, test_labels) = labels.split_at(at);
    Ok(Split {
        train_rows,
        train_labels,
        test_rows,
        test_labels,
    })
}
