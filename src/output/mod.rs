// Output formatting — terminal display and JSON reports.

pub mod terminal;

use anyhow::Result;

use crate::classify::evaluate::Evaluation;

/// Serialize evaluations as pretty-printed JSON.
pub fn evaluations_json(evaluations: &[Evaluation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(evaluations)?)
}
