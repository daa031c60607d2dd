//! JSON writer for match results.

use std::path::Path;

use proxima_match::{MatchResult, Metric};
use serde::Serialize;
use tracing::info;

use crate::error::IoError;

/// Index convention for written results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexBase {
    /// Reference indices start at 0.
    #[default]
    Zero,
    /// Reference indices start at 1, as in MATLAB or R.
    One,
}

impl IndexBase {
    fn offset(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// Top-level result document.
#[derive(Debug, Serialize)]
pub struct MatchOutput {
    /// Run summary.
    pub summary: Summary,
    /// Matched reference index per query, `null` when unmatched.
    pub indices: Vec<Option<usize>>,
    /// Matched distance per query, `null` when unmatched.
    pub distances: Vec<Option<f64>>,
}

/// Summary of a matching run.
#[derive(Debug, Serialize)]
pub struct Summary {
    /// Metric name, `euclidean` or `cityblock`.
    pub metric: String,
    /// Value of the first reference index (0 or 1).
    pub index_base: usize,
    /// Number of reference points.
    pub n_reference: usize,
    /// Number of query points.
    pub n_query: usize,
    /// Number of query points with a match.
    pub n_matched: usize,
    /// Candidates skipped by pruning.
    pub pruned: u64,
    /// Candidates whose distance was computed.
    pub evaluated: u64,
    /// Evaluated candidates over their threshold.
    pub rejected: u64,
}

impl MatchOutput {
    /// Builds the output document for `result`.
    pub fn new(result: &MatchResult, n_reference: usize, metric: Metric, base: IndexBase) -> Self {
        let stats = result.stats();
        let offset = base.offset();
        Self {
            summary: Summary {
                metric: metric.name().to_string(),
                index_base: offset,
                n_reference,
                n_query: result.len(),
                n_matched: result.n_matched(),
                pruned: stats.pruned,
                evaluated: stats.evaluated,
                rejected: stats.rejected,
            },
            indices: result.iter().map(|m| m.map(|m| m.index + offset)).collect(),
            distances: result.iter().map(|m| m.map(|m| m.distance)).collect(),
        }
    }
}

/// Serializes an output document to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns [`IoError::NonFiniteDistance`] if a matched distance overflowed,
/// since JSON would silently turn it into `null`.
pub fn to_json(output: &MatchOutput) -> Result<String, IoError> {
    if let Some(query) = output
        .distances
        .iter()
        .position(|d| d.is_some_and(|d| !d.is_finite()))
    {
        return Err(IoError::NonFiniteDistance { query });
    }
    serde_json::to_string_pretty(output).map_err(|e| IoError::Serialization {
        reason: e.to_string(),
    })
}

/// Writes an output document to `path`.
///
/// # Errors
///
/// Returns [`IoError`] if serialization or the file write fails.
pub fn write_matches(path: &Path, output: &MatchOutput) -> Result<(), IoError> {
    let json = to_json(output)?;
    std::fs::write(path, json).map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    info!(
        path = %path.display(),
        n_query = output.summary.n_query,
        n_matched = output.summary.n_matched,
        "match results written"
    );
    Ok(())
}
