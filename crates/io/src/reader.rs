//! Readers for point-set and threshold files.
//!
//! Point files hold a JSON array of rows, one row per point:
//!
//! ```text
//! [[0.0, 0.0], [10.0, 0.0], [3.5, -1.25]]
//! ```
//!
//! Threshold files hold either a single JSON number or an array with one
//! number per reference point.

use std::path::Path;

use proxima_match::{PointSet, Threshold};
use serde::Deserialize;
use tracing::debug;

use crate::error::IoError;

#[derive(Deserialize)]
#[serde(untagged)]
enum ThresholdFile {
    Scalar(f64),
    PerPoint(Vec<f64>),
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Reads the raw rows of a point file without checking their lengths.
///
/// # Errors
///
/// Returns [`IoError`] if the file is missing, unreadable or not a JSON
/// array of number arrays.
pub fn read_point_rows(path: &Path) -> Result<Vec<Vec<f64>>, IoError> {
    let rows: Vec<Vec<f64>> = read_json(path)?;
    debug!(path = %path.display(), n_rows = rows.len(), "point rows read");
    Ok(rows)
}

/// Builds a row-major [`PointSet`] from rows read out of `path`.
///
/// `dims` fixes the expected dimensionality; when `None` it is taken from
/// the first row.
///
/// # Errors
///
/// Returns [`IoError::UnknownDimension`] for empty rows with no `dims`, and
/// [`IoError::Points`] for ragged rows or zero-length rows.
pub fn points_from_rows(
    path: &Path,
    rows: &[Vec<f64>],
    dims: Option<usize>,
) -> Result<PointSet, IoError> {
    let dims = match (dims, rows.first()) {
        (Some(d), _) => d,
        (None, Some(first)) => first.len(),
        (None, None) => {
            return Err(IoError::UnknownDimension {
                path: path.to_path_buf(),
            });
        }
    };
    PointSet::from_rows(rows, dims).map_err(|source| IoError::Points {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a point file into a row-major [`PointSet`].
///
/// # Errors
///
/// See [`read_point_rows`] and [`points_from_rows`].
pub fn read_points(path: &Path, dims: Option<usize>) -> Result<PointSet, IoError> {
    let rows = read_point_rows(path)?;
    points_from_rows(path, &rows, dims)
}

/// Reads a threshold file: a JSON number or an array of numbers.
///
/// Values are not range-checked here; that happens when a matcher is built.
///
/// # Errors
///
/// Returns [`IoError`] if the file is missing, unreadable or malformed.
pub fn read_threshold(path: &Path) -> Result<Threshold, IoError> {
    let threshold = match read_json::<ThresholdFile>(path)? {
        ThresholdFile::Scalar(t) => Threshold::Scalar(t),
        ThresholdFile::PerPoint(v) => Threshold::PerPoint(v),
    };
    debug!(path = %path.display(), len = threshold.len(), "threshold read");
    Ok(threshold)
}
