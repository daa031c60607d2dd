//! Error types for the proxima-match crate.

/// Error type for all fallible operations in the proxima-match crate.
///
/// Every variant is a configuration error detected before any search runs.
/// An unmatched query is not an error; it is reported as `None` in
/// [`MatchResult`](crate::MatchResult).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    /// Returned when a point set is declared with zero coordinates per point.
    #[error("points must have at least one dimension")]
    ZeroDimension,

    /// Returned when a flat coordinate buffer cannot be split into points.
    #[error("coordinate buffer length {len} is not divisible by dims {dims}")]
    ShapeMismatch {
        /// Length of the coordinate buffer.
        len: usize,
        /// Declared number of dimensions.
        dims: usize,
    },

    /// Returned when a row of a nested point list has the wrong length.
    #[error("row {row} has {got} coordinates, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Number of coordinates in that row.
        got: usize,
        /// Number of coordinates in the first row.
        expected: usize,
    },

    /// Returned when the reference and query sets disagree on dimensionality.
    #[error("reference points have {reference} dimensions but query points have {query}")]
    DimensionMismatch {
        /// Dimensionality of the reference set.
        reference: usize,
        /// Dimensionality of the query set.
        query: usize,
    },

    /// Returned when a per-point threshold vector has the wrong length.
    #[error("threshold length {len} does not match {n_reference} reference points")]
    ThresholdLength {
        /// Length of the threshold vector.
        len: usize,
        /// Number of reference points.
        n_reference: usize,
    },

    /// Returned when a threshold is negative or NaN.
    #[error("threshold at index {index} must be non-negative, got {value}")]
    InvalidThreshold {
        /// Index of the offending threshold (0 for a scalar threshold).
        index: usize,
        /// The invalid value.
        value: f64,
    },

    /// Returned when the parallel chunk size is zero.
    #[error("chunk_size must be >= 1, got {chunk_size}")]
    InvalidChunkSize {
        /// The invalid chunk size.
        chunk_size: usize,
    },

    /// Returned when a point set contains NaN or infinity.
    #[error("non-finite coordinate in {input}")]
    NonFiniteInput {
        /// Name of the input containing the non-finite value.
        input: &'static str,
    },
}
