//! Error types for proxima-io.

use std::path::PathBuf;

use proxima_match::MatchError;

/// Error type for all fallible operations in the proxima-io crate.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps a failure reading or writing a file.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a file is not valid JSON of the expected shape.
    #[error("invalid JSON in {}: {reason}", path.display())]
    Json {
        /// Path of the malformed file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// Returned when the rows of a point file do not form a point set.
    #[error("invalid point set in {}: {source}", path.display())]
    Points {
        /// Path of the point file.
        path: PathBuf,
        /// Underlying shape error.
        source: MatchError,
    },

    /// Returned when an empty point file gives no way to infer dimensionality.
    #[error("cannot infer dimensions of empty point set in {}", path.display())]
    UnknownDimension {
        /// Path of the empty point file.
        path: PathBuf,
    },

    /// Returned when a matched distance overflowed and has no JSON number.
    #[error("matched distance for query {query} is not finite")]
    NonFiniteDistance {
        /// Query index of the offending match.
        query: usize,
    },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Serializer message.
        reason: String,
    },
}
