//! Configuration for matching runs.

use crate::distance::Metric;
use crate::error::MatchError;

/// Configuration for a matching run.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use proxima_match::{MatchConfig, Metric};
///
/// let config = MatchConfig::new()
///     .with_metric(Metric::Cityblock)
///     .with_parallel(true)
///     .with_chunk_size(64);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Distance metric.
    metric: Metric,
    /// Start each scan at the previous query's best match.
    warm_start: bool,
    /// Process query chunks on the rayon thread pool.
    parallel: bool,
    /// Queries per parallel chunk; each chunk keeps its own cursor.
    chunk_size: usize,
}

impl MatchConfig {
    /// Creates a configuration with default settings.
    ///
    /// Defaults: `metric = Euclidean`, `warm_start = true`,
    /// `parallel = false`, `chunk_size = 256`.
    pub fn new() -> Self {
        Self {
            metric: Metric::Euclidean,
            warm_start: true,
            parallel: false,
            chunk_size: 256,
        }
    }

    /// Sets the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Enables or disables the warm-start scan order.
    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.warm_start = warm_start;
        self
    }

    /// Enables or disables parallel matching.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the number of queries per parallel chunk.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Returns the distance metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns whether scans start at the previous best match.
    pub fn warm_start(&self) -> bool {
        self.warm_start
    }

    /// Returns whether matching runs in parallel.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Returns the number of queries per parallel chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Validates this configuration.
    ///
    /// Returns an error if `chunk_size` is zero.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.chunk_size < 1 {
            return Err(MatchError::InvalidChunkSize {
                chunk_size: self.chunk_size,
            });
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new()
    }
}
