//! Thresholded nearest-neighbor search and the `match_points` entry point.

use rayon::prelude::*;
use tracing::{debug, debug_span};

use crate::cache::DistanceCache;
use crate::config::MatchConfig;
use crate::distance::Metric;
use crate::error::MatchError;
use crate::points::{Coords, PointSet};
use crate::result::{Match, MatchResult, SearchStats};
use crate::threshold::Threshold;

/// Scan start hint carried from one query to the next.
///
/// Holds the index of the previous query's best match. Query sets that vary
/// smoothly tend to have their next best match nearby, so starting there
/// lets the pruning test fire sooner. Every candidate is still visited, so
/// the cursor never changes which distance is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor(usize);

impl Cursor {
    /// Creates a cursor positioned at reference index `position`.
    pub fn new(position: usize) -> Self {
        Self(position)
    }

    /// Returns the reference index the next scan starts from.
    pub fn position(&self) -> usize {
        self.0
    }
}

/// A reference set prepared for repeated thresholded nearest-neighbor queries.
///
/// Construction validates the thresholds and builds the [`DistanceCache`];
/// afterwards the matcher is immutable and can serve any number of query
/// sets, sequentially or in parallel.
///
/// # Example
///
/// ```
/// use proxima_match::{Cursor, Coords, MatchConfig, Matcher, PointSet, SearchStats, Threshold};
///
/// let reference = PointSet::from_rows(&[[0.0, 0.0], [10.0, 0.0]], 2).unwrap();
/// let matcher = Matcher::new(&reference, &Threshold::Scalar(1.0), MatchConfig::default()).unwrap();
///
/// let mut cursor = Cursor::default();
/// let mut stats = SearchStats::default();
/// let m = matcher.match_one(Coords::new(&[9.5, 0.0]), &mut cursor, &mut stats).unwrap().unwrap();
/// assert_eq!(m.index, 1);
/// assert_eq!(cursor.position(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Matcher<'a> {
    reference: &'a PointSet,
    threshold2: Vec<f64>,
    cache: DistanceCache,
    config: MatchConfig,
}

impl<'a> Matcher<'a> {
    /// Prepares `reference` for matching.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the configuration is invalid, the threshold
    /// does not fit the reference set, or a reference coordinate is not finite.
    pub fn new(
        reference: &'a PointSet,
        threshold: &Threshold,
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        if !reference.is_finite() {
            return Err(MatchError::NonFiniteInput { input: "reference" });
        }
        let threshold2 = threshold.squared(reference.len())?;
        let cache = DistanceCache::build(reference, config.metric());
        Ok(Self {
            reference,
            threshold2,
            cache,
            config,
        })
    }

    /// Returns the reference set.
    pub fn reference(&self) -> &PointSet {
        self.reference
    }

    /// Returns the reference distance cache.
    pub fn cache(&self) -> &DistanceCache {
        &self.cache
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Finds the closest reference point within its threshold of `query`.
    ///
    /// Candidates are visited circularly from `cursor` (or from 0 when warm
    /// start is disabled). A candidate whose cached distance to the current
    /// best exceeds twice the best distance is skipped: by the triangle
    /// inequality it cannot be closer to the query. On a match the cursor
    /// moves to the matched index; otherwise it is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DimensionMismatch`] if `query` does not have the
    /// reference dimensionality, and [`MatchError::NonFiniteInput`] if it
    /// holds a NaN or infinite coordinate. The cursor is untouched then.
    pub fn match_one(
        &self,
        query: Coords<'_>,
        cursor: &mut Cursor,
        stats: &mut SearchStats,
    ) -> Result<Option<Match>, MatchError> {
        if query.dims() != self.reference.dims() {
            return Err(MatchError::DimensionMismatch {
                reference: self.reference.dims(),
                query: query.dims(),
            });
        }
        if !query.iter().all(f64::is_finite) {
            return Err(MatchError::NonFiniteInput { input: "query" });
        }
        Ok(self.search(query, cursor, stats))
    }

    fn search(
        &self,
        query: Coords<'_>,
        cursor: &mut Cursor,
        stats: &mut SearchStats,
    ) -> Option<Match> {
        let nx = self.reference.len();
        if nx == 0 {
            return None;
        }
        let metric = self.config.metric();
        let start = if self.config.warm_start() {
            cursor.0 % nx
        } else {
            0
        };

        let mut best: Option<usize> = None;
        let mut best_d2 = f64::INFINITY;

        for step in 0..nx {
            let xj = (start + step) % nx;

            // `best_d2` only ever holds a fully accumulated distance here.
            if let Some(b) = best
                && self.cache.get(b, xj) > 4.0 * best_d2
            {
                stats.pruned += 1;
                continue;
            }

            stats.evaluated += 1;
            let d2 = metric.distance2_bounded(self.reference.point(xj), query, best_d2);
            if d2 > self.threshold2[xj] {
                stats.rejected += 1;
                continue;
            }
            // A squared distance can overflow to +inf; the first eligible
            // candidate still becomes the best.
            if best.is_none() || d2 < best_d2 {
                best = Some(xj);
                best_d2 = d2;
            }
        }

        best.map(|index| {
            cursor.0 = index;
            Match::new(index, best_d2.sqrt())
        })
    }

    /// Matches every point of `queries` in order, threading one cursor
    /// through the whole set.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if `queries` has a different dimensionality
    /// from the reference set or contains non-finite coordinates.
    pub fn match_all(&self, queries: &PointSet) -> Result<MatchResult, MatchError> {
        self.check_queries(queries)?;
        let _span = debug_span!("match_all", nx = self.reference.len(), ny = queries.len()).entered();

        let mut cursor = Cursor::default();
        let mut stats = SearchStats::default();
        let matches = queries
            .iter()
            .map(|q| self.search(q, &mut cursor, &mut stats))
            .collect();

        log_stats(&stats);
        Ok(MatchResult::new(matches, stats))
    }

    /// Matches every point of `queries` on the rayon thread pool.
    ///
    /// Queries are split into contiguous chunks of
    /// [`MatchConfig::chunk_size`]; each chunk starts with a fresh cursor.
    /// Results equal [`Matcher::match_all`] except that, among reference
    /// points at exactly the same distance, a different one may be chosen.
    ///
    /// # Errors
    ///
    /// Same as [`Matcher::match_all`].
    pub fn match_all_parallel(&self, queries: &PointSet) -> Result<MatchResult, MatchError> {
        self.check_queries(queries)?;
        let ny = queries.len();
        let chunk_size = self.config.chunk_size();
        let _span = debug_span!(
            "match_all_parallel",
            nx = self.reference.len(),
            ny,
            chunk_size
        )
        .entered();

        let starts: Vec<usize> = (0..ny).step_by(chunk_size).collect();
        let chunks: Vec<(Vec<Option<Match>>, SearchStats)> = starts
            .par_iter()
            .map(|&start| {
                let end = (start + chunk_size).min(ny);
                let mut cursor = Cursor::default();
                let mut stats = SearchStats::default();
                let matches: Vec<Option<Match>> = (start..end)
                    .map(|q| self.search(queries.point(q), &mut cursor, &mut stats))
                    .collect();
                (matches, stats)
            })
            .collect();

        let mut matches = Vec::with_capacity(ny);
        let mut stats = SearchStats::default();
        for (chunk, chunk_stats) in chunks {
            matches.extend(chunk);
            stats += chunk_stats;
        }

        log_stats(&stats);
        Ok(MatchResult::new(matches, stats))
    }

    fn check_queries(&self, queries: &PointSet) -> Result<(), MatchError> {
        if queries.dims() != self.reference.dims() {
            return Err(MatchError::DimensionMismatch {
                reference: self.reference.dims(),
                query: queries.dims(),
            });
        }
        if !queries.is_finite() {
            return Err(MatchError::NonFiniteInput { input: "query" });
        }
        Ok(())
    }
}

fn log_stats(stats: &SearchStats) {
    debug!(
        pruned = stats.pruned,
        evaluated = stats.evaluated,
        rejected = stats.rejected,
        prune_ratio = stats.prune_ratio(),
        "search finished"
    );
}

/// Matches each query point to its nearest reference point within threshold.
///
/// This is the simple entry point: it checks that both sets share a
/// dimensionality, builds a [`Matcher`] and runs it sequentially or in
/// parallel according to `config`.
///
/// # Arguments
///
/// * `reference` — the candidate points (X)
/// * `queries` — the points to match (Y)
/// * `threshold` — scalar or per-reference maximum match distance
/// * `config` — metric, warm start and parallelism settings
///
/// # Errors
///
/// Returns [`MatchError`] for mismatched dimensions, a malformed threshold,
/// non-finite coordinates or an invalid config. No search runs in that case.
pub fn match_points(
    reference: &PointSet,
    queries: &PointSet,
    threshold: &Threshold,
    config: &MatchConfig,
) -> Result<MatchResult, MatchError> {
    if reference.dims() != queries.dims() {
        return Err(MatchError::DimensionMismatch {
            reference: reference.dims(),
            query: queries.dims(),
        });
    }
    let matcher = Matcher::new(reference, threshold, config.clone())?;
    if config.parallel() {
        matcher.match_all_parallel(queries)
    } else {
        matcher.match_all(queries)
    }
}

/// Matches by scanning every reference point for every query, without
/// pruning or early exit.
///
/// Candidates are visited in index order, so among equidistant reference
/// points the lowest index wins. Used as the baseline that the pruned
/// search must agree with.
///
/// # Errors
///
/// Same as [`match_points`].
pub fn match_exhaustive(
    reference: &PointSet,
    queries: &PointSet,
    threshold: &Threshold,
    metric: Metric,
) -> Result<MatchResult, MatchError> {
    if reference.dims() != queries.dims() {
        return Err(MatchError::DimensionMismatch {
            reference: reference.dims(),
            query: queries.dims(),
        });
    }
    if !reference.is_finite() {
        return Err(MatchError::NonFiniteInput { input: "reference" });
    }
    if !queries.is_finite() {
        return Err(MatchError::NonFiniteInput { input: "query" });
    }
    let threshold2 = threshold.squared(reference.len())?;

    let mut stats = SearchStats::default();
    let matches = queries
        .iter()
        .map(|q| {
            let mut best: Option<(usize, f64)> = None;
            for (xj, x) in reference.iter().enumerate() {
                stats.evaluated += 1;
                let d2 = metric.distance2(x, q);
                if d2 > threshold2[xj] {
                    stats.rejected += 1;
                    continue;
                }
                if best.is_none_or(|(_, b)| d2 < b) {
                    best = Some((xj, d2));
                }
            }
            best.map(|(index, d2)| Match::new(index, d2.sqrt()))
        })
        .collect();

    Ok(MatchResult::new(matches, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn points(rows: &[[f64; 2]]) -> PointSet {
        PointSet::from_rows(rows, 2).unwrap()
    }

    // Test: nearest of two within threshold
    #[test]
    fn test_nearest_within_threshold() {
        let x = points(&[[0.0, 0.0], [10.0, 0.0]]);
        let y = points(&[[0.1, 0.0]]);
        let result = match_points(&x, &y, &Threshold::Scalar(1.0), &MatchConfig::default()).unwrap();
        let m = result.get(0).unwrap();
        assert_eq!(m.index, 0);
        assert_abs_diff_eq!(m.distance, 0.1, epsilon = 1e-12);
    }

    // Test: beyond threshold is no match
    #[test]
    fn test_beyond_threshold() {
        let x = points(&[[0.0, 0.0]]);
        let y = points(&[[5.0, 0.0]]);
        let result = match_points(&x, &y, &Threshold::Scalar(1.0), &MatchConfig::default()).unwrap();
        assert_eq!(result.get(0), None);
        assert!(result.distances()[0].is_nan());
    }

    // Test: per-point thresholds pick the eligible coincident point
    #[test]
    fn test_per_point_threshold_coincident() {
        let x = points(&[[0.0, 0.0], [0.0, 0.0]]);
        let y = points(&[[0.6, 0.0]]);
        let threshold = Threshold::PerPoint(vec![0.5, 100.0]);
        let result = match_points(&x, &y, &threshold, &MatchConfig::default()).unwrap();
        let m = result.get(0).unwrap();
        assert_eq!(m.index, 1);
        assert_abs_diff_eq!(m.distance, 0.6, epsilon = 1e-12);
    }

    // Test: empty reference set never matches
    #[test]
    fn test_empty_reference() {
        let x = PointSet::empty(2).unwrap();
        let y = points(&[[0.0, 0.0], [1.0, 1.0]]);
        let result = match_points(&x, &y, &Threshold::Scalar(10.0), &MatchConfig::default()).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.n_matched(), 0);
    }

    // Test: empty query set gives an empty result
    #[test]
    fn test_empty_queries() {
        let x = points(&[[0.0, 0.0]]);
        let y = PointSet::empty(2).unwrap();
        let result = match_points(&x, &y, &Threshold::Scalar(1.0), &MatchConfig::default()).unwrap();
        assert!(result.is_empty());
    }

    // Test: zero threshold only matches coincident points
    #[test]
    fn test_zero_threshold() {
        let x = points(&[[1.0, 1.0], [2.0, 2.0]]);
        let y = points(&[[2.0, 2.0], [2.0, 2.000001]]);
        let result = match_points(&x, &y, &Threshold::Scalar(0.0), &MatchConfig::default()).unwrap();
        assert_eq!(result.get(0), Some(Match::new(1, 0.0)));
        assert_eq!(result.get(1), None);
    }

    // Test: cursor follows matches and stays put on a miss
    #[test]
    fn test_cursor_updates() {
        let x = points(&[[0.0, 0.0], [5.0, 0.0], [10.0, 0.0]]);
        let matcher = Matcher::new(&x, &Threshold::Scalar(1.0), MatchConfig::default()).unwrap();
        let mut cursor = Cursor::default();
        let mut stats = SearchStats::default();

        let m = matcher.match_one(Coords::new(&[9.8, 0.0]), &mut cursor, &mut stats).unwrap();
        assert_eq!(m.map(|m| m.index), Some(2));
        assert_eq!(cursor.position(), 2);

        let m = matcher.match_one(Coords::new(&[2.5, 0.0]), &mut cursor, &mut stats).unwrap();
        assert_eq!(m, None);
        assert_eq!(cursor.position(), 2);

        let m = matcher.match_one(Coords::new(&[5.2, 0.0]), &mut cursor, &mut stats).unwrap();
        assert_eq!(m.map(|m| m.index), Some(1));
        assert_eq!(cursor.position(), 1);
    }

    // Test: a far-away reference point is pruned once a close best exists
    #[test]
    fn test_pruning_counts() {
        // Query sits on x0; x1 is 100 away from x0.
        let x = points(&[[0.0, 0.0], [100.0, 0.0]]);
        let matcher =
            Matcher::new(&x, &Threshold::Scalar(f64::INFINITY), MatchConfig::default()).unwrap();
        let mut cursor = Cursor::default();
        let mut stats = SearchStats::default();
        let m = matcher.match_one(Coords::new(&[0.5, 0.0]), &mut cursor, &mut stats).unwrap();
        assert_eq!(m.map(|m| m.index), Some(0));
        assert_eq!(stats.evaluated, 1);
        assert_eq!(stats.pruned, 1);
    }

    // Test: threshold rejections are counted
    #[test]
    fn test_rejection_counts() {
        let x = points(&[[0.0, 0.0]]);
        let y = points(&[[3.0, 0.0], [0.5, 0.0]]);
        let result = match_points(&x, &y, &Threshold::Scalar(1.0), &MatchConfig::default()).unwrap();
        assert_eq!(result.stats().evaluated, 2);
        assert_eq!(result.stats().rejected, 1);
    }

    // Test: cursor beyond the reference range still visits every candidate
    #[test]
    fn test_out_of_range_cursor() {
        let x = points(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        let matcher =
            Matcher::new(&x, &Threshold::Scalar(0.5), MatchConfig::default()).unwrap();
        let mut stats = SearchStats::default();
        for position in [17, usize::MAX - 1, usize::MAX] {
            let mut cursor = Cursor::new(position);
            let m = matcher
                .match_one(Coords::new(&[1.1, 0.0]), &mut cursor, &mut stats)
                .unwrap();
            assert_eq!(m.map(|m| m.index), Some(1));
            assert_eq!(cursor.position(), 1);
        }
        assert_eq!(stats.evaluated + stats.pruned, 9);
    }

    // Test: cursor on an empty reference set is left alone
    #[test]
    fn test_cursor_with_empty_reference() {
        let x = PointSet::empty(2).unwrap();
        let matcher = Matcher::new(&x, &Threshold::Scalar(1.0), MatchConfig::default()).unwrap();
        let mut cursor = Cursor::new(usize::MAX);
        let mut stats = SearchStats::default();
        let m = matcher
            .match_one(Coords::new(&[0.0, 0.0]), &mut cursor, &mut stats)
            .unwrap();
        assert_eq!(m, None);
        assert_eq!(cursor.position(), usize::MAX);
    }

    // Test: a single query is validated before the search runs
    #[test]
    fn test_match_one_rejects_bad_query() {
        let x = points(&[[0.0, 0.0], [1.0, 0.0]]);
        let matcher = Matcher::new(&x, &Threshold::Scalar(5.0), MatchConfig::default()).unwrap();
        let mut cursor = Cursor::new(1);
        let mut stats = SearchStats::default();

        let err = matcher
            .match_one(Coords::new(&[0.0]), &mut cursor, &mut stats)
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::DimensionMismatch {
                reference: 2,
                query: 1
            }
        );
        let err = matcher
            .match_one(Coords::new(&[0.0, 0.0, 0.0]), &mut cursor, &mut stats)
            .unwrap_err();
        assert!(matches!(err, MatchError::DimensionMismatch { query: 3, .. }));
        let err = matcher
            .match_one(Coords::new(&[f64::NAN, 0.0]), &mut cursor, &mut stats)
            .unwrap_err();
        assert_eq!(err, MatchError::NonFiniteInput { input: "query" });

        assert_eq!(cursor.position(), 1);
        assert_eq!(stats, SearchStats::default());
    }

    // Test: squared distances that overflow still produce a match
    #[test]
    fn test_overflowing_distance_still_matches() {
        let x = PointSet::from_rows(&[[0.0]], 1).unwrap();
        let y = PointSet::from_rows(&[[1e200]], 1).unwrap();
        let threshold = Threshold::Scalar(1e300);
        let pruned = match_points(&x, &y, &threshold, &MatchConfig::default()).unwrap();
        let exhaustive = match_exhaustive(&x, &y, &threshold, Metric::Euclidean).unwrap();
        assert_eq!(pruned.indices(), vec![Some(0)]);
        assert_eq!(pruned.matches(), exhaustive.matches());
    }

    // Test: exhaustive baseline agrees on the hand-computed cases
    #[test]
    fn test_exhaustive_baseline() {
        let x = points(&[[0.0, 0.0], [0.0, 0.0], [3.0, 3.0]]);
        let y = points(&[[0.6, 0.0], [3.0, 2.0], [50.0, 50.0]]);
        let threshold = Threshold::PerPoint(vec![0.5, 100.0, 1.0]);
        let exhaustive = match_exhaustive(&x, &y, &threshold, Metric::Euclidean).unwrap();
        let pruned = match_points(&x, &y, &threshold, &MatchConfig::default()).unwrap();
        assert_eq!(exhaustive.indices(), vec![Some(1), Some(2), Some(1)]);
        assert_eq!(pruned.indices(), exhaustive.indices());
        assert_eq!(exhaustive.stats().evaluated, 9);
    }

    // Test: all error cases
    #[test]
    fn test_error_dimension_mismatch() {
        let x = points(&[[0.0, 0.0]]);
        let y = PointSet::from_rows(&[[0.0, 0.0, 0.0]], 3).unwrap();
        let result = match_points(&x, &y, &Threshold::Scalar(1.0), &MatchConfig::default());
        assert_eq!(
            result,
            Err(MatchError::DimensionMismatch {
                reference: 2,
                query: 3
            })
        );
        let result = match_exhaustive(&x, &y, &Threshold::Scalar(1.0), Metric::Euclidean);
        assert!(matches!(result, Err(MatchError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_error_threshold_length() {
        let x = points(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        let y = points(&[[0.0, 0.0]]);
        let threshold = Threshold::PerPoint(vec![1.0, 2.0]);
        let result = match_points(&x, &y, &threshold, &MatchConfig::default());
        assert_eq!(
            result,
            Err(MatchError::ThresholdLength {
                len: 2,
                n_reference: 3
            })
        );
    }

    // Test: a one-element threshold vector applies to every reference point
    #[test]
    fn test_single_threshold_vector_broadcasts() {
        let x = points(&[[0.0, 0.0], [10.0, 0.0]]);
        let y = points(&[[0.1, 0.0], [9.0, 0.0]]);
        let threshold = Threshold::PerPoint(vec![1.0]);
        let result = match_points(&x, &y, &threshold, &MatchConfig::default()).unwrap();
        let m = result.get(0).unwrap();
        assert_eq!(m.index, 0);
        assert_abs_diff_eq!(m.distance, 0.1, epsilon = 1e-12);
        assert_eq!(result.get(1).map(|m| m.index), Some(1));
    }

    #[test]
    fn test_error_negative_threshold() {
        let x = points(&[[0.0, 0.0]]);
        let y = points(&[[0.0, 0.0]]);
        let result = match_points(&x, &y, &Threshold::Scalar(-1.0), &MatchConfig::default());
        assert!(matches!(result, Err(MatchError::InvalidThreshold { .. })));
    }

    #[test]
    fn test_error_non_finite() {
        let x = points(&[[0.0, f64::NAN]]);
        let y = points(&[[0.0, 0.0]]);
        let result = match_points(&x, &y, &Threshold::Scalar(1.0), &MatchConfig::default());
        assert_eq!(
            result,
            Err(MatchError::NonFiniteInput { input: "reference" })
        );

        let x = points(&[[0.0, 0.0]]);
        let y = points(&[[f64::INFINITY, 0.0]]);
        let result = match_points(&x, &y, &Threshold::Scalar(1.0), &MatchConfig::default());
        assert_eq!(result, Err(MatchError::NonFiniteInput { input: "query" }));
    }

    #[test]
    fn test_error_invalid_config() {
        let x = points(&[[0.0, 0.0]]);
        let config = MatchConfig::new().with_chunk_size(0);
        let result = Matcher::new(&x, &Threshold::Scalar(1.0), config);
        assert!(matches!(result, Err(MatchError::InvalidChunkSize { .. })));
    }

    // Test: parallel path matches sequential on a small set
    #[test]
    fn test_parallel_matches_sequential() {
        let x = points(&[[0.0, 0.0], [4.0, 0.0], [8.0, 0.0], [12.0, 0.0]]);
        let y = points(&[[0.3, 0.1], [4.2, -0.1], [7.0, 0.0], [11.9, 0.4], [30.0, 0.0]]);
        let config = MatchConfig::new().with_chunk_size(2);
        let matcher = Matcher::new(&x, &Threshold::Scalar(1.5), config).unwrap();
        let seq = matcher.match_all(&y).unwrap();
        let par = matcher.match_all_parallel(&y).unwrap();
        assert_eq!(seq.matches(), par.matches());
        assert_eq!(seq.indices(), vec![Some(0), Some(1), Some(2), Some(3), None]);
    }
}
