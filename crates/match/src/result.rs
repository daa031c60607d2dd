//! Output types for matching runs.

use std::ops::AddAssign;

/// The best reference point found for one query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// 0-based index into the reference set.
    pub index: usize,
    /// Distance to that reference point (not squared).
    pub distance: f64,
}

impl Match {
    /// Creates a new `Match`.
    pub fn new(index: usize, distance: f64) -> Self {
        Self { index, distance }
    }
}

/// Work counters for a matching run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidates skipped by the triangle-inequality test.
    pub pruned: u64,
    /// Candidates whose distance to the query was computed.
    pub evaluated: u64,
    /// Evaluated candidates rejected by their own threshold.
    pub rejected: u64,
}

impl SearchStats {
    /// Fraction of visited candidates that were pruned, or 0 if none were visited.
    pub fn prune_ratio(&self) -> f64 {
        let visited = self.pruned + self.evaluated;
        if visited == 0 {
            return 0.0;
        }
        self.pruned as f64 / visited as f64
    }
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.pruned += rhs.pruned;
        self.evaluated += rhs.evaluated;
        self.rejected += rhs.rejected;
    }
}

/// Result of matching a query set against a reference set.
///
/// Holds one entry per query point, in query order; `None` means no
/// reference point lies within its threshold of that query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    matches: Vec<Option<Match>>,
    stats: SearchStats,
}

impl MatchResult {
    /// Creates a new `MatchResult`.
    pub(crate) fn new(matches: Vec<Option<Match>>, stats: SearchStats) -> Self {
        Self { matches, stats }
    }

    /// Returns the per-query matches.
    pub fn matches(&self) -> &[Option<Match>] {
        &self.matches
    }

    /// Returns the match for query `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn get(&self, i: usize) -> Option<Match> {
        self.matches[i]
    }

    /// Returns the number of query points.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns `true` if there were no query points.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Returns the number of queries that found a match.
    pub fn n_matched(&self) -> usize {
        self.matches.iter().filter(|m| m.is_some()).count()
    }

    /// Iterates over the per-query matches.
    pub fn iter(&self) -> impl Iterator<Item = Option<Match>> + '_ {
        self.matches.iter().copied()
    }

    /// Returns the 0-based matched indices, `None` where unmatched.
    pub fn indices(&self) -> Vec<Option<usize>> {
        self.iter().map(|m| m.map(|m| m.index)).collect()
    }

    /// Returns the matched distances, NaN where unmatched.
    pub fn distances(&self) -> Vec<f64> {
        self.iter()
            .map(|m| m.map_or(f64::NAN, |m| m.distance))
            .collect()
    }

    /// Returns 1-based indices as floats, NaN where unmatched.
    ///
    /// This is the column layout numeric hosts such as MATLAB expect.
    pub fn one_based_indices(&self) -> Vec<f64> {
        self.iter()
            .map(|m| m.map_or(f64::NAN, |m| (m.index + 1) as f64))
            .collect()
    }

    /// Returns the work counters for the run.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> MatchResult {
        MatchResult::new(
            vec![Some(Match::new(2, 0.5)), None, Some(Match::new(0, 1.5))],
            SearchStats::default(),
        )
    }

    #[test]
    fn test_accessors() {
        let result = sample();
        assert_eq!(result.len(), 3);
        assert!(!result.is_empty());
        assert_eq!(result.n_matched(), 2);
        assert_eq!(result.get(0), Some(Match::new(2, 0.5)));
        assert_eq!(result.get(1), None);
        assert_eq!(result.indices(), vec![Some(2), None, Some(0)]);
    }

    #[test]
    fn test_distances_use_nan_for_missing() {
        let d = sample().distances();
        assert_eq!(d[0], 0.5);
        assert!(d[1].is_nan());
        assert_eq!(d[2], 1.5);
    }

    #[test]
    fn test_one_based_indices() {
        let idx = sample().one_based_indices();
        assert_eq!(idx[0], 3.0);
        assert!(idx[1].is_nan());
        assert_eq!(idx[2], 1.0);
    }

    #[test]
    fn test_stats_accumulate() {
        let mut total = SearchStats {
            pruned: 1,
            evaluated: 2,
            rejected: 0,
        };
        total += SearchStats {
            pruned: 3,
            evaluated: 2,
            rejected: 1,
        };
        assert_eq!(total.pruned, 4);
        assert_eq!(total.evaluated, 4);
        assert_eq!(total.rejected, 1);
        assert_abs_diff_eq!(total.prune_ratio(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_prune_ratio_empty() {
        assert_eq!(SearchStats::default().prune_ratio(), 0.0);
    }
}
