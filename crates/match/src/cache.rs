//! Pairwise squared distances among reference points.

use tracing::trace;

use crate::distance::Metric;
use crate::points::PointSet;

/// Symmetric `n × n` matrix of squared reference-to-reference distances.
///
/// Each unordered pair is computed once with the full (non-early-exit)
/// accumulation and mirrored, so `get(i, j) == get(j, i)` holds bit for bit
/// and the diagonal is exactly zero. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct DistanceCache {
    n: usize,
    dist2: Vec<f64>,
}

impl DistanceCache {
    /// Computes all pairwise squared distances of `points` under `metric`.
    pub fn build(points: &PointSet, metric: Metric) -> Self {
        let n = points.len();
        let mut dist2 = vec![0.0; n * n];
        for j in 0..n {
            let pj = points.point(j);
            for i in (j + 1)..n {
                let d2 = metric.distance2(pj, points.point(i));
                dist2[j * n + i] = d2;
                dist2[i * n + j] = d2;
            }
        }
        trace!(n, %metric, "reference distance cache built");
        Self { n, dist2 }
    }

    /// Returns the number of reference points.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns `true` if the cache covers no points.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns the squared distance between reference points `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.dist2[i * self.n + j]
    }

    /// Returns the squared distances from reference point `i` to all others.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.dist2[i * self.n..(i + 1) * self.n]
    }
}
