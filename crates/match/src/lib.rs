//! Thresholded nearest-neighbor matching between two point sets.
//!
//! For every query point, find the closest reference point whose own
//! distance threshold admits it, or report that none does. The search is
//! exhaustive but cheap in practice:
//!
//! | Technique | Effect |
//! |-----------|--------|
//! | Reference distance cache | all reference-to-reference distances computed once |
//! | Triangle-inequality pruning | skips any candidate farther than `2 × best` from the current best |
//! | Early-exit accumulation | stops summing coordinates once a candidate is already worse |
//! | Warm start | begins each scan at the previous query's match |
//!
//! No spatial index is built, which keeps setup at `O(nx² · D)` and suits
//! small-to-medium reference sets with spatially coherent queries.
//!
//! # Quick start
//!
//! ```
//! use proxima_match::{MatchConfig, PointSet, Threshold, match_points};
//!
//! let reference = PointSet::from_rows(&[[0.0, 0.0], [10.0, 0.0]], 2).unwrap();
//! let queries = PointSet::from_rows(&[[0.1, 0.0], [5.0, 5.0]], 2).unwrap();
//!
//! let result = match_points(&reference, &queries, &Threshold::Scalar(1.0), &MatchConfig::default()).unwrap();
//! assert_eq!(result.indices(), vec![Some(0), None]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! match_points()
//!   ├─ validate dimensions
//!   └─ Matcher::new()                   (matcher.rs)
//!        ├─ Threshold::squared()        (threshold.rs)
//!        ├─ DistanceCache::build()      (cache.rs)
//!        └─ match_all() / match_all_parallel()
//!             └─ match_one()            per query, Cursor threaded through
//!                  └─ Metric::distance2_bounded()   (distance.rs)
//! ```
//!
//! To match several query sets against one reference set, build a
//! [`Matcher`] once and call [`Matcher::match_all`] for each.

pub mod cache;
pub mod config;
pub mod distance;
pub mod error;
pub mod matcher;
pub mod points;
pub mod result;
pub mod threshold;

pub use cache::DistanceCache;
pub use config::MatchConfig;
pub use distance::Metric;
pub use error::MatchError;
pub use matcher::{Cursor, Matcher, match_exhaustive, match_points};
pub use points::{Coords, Layout, PointSet};
pub use result::{Match, MatchResult, SearchStats};
pub use threshold::Threshold;
