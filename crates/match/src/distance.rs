//! Squared-distance primitives over strided coordinate views.
//!
//! Every metric comes in two forms:
//!
//! - a full accumulation, used for the reference-to-reference cache;
//! - a bounded accumulation that stops as soon as the running value reaches
//!   `bound`. The partial value it returns is a lower bound of the full
//!   distance, which is all a "no better than the current best" test needs.

use std::ops::ControlFlow;

use crate::points::Coords;

/// Distance metric used for matching.
///
/// Both variants are reported as *squared* values; the matcher takes the
/// square root only for the final emitted distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Metric {
    /// Squared Euclidean distance: `Σ (a[k] − b[k])²`.
    #[default]
    Euclidean,
    /// Squared city-block distance: `(Σ |a[k] − b[k]|)²`.
    Cityblock,
}

impl Metric {
    /// Returns the lowercase name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Cityblock => "cityblock",
        }
    }

    /// Computes the full squared distance between `a` and `b`.
    #[inline]
    pub fn distance2(self, a: Coords<'_>, b: Coords<'_>) -> f64 {
        match self {
            Self::Euclidean => sq_euclidean(a, b),
            Self::Cityblock => sq_cityblock(a, b),
        }
    }

    /// Computes the squared distance, stopping once it reaches `bound`.
    #[inline]
    pub fn distance2_bounded(self, a: Coords<'_>, b: Coords<'_>, bound: f64) -> f64 {
        match self {
            Self::Euclidean => sq_euclidean_bounded(a, b, bound),
            Self::Cityblock => sq_cityblock_bounded(a, b, bound),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Squared Euclidean distance over all dimensions.
pub fn sq_euclidean(a: Coords<'_>, b: Coords<'_>) -> f64 {
    debug_assert_eq!(a.dims(), b.dims());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Squared Euclidean distance that stops accumulating once `bound` is reached.
pub fn sq_euclidean_bounded(a: Coords<'_>, b: Coords<'_>, bound: f64) -> f64 {
    debug_assert_eq!(a.dims(), b.dims());
    let folded = a.iter().zip(b.iter()).try_fold(0.0, |acc, (x, y)| {
        if acc >= bound {
            return ControlFlow::Break(acc);
        }
        let d = x - y;
        ControlFlow::Continue(acc + d * d)
    });
    match folded {
        ControlFlow::Continue(v) | ControlFlow::Break(v) => v,
    }
}

/// Squared city-block distance over all dimensions.
pub fn sq_cityblock(a: Coords<'_>, b: Coords<'_>) -> f64 {
    debug_assert_eq!(a.dims(), b.dims());
    let l1: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum();
    l1 * l1
}

/// Squared city-block distance that stops accumulating once `bound` is reached.
pub fn sq_cityblock_bounded(a: Coords<'_>, b: Coords<'_>, bound: f64) -> f64 {
    debug_assert_eq!(a.dims(), b.dims());
    let folded = a.iter().zip(b.iter()).try_fold(0.0_f64, |l1, (x, y)| {
        if l1 * l1 >= bound {
            return ControlFlow::Break(l1);
        }
        ControlFlow::Continue(l1 + (x - y).abs())
    });
    let l1 = match folded {
        ControlFlow::Continue(v) | ControlFlow::Break(v) => v,
    };
    l1 * l1
}
