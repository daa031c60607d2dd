//! Verify command: compare the pruned search against an exhaustive scan.

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use proxima_match::{match_exhaustive, match_points};

use crate::cli::MatchArgs;
use crate::config::ProximaConfig;
use crate::convert;

/// Distances closer than this are treated as the same match.
const DISTANCE_TOL: f64 = 1e-9;

/// The pruned search disagreed with the exhaustive scan.
///
/// Kept apart from other failures so `main` can give it its own exit status.
#[derive(Debug, thiserror::Error)]
#[error("{mismatches} of {n_query} queries disagree with the exhaustive scan")]
pub struct Disagreement {
    pub mismatches: usize,
    pub n_query: usize,
}

/// Run both searches and report any query where they disagree.
pub fn run(args: MatchArgs) -> Result<()> {
    let _cmd = info_span!("verify").entered();
    let config = ProximaConfig::load(args.config.as_deref())?;
    let settings = convert::resolve(&args, &config)?;
    let inputs = convert::load_inputs(&settings)?;
    let metric = settings.match_config.metric();

    let pruned = match_points(
        &inputs.reference,
        &inputs.queries,
        &inputs.threshold,
        &settings.match_config,
    )
    .context("pruned search failed")?;
    let exhaustive = match_exhaustive(
        &inputs.reference,
        &inputs.queries,
        &inputs.threshold,
        metric,
    )
    .context("exhaustive search failed")?;

    let mut mismatches = 0usize;
    let mut ties = 0usize;
    for (q, (a, b)) in pruned.iter().zip(exhaustive.iter()).enumerate() {
        match (a, b) {
            (None, None) => {}
            (Some(a), Some(b)) if (a.distance - b.distance).abs() <= DISTANCE_TOL => {
                if a.index != b.index {
                    ties += 1;
                    debug!(query = q, pruned = a.index, exhaustive = b.index, "equidistant tie");
                }
            }
            _ => {
                mismatches += 1;
                warn!(query = q, pruned = ?a, exhaustive = ?b, "result differs");
            }
        }
    }

    let pruned_stats = pruned.stats();
    let full_stats = exhaustive.stats();
    info!(
        n_query = pruned.len(),
        ties,
        mismatches,
        evaluated_pruned = pruned_stats.evaluated,
        evaluated_exhaustive = full_stats.evaluated,
        "verification finished"
    );

    if mismatches > 0 {
        return Err(Disagreement {
            mismatches,
            n_query: pruned.len(),
        }
        .into());
    }
    println!(
        "ok: {} queries agree ({} matched, {} ties); evaluated {} of {} candidate distances",
        pruned.len(),
        pruned.n_matched(),
        ties,
        pruned_stats.evaluated,
        full_stats.evaluated
    );
    Ok(())
}
