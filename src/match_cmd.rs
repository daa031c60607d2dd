//! Match command: run the matcher and write the results.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use proxima_io::{MatchOutput, to_json, write_matches};
use proxima_match::match_points;

use crate::cli::MatchArgs;
use crate::config::ProximaConfig;
use crate::convert;

/// Run the matching pipeline.
pub fn run(args: MatchArgs) -> Result<()> {
    let _cmd = info_span!("match").entered();
    // 1. Settings
    let config = ProximaConfig::load(args.config.as_deref())?;
    let settings = convert::resolve(&args, &config)?;

    // 2. Inputs
    let inputs = convert::load_inputs(&settings)?;
    info!(
        n_reference = inputs.reference.len(),
        n_query = inputs.queries.len(),
        dims = inputs.reference.dims(),
        metric = %settings.match_config.metric(),
        parallel = settings.match_config.parallel(),
        "inputs loaded"
    );

    // 3. Match
    let result = match_points(
        &inputs.reference,
        &inputs.queries,
        &inputs.threshold,
        &settings.match_config,
    )
    .context("matching failed")?;
    let stats = result.stats();
    info!(
        n_matched = result.n_matched(),
        n_query = result.len(),
        pruned = stats.pruned,
        evaluated = stats.evaluated,
        "matching finished"
    );

    // 4. Output
    let output = MatchOutput::new(
        &result,
        inputs.reference.len(),
        settings.match_config.metric(),
        settings.index_base,
    );
    match &settings.output {
        Some(path) => write_matches(path, &output)
            .with_context(|| format!("failed to write results: {}", path.display()))?,
        None => println!("{}", to_json(&output)?),
    }
    Ok(())
}
