//! Pure conversion functions: CLI args + TOML config -> crate API types.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use proxima_io::{IndexBase, points_from_rows, read_point_rows, read_threshold};
use proxima_match::{MatchConfig, Metric, PointSet, Threshold};

use crate::cli::MatchArgs;
use crate::config::{MatchToml, ProximaConfig};

/// Where the threshold comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdSource {
    Value(f64),
    File(PathBuf),
}

/// Fully resolved settings for one run.
#[derive(Debug)]
pub struct RunSettings {
    pub reference: PathBuf,
    pub query: PathBuf,
    pub threshold: ThresholdSource,
    pub output: Option<PathBuf>,
    pub index_base: IndexBase,
    pub match_config: MatchConfig,
}

/// Point sets and threshold loaded for one run.
#[derive(Debug)]
pub struct Inputs {
    pub reference: PointSet,
    pub queries: PointSet,
    pub threshold: Threshold,
}

/// Parses a metric name string into the corresponding enum variant.
pub fn parse_metric(s: &str) -> Result<Metric> {
    match s.to_lowercase().as_str() {
        "euclidean" => Ok(Metric::Euclidean),
        "cityblock" | "manhattan" => Ok(Metric::Cityblock),
        other => bail!("unknown metric: {other:?}"),
    }
}

/// Builds a [`MatchConfig`] from the TOML matching section.
pub fn build_match_config(m: &MatchToml) -> Result<MatchConfig> {
    let config = MatchConfig::new()
        .with_metric(parse_metric(&m.metric)?)
        .with_warm_start(m.warm_start)
        .with_parallel(m.parallel)
        .with_chunk_size(m.chunk_size);
    config.validate()?;
    Ok(config)
}

/// Merges CLI arguments over the config file.
pub fn resolve(args: &MatchArgs, config: &ProximaConfig) -> Result<RunSettings> {
    let reference = args
        .reference
        .clone()
        .or_else(|| config.io.reference.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("no reference path: set [io].reference in config or use --reference")
        })?;
    let query = args
        .query
        .clone()
        .or_else(|| config.io.query.clone())
        .ok_or_else(|| anyhow::anyhow!("no query path: set [io].query in config or use --query"))?;

    let threshold = match (args.threshold, &args.thresholds) {
        (Some(t), _) => ThresholdSource::Value(t),
        (None, Some(path)) => ThresholdSource::File(path.clone()),
        (None, None) => match (config.matching.threshold, &config.io.thresholds) {
            (Some(t), None) => ThresholdSource::Value(t),
            (None, Some(path)) => ThresholdSource::File(path.clone()),
            (Some(_), Some(_)) => {
                bail!("config sets both [match].threshold and [io].thresholds; keep one")
            }
            (None, None) => {
                bail!("no threshold: use --threshold, --thresholds or set one in config")
            }
        },
    };

    let mut match_config = build_match_config(&config.matching)?;
    if let Some(ref m) = args.metric {
        match_config = match_config.with_metric(parse_metric(m)?);
    }
    if args.parallel {
        match_config = match_config.with_parallel(true);
    }
    if args.no_warm_start {
        match_config = match_config.with_warm_start(false);
    }

    let index_base = if args.one_based || config.io.one_based {
        IndexBase::One
    } else {
        IndexBase::Zero
    };

    Ok(RunSettings {
        reference,
        query,
        threshold,
        output: args.output.clone().or_else(|| config.io.output.clone()),
        index_base,
        match_config,
    })
}

/// Reads both point files and the threshold.
///
/// Dimensionality comes from whichever point file has rows, so an empty
/// reference or query file is accepted as long as the other one is not.
pub fn load_inputs(settings: &RunSettings) -> Result<Inputs> {
    let ref_rows = read_point_rows(&settings.reference)
        .with_context(|| format!("failed to read {}", settings.reference.display()))?;
    let query_rows = read_point_rows(&settings.query)
        .with_context(|| format!("failed to read {}", settings.query.display()))?;

    let dims = ref_rows.first().or(query_rows.first()).map(Vec::len);
    let reference = points_from_rows(&settings.reference, &ref_rows, dims)?;
    let queries = points_from_rows(&settings.query, &query_rows, Some(reference.dims()))?;

    let threshold = match &settings.threshold {
        ThresholdSource::Value(t) => Threshold::Scalar(*t),
        ThresholdSource::File(path) => read_threshold(path)
            .with_context(|| format!("failed to read thresholds: {}", path.display()))?,
    };

    Ok(Inputs {
        reference,
        queries,
        threshold,
    })
}
