use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Proxima thresholded nearest-neighbor matcher.
#[derive(Parser)]
#[command(
    name = "proxima",
    version,
    about = "Match query points to their nearest reference point within a distance threshold"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Match every query point and write the results as JSON.
    Match(MatchArgs),
    /// Check the pruned search against an exhaustive scan on the same inputs.
    Verify(MatchArgs),
}

/// Arguments shared by `match` and `verify`.
///
/// Every flag overrides the corresponding value from the TOML config.
#[derive(clap::Args, Debug, Default)]
pub struct MatchArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reference point file (JSON array of rows).
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    /// Query point file (JSON array of rows).
    #[arg(short, long)]
    pub query: Option<PathBuf>,

    /// Distance threshold applied to every reference point.
    #[arg(short, long, conflicts_with = "thresholds")]
    pub threshold: Option<f64>,

    /// Threshold file: a JSON number or one number per reference point.
    #[arg(long)]
    pub thresholds: Option<PathBuf>,

    /// Distance metric: euclidean or cityblock.
    #[arg(short, long)]
    pub metric: Option<String>,

    /// Output JSON path (stdout if omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report 1-based reference indices.
    #[arg(long)]
    pub one_based: bool,

    /// Match query chunks in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Scan every query from reference index 0.
    #[arg(long)]
    pub no_warm_start: bool,
}
