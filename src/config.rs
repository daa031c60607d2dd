use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Proxima configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProximaConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoConfig,

    /// Matching settings.
    #[serde(default, rename = "match")]
    pub matching: MatchToml,
}

impl ProximaConfig {
    /// Reads and parses a TOML config file, or returns defaults for `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    pub reference: Option<PathBuf>,
    pub query: Option<PathBuf>,
    pub thresholds: Option<PathBuf>,
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub one_based: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchToml {
    #[serde(default = "default_metric")]
    pub metric: String,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default = "default_true")]
    pub warm_start: bool,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for MatchToml {
    fn default() -> Self {
        Self {
            metric: default_metric(),
            threshold: None,
            warm_start: true,
            parallel: false,
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_metric() -> String {
    "euclidean".to_string()
}
fn default_true() -> bool {
    true
}
fn default_chunk_size() -> usize {
    256
}
