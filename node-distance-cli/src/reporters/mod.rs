//! Output reporters for distance and distribution results
//!
//! Supports two output formats:
//! - `text` - aligned tables with a probability bar
//! - `json` - machine-readable JSON

mod json;
mod text;

use anyhow::{anyhow, Result};
use node_distance_fast::{BatchDistances, Distribution};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Which distribution a report describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    Nodedist,
    Tokenvsnode,
}

impl std::fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionKind::Nodedist => write!(f, "nodedist"),
            DistributionKind::Tokenvsnode => write!(f, "tokenvsnode"),
        }
    }
}

/// A distribution together with the parameters that produced it
#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub kind: DistributionKind,
    pub sentences: usize,
    pub cutoff: usize,
    pub xmin: Option<i64>,
    pub xmax: Option<i64>,
    #[serde(flatten)]
    pub distribution: Distribution,
}

/// Render per-sentence pair records
pub fn report_distances(batch: &BatchDistances, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_distances(batch),
        OutputFormat::Json => json::render_distances(batch),
    }
}

/// Render a distribution
pub fn report_distribution(report: &DistributionReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_distribution(report),
        OutputFormat::Json => json::render_distribution(report),
    }
}
