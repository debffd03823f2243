//! JSON reporter
//!
//! Pretty-printed JSON, suitable for piping to jq or loading with pandas.

use super::DistributionReport;
use anyhow::Result;
use node_distance_fast::BatchDistances;
use serde::Serialize;

#[derive(Serialize)]
struct SentenceRecords<'a> {
    sentence: usize,
    node_distances: &'a [u32],
    token_distances: &'a [u32],
    pairs: &'a [(u32, u32)],
}

/// Render a batch as a list of per-sentence records
pub fn render_distances(batch: &BatchDistances) -> Result<String> {
    let records: Vec<SentenceRecords<'_>> = (0..batch.len())
        .map(|k| SentenceRecords {
            sentence: k,
            node_distances: &batch.node_distances[k],
            token_distances: &batch.token_distances[k],
            pairs: &batch.pairs[k],
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Render a distribution with its parameters
pub fn render_distribution(report: &DistributionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
