//! Nodedist / tokenvsnode commands

use super::{emit, BoundArgs, InputArgs, RunContext};
use crate::reporters::{report_distribution, DistributionKind, DistributionReport};
use anyhow::{Context, Result};
use node_distance_fast::{nodedist_distribution, tokenvsnode_distribution};
use tracing::debug;

/// Run a distribution command
pub fn run(
    kind: DistributionKind,
    input: &InputArgs,
    bounds: &BoundArgs,
    ctx: &RunContext,
) -> Result<()> {
    let sentences = ctx.read(input)?;
    let cutoff = ctx.config.cutoff(input.cutoff);
    let batch = ctx.compute(&sentences, cutoff)?;

    let (xmin, xmax) = match kind {
        DistributionKind::Nodedist => ctx.config.nodedist_bounds(bounds.xmin, bounds.xmax),
        DistributionKind::Tokenvsnode => ctx.config.tokenvsnode_bounds(bounds.xmin, bounds.xmax),
    };
    debug!(%kind, ?xmin, ?xmax, pairs = batch.total_pairs(), "building distribution");

    let distribution = match kind {
        DistributionKind::Nodedist => nodedist_distribution(batch.node_observations(), xmin, xmax),
        DistributionKind::Tokenvsnode => tokenvsnode_distribution(
            batch.token_observations(),
            batch.node_observations(),
            xmin,
            xmax,
        ),
    }
    .with_context(|| format!("Failed to build {kind} distribution of {}", input.input.display()))?;

    let report = DistributionReport {
        kind,
        sentences: batch.len(),
        cutoff,
        xmin,
        xmax,
        distribution,
    };
    emit(report_distribution(&report, ctx.format)?);
    Ok(())
}
