//! Distances command - pair records per sentence

use super::{emit, InputArgs, RunContext};
use crate::reporters::report_distances;
use anyhow::Result;

/// Run the distances command
pub fn run(input: &InputArgs, ctx: &RunContext) -> Result<()> {
    let sentences = ctx.read(input)?;
    let cutoff = ctx.config.cutoff(input.cutoff);
    let batch = ctx.compute(&sentences, cutoff)?;

    emit(report_distances(&batch, ctx.format)?);
    Ok(())
}
