//! Text (terminal) reporter

use super::DistributionReport;
use anyhow::Result;
use node_distance_fast::BatchDistances;
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

/// One block per sentence: i, j, node distance, token distance
pub fn render_distances(batch: &BatchDistances) -> Result<String> {
    let mut out = String::new();

    for k in 0..batch.len() {
        let pairs = &batch.pairs[k];
        writeln!(out, "sentence {k} ({} pairs)", pairs.len())?;
        if pairs.is_empty() {
            writeln!(out)?;
            continue;
        }
        writeln!(out, "{:>6} {:>6} {:>6} {:>6}", "i", "j", "node", "token")?;
        for ((&(i, j), node), token) in pairs
            .iter()
            .zip(&batch.node_distances[k])
            .zip(&batch.token_distances[k])
        {
            writeln!(out, "{i:>6} {j:>6} {node:>6} {token:>6}")?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "{} sentences, {} pairs",
        batch.len(),
        batch.total_pairs()
    )?;
    Ok(out)
}

/// Table of value, count, probability and a bar scaled to the largest bin
pub fn render_distribution(report: &DistributionReport) -> Result<String> {
    let dist = &report.distribution;
    let mut out = String::new();

    writeln!(
        out,
        "{} distribution: {} observations from {} sentences (cutoff {})",
        report.kind,
        dist.total(),
        report.sentences,
        report.cutoff
    )?;
    writeln!(
        out,
        "bounds: xmin={} xmax={}",
        format_bound(report.xmin),
        format_bound(report.xmax)
    )?;
    writeln!(out)?;
    writeln!(out, "{:>8} {:>10} {:>8}", "value", "count", "p")?;

    let max_p = dist.pdf.iter().copied().fold(0.0_f64, f64::max);
    for (x, p, f) in dist.iter() {
        writeln!(out, "{x:>8} {f:>10} {p:>8.4} {}", bar(p, max_p))?;
    }
    Ok(out)
}

fn format_bound(bound: Option<i64>) -> String {
    bound.map_or_else(|| "none".to_string(), |b| b.to_string())
}

fn bar(p: f64, max_p: f64) -> String {
    if max_p <= 0.0 {
        return String::new();
    }
    let len = ((p / max_p) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len)
}
