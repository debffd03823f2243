//! Clipped frequency distributions of integer observations
//!
//! Turns raw distances into a probability mass function over a contiguous
//! integer support. Values beyond an explicit boundary are not dropped, they
//! are folded into the boundary bin:
//!
//! ```text
//! counts {0: 5, 1: 3, 2: 1, 5: 1}, xmin = 1, xmax = 3
//!   0, 1 -> bin 1 (8)
//!   2    -> bin 2 (1)
//!   5    -> bin 3 (1)
//! support [1, 2, 3], raw_freq [8, 1, 1], pdf [0.8, 0.1, 0.1]
//! ```

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::debug;

use crate::errors::{DistanceError, DistanceResult};

/// Lower boundary used for node distance distributions when none is given.
pub const DEFAULT_NODEDIST_XMIN: i64 = 1;

/// Widest support we are willing to materialize.
const MAX_SUPPORT_WIDTH: i128 = 1 << 24;

/// Distance observations, either one flat sequence or one sequence per sentence.
#[derive(Debug, Clone, Copy)]
pub enum Observations<'a> {
    Flat(&'a [u32]),
    Nested(&'a [Vec<u32>]),
}

impl<'a> Observations<'a> {
    /// Total number of observations after flattening
    pub fn len(&self) -> usize {
        match self {
            Observations::Flat(values) => values.len(),
            Observations::Nested(groups) => groups.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened values in sentence order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + 'a> {
        match *self {
            Observations::Flat(values) => Box::new(values.iter().copied()),
            Observations::Nested(groups) => Box::new(groups.iter().flatten().copied()),
        }
    }

    /// Per-sentence lengths, `None` for flat input.
    pub fn shape(&self) -> Option<Vec<usize>> {
        match self {
            Observations::Flat(_) => None,
            Observations::Nested(groups) => Some(groups.iter().map(Vec::len).collect()),
        }
    }
}

impl<'a> From<&'a [u32]> for Observations<'a> {
    fn from(values: &'a [u32]) -> Self {
        Observations::Flat(values)
    }
}

impl<'a> From<&'a Vec<u32>> for Observations<'a> {
    fn from(values: &'a Vec<u32>) -> Self {
        Observations::Flat(values)
    }
}

impl<'a> From<&'a [Vec<u32>]> for Observations<'a> {
    fn from(groups: &'a [Vec<u32>]) -> Self {
        Observations::Nested(groups)
    }
}

impl<'a> From<&'a Vec<Vec<u32>>> for Observations<'a> {
    fn from(groups: &'a Vec<Vec<u32>>) -> Self {
        Observations::Nested(groups)
    }
}

/// Empirical distribution over a contiguous integer support.
///
/// `support`, `pdf` and `raw_freq` have the same length; `raw_freq` sums to the
/// number of observations and `pdf` to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub support: Vec<i64>,
    pub pdf: Vec<f64>,
    pub raw_freq: Vec<u64>,
}

impl Distribution {
    pub fn len(&self) -> usize {
        self.support.len()
    }

    pub fn is_empty(&self) -> bool {
        self.support.is_empty()
    }

    /// Number of observations the distribution was built from
    pub fn total(&self) -> u64 {
        self.raw_freq.iter().sum()
    }

    /// Iterate `(value, probability, count)` bins in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64, u64)> + '_ {
        self.support
            .iter()
            .zip(&self.pdf)
            .zip(&self.raw_freq)
            .map(|((&x, &p), &f)| (x, p, f))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn is_leq_xmin(x: i64, xmin: Option<i64>) -> bool {
    xmin.is_some_and(|lo| x <= lo)
}

fn is_geq_xmax(x: i64, xmax: Option<i64>) -> bool {
    xmax.is_some_and(|hi| x >= hi)
}

/// Bin a value lands in after boundary folding
fn fold_bin(x: i64, xmin: Option<i64>, xmax: Option<i64>) -> i64 {
    match (xmin, xmax) {
        (Some(lo), _) if is_leq_xmin(x, xmin) => lo,
        (_, Some(hi)) if is_geq_xmax(x, xmax) => hi,
        _ => x,
    }
}

fn scale(freq: &[u64], total: u64) -> Vec<f64> {
    let total = total as f64;
    freq.iter().map(|&f| f as f64 / total).collect()
}

fn counts_overflow() -> DistanceError {
    DistanceError::invalid("counts overflow u64")
}

fn count_values(values: impl Iterator<Item = i64>) -> FxHashMap<i64, u64> {
    let mut counts = FxHashMap::default();
    for x in values {
        *counts.entry(x).or_insert(0) += 1;
    }
    counts
}

// ============================================================================
// DISTRIBUTIONS
// ============================================================================

/// Convert counted frequencies into a clipped distribution.
///
/// # Arguments
/// * `counts` - value -> number of occurrences
/// * `xmin` - if set, values <= xmin are counted in the xmin bin
/// * `xmax` - if set, values >= xmax are counted in the xmax bin
///
/// A boundary that is set always appears in the support, even with count 0.
///
/// # Errors
/// - `InvalidInput` if `counts` is empty or sums to zero
/// - `InvalidInput` if a folded bin or the total exceeds `u64::MAX`
/// - `InvalidInput` if `xmin > xmax`
/// - `InvalidInput` if the support would exceed 2^24 bins
pub fn to_distribution<S: BuildHasher>(
    counts: &HashMap<i64, u64, S>,
    xmin: Option<i64>,
    xmax: Option<i64>,
) -> DistanceResult<Distribution> {
    if counts.is_empty() {
        return Err(DistanceError::invalid("counts must not be empty"));
    }

    if let (Some(lo), Some(hi)) = (xmin, xmax) {
        if lo > hi {
            return Err(DistanceError::invalid(format!(
                "xmin ({lo}) must not exceed xmax ({hi})"
            )));
        }
    }

    // Step 1: fold out-of-boundary values into the boundary bins
    let mut folded: FxHashMap<i64, u64> = FxHashMap::default();
    for bound in [xmin, xmax].into_iter().flatten() {
        folded.insert(bound, 0);
    }
    for (&x, &f) in counts {
        let bin = folded.entry(fold_bin(x, xmin, xmax)).or_insert(0);
        *bin = bin.checked_add(f).ok_or_else(counts_overflow)?;
    }

    let total = folded
        .values()
        .try_fold(0u64, |acc, &f| acc.checked_add(f))
        .ok_or_else(counts_overflow)?;
    if total == 0 {
        return Err(DistanceError::invalid("counts must contain at least one observation"));
    }

    // Step 2: contiguous support from the smallest to the largest bin
    let (lo, hi) = folded
        .keys()
        .fold((i64::MAX, i64::MIN), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let width = i128::from(hi) - i128::from(lo) + 1;
    if width > MAX_SUPPORT_WIDTH {
        return Err(DistanceError::invalid(format!(
            "support [{lo}, {hi}] is too wide ({width} bins)"
        )));
    }

    let support: Vec<i64> = (lo..=hi).collect();
    let raw_freq: Vec<u64> = support
        .iter()
        .map(|x| folded.get(x).copied().unwrap_or(0))
        .collect();
    let pdf = scale(&raw_freq, total);

    debug!(bins = support.len(), total, ?xmin, ?xmax, "built distribution");

    Ok(Distribution {
        support,
        pdf,
        raw_freq,
    })
}

/// Distribution of node distances.
///
/// Nested input (one vector per sentence) is flattened first; the order of
/// observations does not matter.
///
/// # Errors
/// - `InvalidInput` if there are no observations, or see [`to_distribution`]
pub fn nodedist_distribution(
    nodedist: Observations<'_>,
    xmin: Option<i64>,
    xmax: Option<i64>,
) -> DistanceResult<Distribution> {
    if nodedist.is_empty() {
        return Err(DistanceError::invalid("nodedist must not be empty"));
    }

    let counts = count_values(nodedist.iter().map(i64::from));
    to_distribution(&counts, xmin, xmax)
}

/// Distribution of `token distance - node distance` over aligned pairs.
///
/// Positive values: tokens far apart in the sentence but syntactically close.
/// Negative values: tokens next to each other in the sentence but syntactically
/// distant.
///
/// Both inputs must come from the same distance computation. When both are
/// nested their per-sentence lengths must match; otherwise only the flattened
/// lengths are compared.
///
/// # Errors
/// - `InvalidInput` on shape or length mismatch, on empty input, or see
///   [`to_distribution`]
pub fn tokenvsnode_distribution(
    tokendist: Observations<'_>,
    nodedist: Observations<'_>,
    xmin: Option<i64>,
    xmax: Option<i64>,
) -> DistanceResult<Distribution> {
    check_alignment(&tokendist, &nodedist)?;
    if tokendist.is_empty() {
        return Err(DistanceError::invalid("tokendist and nodedist must not be empty"));
    }

    let differences = tokendist
        .iter()
        .zip(nodedist.iter())
        .map(|(token, node)| i64::from(token) - i64::from(node));
    let counts = count_values(differences);
    to_distribution(&counts, xmin, xmax)
}

fn check_alignment(tokendist: &Observations<'_>, nodedist: &Observations<'_>) -> DistanceResult<()> {
    if let (Some(token_shape), Some(node_shape)) = (tokendist.shape(), nodedist.shape()) {
        if token_shape.len() != node_shape.len() {
            return Err(DistanceError::invalid(format!(
                "tokendist has {} sentences but nodedist has {}",
                token_shape.len(),
                node_shape.len()
            )));
        }
        if let Some(k) = token_shape.iter().zip(&node_shape).position(|(a, b)| a != b) {
            return Err(DistanceError::invalid(format!(
                "sentence {k}: tokendist has {} values but nodedist has {}",
                token_shape[k], node_shape[k]
            )));
        }
        return Ok(());
    }

    let (token_len, node_len) = (tokendist.len(), nodedist.len());
    if token_len != node_len {
        return Err(DistanceError::invalid(format!(
            "tokendist has {token_len} values but nodedist has {node_len}"
        )));
    }
    Ok(())
}
