//! Python bindings (built with `--features python`)
//!
//! Flat and nested inputs get separate entry points instead of sniffing the
//! list shape at runtime. Distributions come back as numpy arrays
//! `(support, pdf, raw_freq)`.

use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::distances::{compute_batch, compute_single, DEFAULT_CUTOFF};
use crate::distributions::{
    nodedist_distribution as build_nodedist, to_distribution as build_distribution,
    tokenvsnode_distribution as build_tokenvsnode, Distribution, Observations,
    DEFAULT_NODEDIST_XMIN,
};
use crate::errors::DistanceError;

// Convert DistanceError to Python ValueError
impl From<DistanceError> for PyErr {
    fn from(err: DistanceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

type PyDistribution<'py> = (
    Bound<'py, PyArray1<i64>>,
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<u64>>,
);

fn into_numpy(py: Python<'_>, dist: Distribution) -> PyDistribution<'_> {
    (
        dist.support.into_pyarray(py),
        dist.pdf.into_pyarray(py),
        dist.raw_freq.into_pyarray(py),
    )
}

/// Python ints can be negative; the engine only takes usize.
fn check_cutoff(cutoff: i64) -> Result<usize, DistanceError> {
    usize::try_from(cutoff)
        .map_err(|_| DistanceError::InvalidInput(format!("cutoff must be >= 0, got {cutoff}")))
}

/// Shortest paths between the nodes of one sentence.
/// Returns (nodedist, tokendist, indices).
///
/// Raises ValueError if any edge references a node >= num_nodes or cutoff < 0
#[pyfunction]
#[pyo3(signature = (edges, num_nodes, cutoff=DEFAULT_CUTOFF as i64))]
fn node_token_distances_single(
    py: Python<'_>,
    edges: Vec<(u32, u32)>,
    num_nodes: usize,
    cutoff: i64,
) -> PyResult<(Vec<u32>, Vec<u32>, Vec<(u32, u32)>)> {
    let cutoff = check_cutoff(cutoff)?;
    // Detach Python thread state during graph computation
    let result = py.detach(|| compute_single(&edges, num_nodes, cutoff))?;
    Ok((result.node_distances, result.token_distances, result.pairs))
}

/// Shortest paths for every sentence, one list per sentence.
///
/// Raises ValueError if the two lists differ in length, a sentence has an
/// out-of-range edge, or cutoff < 0
#[pyfunction]
#[pyo3(signature = (all_edges, num_nodes, cutoff=DEFAULT_CUTOFF as i64))]
#[allow(clippy::type_complexity)]
fn node_token_distances(
    py: Python<'_>,
    all_edges: Vec<Vec<(u32, u32)>>,
    num_nodes: Vec<usize>,
    cutoff: i64,
) -> PyResult<(Vec<Vec<u32>>, Vec<Vec<u32>>, Vec<Vec<(u32, u32)>>)> {
    let cutoff = check_cutoff(cutoff)?;
    // Detach Python thread state during the parallel batch
    let batch = py.detach(|| compute_batch(&all_edges, &num_nodes, cutoff))?;
    Ok((batch.node_distances, batch.token_distances, batch.pairs))
}

/// Convert a {value: count} dict to (support, pdf, raw_freq)
#[pyfunction]
#[pyo3(signature = (counts, xmin=Some(DEFAULT_NODEDIST_XMIN), xmax=None))]
fn to_distribution<'py>(
    py: Python<'py>,
    counts: HashMap<i64, u64>,
    xmin: Option<i64>,
    xmax: Option<i64>,
) -> PyResult<PyDistribution<'py>> {
    let dist = build_distribution(&counts, xmin, xmax)?;
    Ok(into_numpy(py, dist))
}

/// Distribution of a flat list of node distances
#[pyfunction]
#[pyo3(signature = (nodedist, xmin=Some(DEFAULT_NODEDIST_XMIN), xmax=None))]
fn nodedist_distribution<'py>(
    py: Python<'py>,
    nodedist: Vec<u32>,
    xmin: Option<i64>,
    xmax: Option<i64>,
) -> PyResult<PyDistribution<'py>> {
    let dist = build_nodedist(Observations::Flat(&nodedist), xmin, xmax)?;
    Ok(into_numpy(py, dist))
}

/// Distribution of node distances given one list per sentence
#[pyfunction]
#[pyo3(signature = (nodedist, xmin=Some(DEFAULT_NODEDIST_XMIN), xmax=None))]
fn nodedist_distribution_nested<'py>(
    py: Python<'py>,
    nodedist: Vec<Vec<u32>>,
    xmin: Option<i64>,
    xmax: Option<i64>,
) -> PyResult<PyDistribution<'py>> {
    let dist = build_nodedist(Observations::Nested(&nodedist), xmin, xmax)?;
    Ok(into_numpy(py, dist))
}

/// Distribution of tokendist - nodedist over flat, aligned lists
#[pyfunction]
#[pyo3(signature = (tokendist, nodedist, xmin=None, xmax=None))]
fn tokenvsnode_distribution<'py>(
    py: Python<'py>,
    tokendist: Vec<u32>,
    nodedist: Vec<u32>,
    xmin: Option<i64>,
    xmax: Option<i64>,
) -> PyResult<PyDistribution<'py>> {
    let dist = build_tokenvsnode(
        Observations::Flat(&tokendist),
        Observations::Flat(&nodedist),
        xmin,
        xmax,
    )?;
    Ok(into_numpy(py, dist))
}

/// Distribution of tokendist - nodedist given one list per sentence.
///
/// Raises ValueError unless both arguments have the same per-sentence lengths
#[pyfunction]
#[pyo3(signature = (tokendist, nodedist, xmin=None, xmax=None))]
fn tokenvsnode_distribution_nested<'py>(
    py: Python<'py>,
    tokendist: Vec<Vec<u32>>,
    nodedist: Vec<Vec<u32>>,
    xmin: Option<i64>,
    xmax: Option<i64>,
) -> PyResult<PyDistribution<'py>> {
    let dist = build_tokenvsnode(
        Observations::Nested(&tokendist),
        Observations::Nested(&nodedist),
        xmin,
        xmax,
    )?;
    Ok(into_numpy(py, dist))
}

#[pymodule]
fn node_distance_fast(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Distance engine
    m.add_function(wrap_pyfunction!(node_token_distances_single, m)?)?;
    m.add_function(wrap_pyfunction!(node_token_distances, m)?)?;
    // Distribution builder
    m.add_function(wrap_pyfunction!(to_distribution, m)?)?;
    m.add_function(wrap_pyfunction!(nodedist_distribution, m)?)?;
    m.add_function(wrap_pyfunction!(nodedist_distribution_nested, m)?)?;
    m.add_function(wrap_pyfunction!(tokenvsnode_distribution, m)?)?;
    m.add_function(wrap_pyfunction!(tokenvsnode_distribution_nested, m)?)?;
    m.add("DEFAULT_CUTOFF", DEFAULT_CUTOFF)?;
    Ok(())
}
