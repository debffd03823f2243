// Node distances over dependency trees
//
// A dependency parse gives one tree per sentence: node 0 is the synthetic ROOT,
// nodes 1..n are the tokens in sentence order. For every pair of tokens we want
// two numbers:
//   - node distance:  hops between them in the tree (undirected)
//   - token distance: how far apart they are in the sentence (i - j)
//
// Comparing the two tells you whether words that sit close in the surface
// string are also close syntactically.
//
// PARALLELIZATION:
// Sentences are independent, so `compute_batch` fans them out over rayon and
// collects in input order. A single sentence is small (tens of nodes), so the
// per-source BFS inside `compute_single` stays sequential.
//
// ERROR HANDLING:
// Edges pointing at nodes >= num_nodes are rejected up front (malformed adapter
// output), nothing is computed for that sentence.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

use crate::distributions::Observations;
use crate::errors::{DistanceError, DistanceResult};

/// Maximum path length explored when the caller does not pick one.
pub const DEFAULT_CUTOFF: usize = 25;

const UNVISITED: u32 = u32::MAX;

/// Node ids are u32, so a sentence holds at most 2^32 nodes.
const MAX_NODES: u64 = 1 << 32;

/// One parsed sentence as produced by an edge adapter.
///
/// `edges` are (parent, child) pairs with 0 as the root; `num_nodes` counts
/// the root, so a sentence with `k` tokens has `num_nodes = k + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub edges: Vec<(u32, u32)>,
    pub num_nodes: usize,
}

/// Pairwise distances of one sentence.
///
/// The three vectors are index-aligned: entry `k` of each describes the same
/// node pair `(i, j)` with `i > j`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PairwiseDistances {
    pub node_distances: Vec<u32>,
    pub token_distances: Vec<u32>,
    pub pairs: Vec<(u32, u32)>,
}

impl PairwiseDistances {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate `(node_distance, token_distance, (i, j))` records.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, (u32, u32))> + '_ {
        self.node_distances
            .iter()
            .zip(&self.token_distances)
            .zip(&self.pairs)
            .map(|((&node, &token), &pair)| (node, token, pair))
    }

    fn push(&mut self, i: u32, j: u32, node_distance: u32) {
        self.node_distances.push(node_distance);
        self.token_distances.push(i - j);
        self.pairs.push((i, j));
    }
}

/// Pairwise distances of a batch of sentences, one inner vector per sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchDistances {
    pub node_distances: Vec<Vec<u32>>,
    pub token_distances: Vec<Vec<u32>>,
    pub pairs: Vec<Vec<(u32, u32)>>,
}

impl BatchDistances {
    /// Number of sentences
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pair records across all sentences
    pub fn total_pairs(&self) -> usize {
        self.pairs.iter().map(Vec::len).sum()
    }

    pub fn node_observations(&self) -> Observations<'_> {
        Observations::Nested(&self.node_distances)
    }

    pub fn token_observations(&self) -> Observations<'_> {
        Observations::Nested(&self.token_distances)
    }

    fn from_sentences(sentences: Vec<PairwiseDistances>) -> Self {
        let mut batch = BatchDistances {
            node_distances: Vec::with_capacity(sentences.len()),
            token_distances: Vec::with_capacity(sentences.len()),
            pairs: Vec::with_capacity(sentences.len()),
        };
        for sentence in sentences {
            batch.node_distances.push(sentence.node_distances);
            batch.token_distances.push(sentence.token_distances);
            batch.pairs.push(sentence.pairs);
        }
        batch
    }
}

// ============================================================================
// VALIDATION HELPERS
// ============================================================================

/// Validate the node count and that all edges reference valid node indices.
fn validate_edges(edges: &[(u32, u32)], num_nodes: usize) -> DistanceResult<()> {
    if num_nodes as u64 > MAX_NODES {
        return Err(DistanceError::invalid(format!(
            "num_nodes {num_nodes} exceeds {MAX_NODES} (node ids are u32)"
        )));
    }
    for &(parent, child) in edges {
        if parent as usize >= num_nodes {
            return Err(DistanceError::NodeOutOfBounds(parent, num_nodes));
        }
        if child as usize >= num_nodes {
            return Err(DistanceError::NodeOutOfBounds(child, num_nodes));
        }
    }
    Ok(())
}

/// Undirected adjacency list. Neighbours keep edge insertion order, which
/// fixes the BFS discovery order and therefore the output order.
fn build_adjacency(edges: &[(u32, u32)], num_nodes: usize) -> DistanceResult<Vec<Vec<u32>>> {
    let mut adj: Vec<Vec<u32>> = Vec::new();
    adj.try_reserve_exact(num_nodes)
        .map_err(|_| alloc_failed(num_nodes))?;
    adj.resize_with(num_nodes, Vec::new);
    for &(parent, child) in edges {
        if parent != child {
            adj[parent as usize].push(child);
            adj[child as usize].push(parent);
        }
    }
    Ok(adj)
}

fn alloc_failed(num_nodes: usize) -> DistanceError {
    DistanceError::invalid(format!("cannot allocate buffers for {num_nodes} nodes"))
}

// ============================================================================
// SINGLE SENTENCE
// ============================================================================
//
// Bounded all-pairs shortest paths on an unweighted graph is just a BFS from
// every node that stops expanding once it reaches `cutoff` hops:
//
//   for source in 0..n:
//       BFS(source), never expand a node at depth == cutoff
//       every node w discovered at depth d with source > w -> emit (source, w, d)
//
// Emitting only when source > w drops self pairs (depth 0) and keeps one
// record per unordered pair. Nodes further than `cutoff` (or in another
// component) are never discovered, so they are simply absent from the output.
//
// Time complexity: O(V * (V + E)) worst case, less when cutoff is small.
// ============================================================================

/// Compute node and token distances for every node pair of one sentence.
///
/// # Arguments
/// * `edges` - (parent, child) pairs, treated as undirected
/// * `num_nodes` - Total number of nodes including the root
/// * `cutoff` - Longest path length to report
///
/// # Returns
/// Index-aligned node distances, token distances and `(i, j)` pairs, `i > j`,
/// ordered by source `i` and then by BFS discovery order.
///
/// # Errors
/// - `NodeOutOfBounds` if any edge references a node >= num_nodes
/// - `InvalidInput` if `num_nodes` exceeds 2^32 or its buffers cannot be
///   allocated
pub fn compute_single(
    edges: &[(u32, u32)],
    num_nodes: usize,
    cutoff: usize,
) -> DistanceResult<PairwiseDistances> {
    validate_edges(edges, num_nodes)?;

    let mut result = PairwiseDistances::default();

    // One node (or none) has no pairs; cutoff 0 only reaches the source itself
    if num_nodes < 2 || cutoff == 0 {
        return Ok(result);
    }

    let adj = build_adjacency(edges, num_nodes)?;

    // Buffers are reused across sources; `touched` lets us reset only what
    // the previous BFS visited.
    let mut distance: Vec<u32> = Vec::new();
    distance
        .try_reserve_exact(num_nodes)
        .map_err(|_| alloc_failed(num_nodes))?;
    distance.resize(num_nodes, UNVISITED);
    let mut touched: Vec<usize> = Vec::with_capacity(num_nodes);
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(num_nodes);

    for source in 0..num_nodes {
        distance[source] = 0;
        touched.push(source);
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            let depth = distance[v];
            if depth as usize >= cutoff {
                continue;
            }

            for &w in &adj[v] {
                let w = w as usize;
                if distance[w] == UNVISITED {
                    distance[w] = depth + 1;
                    touched.push(w);
                    queue.push_back(w);

                    if source > w {
                        result.push(source as u32, w as u32, depth + 1);
                    }
                }
            }
        }

        for &v in &touched {
            distance[v] = UNVISITED;
        }
        touched.clear();
    }

    Ok(result)
}

// ============================================================================
// BATCH
// ============================================================================

/// Compute pairwise distances for many sentences (PARALLELIZED).
///
/// `all_edges[k]` and `num_nodes[k]` describe sentence `k`. Output vectors are
/// in the same sentence order regardless of scheduling.
///
/// # Errors
/// - `InvalidInput` if `all_edges` and `num_nodes` differ in length
/// - `InSentence` wrapping the error of the lowest-index failing sentence
pub fn compute_batch(
    all_edges: &[Vec<(u32, u32)>],
    num_nodes: &[usize],
    cutoff: usize,
) -> DistanceResult<BatchDistances> {
    if all_edges.len() != num_nodes.len() {
        return Err(DistanceError::invalid(format!(
            "got edges for {} sentences but node counts for {}",
            all_edges.len(),
            num_nodes.len()
        )));
    }

    let results: Vec<DistanceResult<PairwiseDistances>> = all_edges
        .par_iter()
        .zip(num_nodes.par_iter())
        .enumerate()
        .map(|(index, (edges, &n))| compute_in_sentence(index, edges, n, cutoff))
        .collect();

    finish_batch(results, cutoff)
}

/// Same as [`compute_batch`] for sentences already bundled as [`Sentence`].
pub fn compute_sentences(sentences: &[Sentence], cutoff: usize) -> DistanceResult<BatchDistances> {
    let results: Vec<DistanceResult<PairwiseDistances>> = sentences
        .par_iter()
        .enumerate()
        .map(|(index, s)| compute_in_sentence(index, &s.edges, s.num_nodes, cutoff))
        .collect();

    finish_batch(results, cutoff)
}

fn compute_in_sentence(
    index: usize,
    edges: &[(u32, u32)],
    num_nodes: usize,
    cutoff: usize,
) -> DistanceResult<PairwiseDistances> {
    compute_single(edges, num_nodes, cutoff).map_err(|e| DistanceError::InSentence {
        index,
        source: Box::new(e),
    })
}

fn finish_batch(
    results: Vec<DistanceResult<PairwiseDistances>>,
    cutoff: usize,
) -> DistanceResult<BatchDistances> {
    // Sequential collect so the reported failure is the first one by index
    let sentences = results.into_iter().collect::<DistanceResult<Vec<_>>>()?;
    let batch = BatchDistances::from_sentences(sentences);

    debug!(
        sentences = batch.len(),
        pairs = batch.total_pairs(),
        cutoff,
        "computed node distances"
    );

    Ok(batch)
}

// ============================================================================
// UNIT TESTS
// ============================================================================
