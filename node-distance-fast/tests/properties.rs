//! Property tests for the distance engine and the distribution builder
//!
//! Random trees are checked against a brute-force Floyd-Warshall reference;
//! random count maps are checked for the distribution invariants (contiguous
//! support, exact counts, normalized pdf).

use node_distance_fast::{
    compute_batch, compute_single, nodedist_distribution, to_distribution, tokenvsnode_distribution,
    Observations,
};
use proptest::prelude::*;
use proptest::sample::Index;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

const EPSILON: f64 = 1e-9;

/// Random labelled tree: node k+1 hangs off an earlier node, then labels are shuffled.
fn random_tree() -> impl Strategy<Value = (usize, Vec<(u32, u32)>)> {
    (2usize..30).prop_flat_map(|n| {
        (
            proptest::collection::vec(any::<Index>(), n - 1),
            Just((0..n as u32).collect::<Vec<u32>>()).prop_shuffle(),
        )
            .prop_map(move |(parents, labels)| {
                let edges = parents
                    .iter()
                    .enumerate()
                    .map(|(k, ix)| {
                        let child = k + 1;
                        let parent = ix.index(child);
                        (labels[parent], labels[child])
                    })
                    .collect();
                (n, edges)
            })
    })
}

/// All-pairs hop counts, `None` when unreachable.
fn floyd_warshall(n: usize, edges: &[(u32, u32)]) -> Vec<Vec<Option<u32>>> {
    let mut dist = vec![vec![None; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = Some(0);
    }
    for &(a, b) in edges {
        let (a, b) = (a as usize, b as usize);
        if a != b {
            dist[a][b] = Some(1);
            dist[b][a] = Some(1);
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if let (Some(ik), Some(kj)) = (dist[i][k], dist[k][j]) {
                    if dist[i][j].map_or(true, |ij| ik + kj < ij) {
                        dist[i][j] = Some(ik + kj);
                    }
                }
            }
        }
    }
    dist
}

fn bounds() -> impl Strategy<Value = (Option<i64>, Option<i64>)> {
    (
        proptest::option::of(-20i64..20),
        proptest::option::of(-20i64..20),
    )
        .prop_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a > b => (Some(b), Some(a)),
            other => other,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tree_yields_every_pair_once((n, edges) in random_tree()) {
        let reference = floyd_warshall(n, &edges);
        let diameter = reference.iter().flatten().flatten().copied().max().unwrap_or(0);

        let result = compute_single(&edges, n, diameter as usize).unwrap();

        prop_assert_eq!(result.len(), n * (n - 1) / 2);
        prop_assert_eq!(result.node_distances.len(), result.token_distances.len());
        prop_assert_eq!(result.node_distances.len(), result.pairs.len());

        let unique: BTreeSet<_> = result.pairs.iter().copied().collect();
        prop_assert_eq!(unique.len(), result.len());

        for (node, token, (i, j)) in result.iter() {
            prop_assert!(i > j);
            prop_assert_eq!(token, i - j);
            prop_assert!(node >= 1 && node <= diameter);
            prop_assert_eq!(Some(node), reference[i as usize][j as usize]);
        }
    }

    #[test]
    fn cutoff_drops_exactly_the_long_pairs((n, edges) in random_tree(), cutoff in 0usize..8) {
        let reference = floyd_warshall(n, &edges);
        let result = compute_single(&edges, n, cutoff).unwrap();

        let expected: BTreeSet<(u32, u32)> = (0..n)
            .flat_map(|i| (0..i).map(move |j| (i, j)))
            .filter(|&(i, j)| reference[i][j].is_some_and(|d| d as usize <= cutoff))
            .map(|(i, j)| (i as u32, j as u32))
            .collect();
        let got: BTreeSet<(u32, u32)> = result.pairs.iter().copied().collect();

        prop_assert_eq!(got, expected);
    }

    #[test]
    fn batch_matches_single_in_order(trees in proptest::collection::vec(random_tree(), 0..12)) {
        let all_edges: Vec<_> = trees.iter().map(|(_, e)| e.clone()).collect();
        let num_nodes: Vec<usize> = trees.iter().map(|(n, _)| *n).collect();
        let batch = compute_batch(&all_edges, &num_nodes, 25).unwrap();

        prop_assert_eq!(batch.len(), trees.len());
        for (k, (n, edges)) in trees.iter().enumerate() {
            let single = compute_single(edges, *n, 25).unwrap();
            prop_assert_eq!(&batch.node_distances[k], &single.node_distances);
            prop_assert_eq!(&batch.pairs[k], &single.pairs);
        }
    }

    #[test]
    fn distribution_invariants(
        entries in proptest::collection::vec((-40i64..40, 1u64..20), 1..30),
        (xmin, xmax) in bounds(),
    ) {
        let counts: FxHashMap<i64, u64> = entries.into_iter().collect();
        let total: u64 = counts.values().sum();

        let dist = to_distribution(&counts, xmin, xmax).unwrap();

        prop_assert_eq!(dist.support.len(), dist.pdf.len());
        prop_assert_eq!(dist.support.len(), dist.raw_freq.len());
        prop_assert!(dist.support.windows(2).all(|w| w[1] == w[0] + 1));
        prop_assert_eq!(dist.total(), total);
        prop_assert!((dist.pdf.iter().sum::<f64>() - 1.0).abs() < EPSILON);

        if let Some(lo) = xmin {
            prop_assert_eq!(dist.support.first().copied(), Some(lo));
        }
        if let Some(hi) = xmax {
            prop_assert_eq!(dist.support.last().copied(), Some(hi));
        }
    }

    #[test]
    fn nested_and_flat_nodedist_agree(
        groups in proptest::collection::vec(proptest::collection::vec(1u32..15, 0..6), 1..8),
        xmax in proptest::option::of(2i64..10),
    ) {
        prop_assume!(groups.iter().any(|g| !g.is_empty()));
        let flat: Vec<u32> = groups.iter().flatten().copied().collect();

        let nested = nodedist_distribution(Observations::Nested(&groups), Some(1), xmax).unwrap();
        let flat = nodedist_distribution(Observations::Flat(&flat), Some(1), xmax).unwrap();

        prop_assert_eq!(nested, flat);
    }

    #[test]
    fn tokenvsnode_counts_every_pair((n, edges) in random_tree()) {
        let batch = compute_batch(&[edges], &[n], 25).unwrap();
        let dist = tokenvsnode_distribution(
            batch.token_observations(),
            batch.node_observations(),
            None,
            None,
        )
        .unwrap();

        prop_assert_eq!(dist.total() as usize, n * (n - 1) / 2);
    }
}
