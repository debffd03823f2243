//! Benchmarks for the distance engine and the distribution builder
//!
//! Trees are random dependency-like trees: each word attaches to an earlier
//! word, biased towards its left neighbour, with word 1..n hanging below ROOT.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use node_distance_fast::{
    compute_batch, compute_single, nodedist_distribution, tokenvsnode_distribution,
    DEFAULT_CUTOFF,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_tree(rng: &mut ChaCha8Rng, words: usize) -> (Vec<(u32, u32)>, usize) {
    let mut edges = Vec::with_capacity(words);
    edges.push((0, 1));
    for child in 2..=words as u32 {
        let parent = if rng.gen_bool(0.6) {
            child - 1
        } else {
            rng.gen_range(1..child)
        };
        edges.push((parent, child));
    }
    (edges, words + 1)
}

fn random_corpus(sentences: usize, seed: u64) -> (Vec<Vec<(u32, u32)>>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..sentences)
        .map(|_| {
            let words = rng.gen_range(5..40);
            random_tree(&mut rng, words)
        })
        .unzip()
}

// ============================================================================
// DISTANCE ENGINE
// ============================================================================

fn bench_compute_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_single");

    for words in [10usize, 40, 120] {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (edges, num_nodes) = random_tree(&mut rng, words);

        group.bench_with_input(BenchmarkId::new("cutoff_default", words), &edges, |b, edges| {
            b.iter(|| black_box(compute_single(edges, num_nodes, DEFAULT_CUTOFF)))
        });
        group.bench_with_input(BenchmarkId::new("cutoff_3", words), &edges, |b, edges| {
            b.iter(|| black_box(compute_single(edges, num_nodes, 3)))
        });
    }

    group.finish();
}

fn bench_compute_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_batch");

    for sentences in [100usize, 1_000, 10_000] {
        let (all_edges, num_nodes) = random_corpus(sentences, 7);
        group.throughput(Throughput::Elements(sentences as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(sentences),
            &all_edges,
            |b, all_edges| b.iter(|| black_box(compute_batch(all_edges, &num_nodes, DEFAULT_CUTOFF))),
        );
    }

    group.finish();
}

// ============================================================================
// DISTRIBUTIONS
// ============================================================================

fn bench_distributions(c: &mut Criterion) {
    let mut group = c.benchmark_group("distributions");

    let (all_edges, num_nodes) = random_corpus(5_000, 11);
    let batch = match compute_batch(&all_edges, &num_nodes, DEFAULT_CUTOFF) {
        Ok(batch) => batch,
        Err(e) => panic!("benchmark corpus is malformed: {e}"),
    };

    group.bench_function("nodedist_nested", |b| {
        b.iter(|| black_box(nodedist_distribution(batch.node_observations(), Some(1), Some(10))))
    });
    group.bench_function("tokenvsnode_nested", |b| {
        b.iter(|| {
            black_box(tokenvsnode_distribution(
                batch.token_observations(),
                batch.node_observations(),
                Some(-10),
                Some(20),
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_single,
    bench_compute_batch,
    bench_distributions,
);

criterion_main!(benches);
