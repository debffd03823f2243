//! Node distances over dependency trees, and clipped distributions of them.
//!
//! ```
//! use node_distance_fast::{compute_batch, nodedist_distribution, DEFAULT_CUTOFF};
//!
//! // "the dog barked": ROOT -> barked, barked -> dog, dog -> the
//! let all_edges: Vec<Vec<(u32, u32)>> = vec![vec![(0, 3), (3, 2), (2, 1)]];
//! let batch = compute_batch(&all_edges, &[4], DEFAULT_CUTOFF).unwrap();
//! let dist = nodedist_distribution(batch.node_observations(), Some(1), None).unwrap();
//!
//! assert_eq!(dist.support, vec![1, 2, 3]);
//! assert_eq!(dist.raw_freq, vec![3, 2, 1]);
//! ```

pub mod distances;
pub mod distributions;
mod errors;
#[cfg(feature = "python")]
mod py_bindings;

pub use distances::{
    compute_batch, compute_sentences, compute_single, BatchDistances, PairwiseDistances,
    Sentence, DEFAULT_CUTOFF,
};
pub use distributions::{
    nodedist_distribution, to_distribution, tokenvsnode_distribution, Distribution,
    Observations, DEFAULT_NODEDIST_XMIN,
};
pub use errors::{DistanceError, DistanceResult};
