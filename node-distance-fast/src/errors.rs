//! Error types for the distance engine and the distribution builder
//!
//! Every failure here is a caller contract violation (malformed adapter output,
//! empty observations, inconsistent bounds), never a transient condition.

use thiserror::Error;

/// Errors raised at the boundary of the distance engine / distribution builder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceError {
    /// An edge references a node index >= num_nodes
    #[error("Node index {0} out of bounds (num_nodes={1})")]
    NodeOutOfBounds(u32, usize),

    /// Empty observations, mismatched lengths, invalid bounds or parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single sentence of a batch failed
    #[error("Sentence {index}: {source}")]
    InSentence {
        index: usize,
        #[source]
        source: Box<DistanceError>,
    },
}

impl DistanceError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        DistanceError::InvalidInput(msg.into())
    }

    /// Strip any `InSentence` wrapping and return the underlying error.
    pub fn root_cause(&self) -> &DistanceError {
        match self {
            DistanceError::InSentence { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type DistanceResult<T> = Result<T, DistanceError>;
