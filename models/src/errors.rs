// models/src/errors.rs

use std::io;
pub use thiserror::Error;

use crate::identifiers::{NodeId, Timepoint};
use crate::edges::TransitionType;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node not in graph: {0}")]
    NodeNotFound(NodeId),
    #[error("node {0} already exists")]
    DuplicateNode(NodeId),
    #[error("timepoint {0} is not part of the graph timeline")]
    UnknownTimepoint(Timepoint),
    #[error("no intersecting elements between {0} and {1}")]
    EmptyIntersection(NodeId, NodeId),
    #[error("edge type {0} cannot be added as a directed edge")]
    InvalidEdgeType(TransitionType),
    #[error("edge {0} --> {1} already exists")]
    DuplicateEdge(NodeId, NodeId),
    #[error("timepoints of {0} and {1} are not adjacent")]
    NonAdjacentTimepoints(NodeId, NodeId),
    #[error("no edge between {0} and {1}")]
    EdgeNotFound(NodeId, NodeId),
    #[error("a node cannot reappear as itself: {0}")]
    SelfReappear(NodeId),

    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::SerializationError(format!("JSON processing error: {}", err))
    }
}

impl From<toml::de::Error> for GraphError {
    fn from(err: toml::de::Error) -> Self {
        GraphError::ConfigError(format!("TOML parse error: {}", err))
    }
}

/// A validation error raised at the input boundary, before anything reaches
/// the transition graph.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A timepoint label is empty.
    #[error("timepoint label must not be empty")]
    EmptyTimepoint,
    /// A timepoint label contains the node ID delimiter.
    #[error("timepoint '{0}' contains the node ID delimiter '_'")]
    TimepointContainsDelimiter(String),
    /// A node ID string could not be parsed.
    #[error("node ID '{0}' is invalid")]
    InvalidNodeId(String),
    /// The same timepoint label was supplied twice.
    #[error("timepoint '{0}' appears more than once")]
    DuplicateTimepoint(String),
    /// Number of labels and number of partitions differ.
    #[error("expected {0} partitions, found {1}")]
    PartitionCountMismatch(usize, usize),
    /// A transition type name that is not part of the vocabulary.
    #[error("unknown transition type '{0}'")]
    UnknownTransitionType(String),
    /// A fuzzy strength label that is not weak, medium or strong.
    #[error("unknown fuzzy strength '{0}'")]
    UnknownStrength(String),
    /// A cluster has no elements.
    #[error("cluster {1} at timepoint '{0}' is empty")]
    EmptyCluster(String, usize),
    /// An element belongs to two clusters of the same partition.
    #[error("element '{element}' appears in clusters {first} and {second} at timepoint '{timepoint}'")]
    OverlappingClusters {
        timepoint: String,
        element: String,
        first: usize,
        second: usize,
    },
    /// A matching threshold outside (0, 1].
    #[error("threshold {name} must be in (0, 1], found {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    /// Fuzzy limiters must be four finite, non-negative, ascending values
    /// spanning a non-empty range.
    #[error("fuzzy limiter must be non-negative values a <= b <= c <= d with a < d, found {0:?}")]
    InvalidLimiter([f64; 4]),
}

/// A result that might be a `ValidationError`.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A result that might be a `GraphError`.
pub type GraphResult<T> = Result<T, GraphError>;
