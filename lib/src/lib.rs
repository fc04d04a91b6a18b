// lib/src/lib.rs
//! Tracks how clusters evolve across a sequence of timepoints.
//!
//! Given one partition per timepoint, [`GraphEvolution`] links every cluster
//! to its successors: crisply, with one label per transition, or fuzzily,
//! with graded memberships in weak, medium and strong sets.

pub mod config;
pub mod engine;
pub mod graph_evolution;
pub mod matching;

pub use models::{
    Cluster, Element, FuzzyStrength, GraphError, GraphResult, NodeId, Partition, Timepoint, TransitionTuple,
    TransitionType, ValidationError, ValidationResult,
};

pub use crate::config::{TransitionConfig, TransitionMode};
pub use crate::engine::export::{crisp_transition_tuples, fuzzy_transition_tuples, to_petgraph, transition_tuples_json};
pub use crate::engine::{ClusterNode, Edge, TransitionGraph};
pub use crate::graph_evolution::{GraphEvolution, TimeWindow, Timeline};
pub use crate::matching::{compute_fuzzy_sets, CrispMatcher, FuzzyLimiter, MatchThresholds};
