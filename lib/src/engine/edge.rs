use std::collections::BTreeMap;

use models::{Cluster, NodeId, TransitionType};

/// A directed, typed edge connecting two cluster instances.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub transition_type: TransitionType,
    /// Signed change in element count. Reappear edges come in pairs whose
    /// values are additive inverses of each other.
    pub element_change: i64,
    fuzzy_types: BTreeMap<TransitionType, f64>,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, transition_type: TransitionType, element_change: i64) -> Self {
        Edge {
            from,
            to,
            transition_type,
            element_change,
            fuzzy_types: BTreeMap::new(),
        }
    }

    /// Graded kinds recorded on this edge with their core values.
    pub fn fuzzy_types(&self) -> &BTreeMap<TransitionType, f64> {
        &self.fuzzy_types
    }

    pub fn fuzzy_core(&self, kind: TransitionType) -> Option<f64> {
        self.fuzzy_types.get(&kind).copied()
    }

    /// Records (or overwrites) the core value of one graded kind.
    pub(crate) fn add_fuzzy_type(&mut self, kind: TransitionType, x: f64) {
        debug_assert!(kind.is_fuzzy_kind(), "{} has no fuzzy core", kind);
        self.fuzzy_types.insert(kind, x);
    }
}

/// Elements shared by two clusters at adjacent timepoints.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionRecord {
    pub nodes: (NodeId, NodeId),
    pub elements: Cluster,
}

impl IntersectionRecord {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
