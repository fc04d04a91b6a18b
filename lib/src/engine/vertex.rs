// lib/src/engine/vertex.rs
use std::collections::BTreeMap;
use std::fmt;

use models::{Cluster, NodeId, Timepoint};

/// Position of an edge in the graph's edge arena.
pub type EdgeIndex = usize;

/// Position of an intersection record in the graph's intersection arena.
pub type IntersectionIndex = usize;

/// A cluster instance: one cluster of the partition at one timepoint.
///
/// Adjacency is kept per node and per edge category. Every map is keyed by
/// the neighbor's ID and points into an arena owned by the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterNode {
    id: NodeId,
    elements: Cluster,
    disappear_strength: Option<f64>,
    pub(crate) incoming: BTreeMap<NodeId, EdgeIndex>,
    pub(crate) outgoing: BTreeMap<NodeId, EdgeIndex>,
    pub(crate) reappear: BTreeMap<NodeId, EdgeIndex>,
    pub(crate) intersections: BTreeMap<NodeId, IntersectionIndex>,
}

impl ClusterNode {
    pub(crate) fn new(id: NodeId, elements: Cluster) -> Self {
        ClusterNode {
            id,
            elements,
            disappear_strength: None,
            incoming: BTreeMap::new(),
            outgoing: BTreeMap::new(),
            reappear: BTreeMap::new(),
            intersections: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn timepoint(&self) -> Timepoint {
        self.id.timepoint
    }

    pub fn index(&self) -> usize {
        self.id.index
    }

    pub fn elements(&self) -> &Cluster {
        &self.elements
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn has_incoming_neighbors(&self) -> bool {
        !self.incoming.is_empty()
    }

    pub fn has_outgoing_neighbors(&self) -> bool {
        !self.outgoing.is_empty()
    }

    pub fn has_reappear_neighbors(&self) -> bool {
        !self.reappear.is_empty()
    }

    /// Whether the node takes part in any transition.
    pub fn has_neighbors(&self, include_reappear: bool) -> bool {
        self.has_incoming_neighbors()
            || self.has_outgoing_neighbors()
            || (include_reappear && self.has_reappear_neighbors())
    }

    pub fn incoming_neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming.keys().copied()
    }

    pub fn outgoing_neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing.keys().copied()
    }

    pub fn reappear_neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.reappear.keys().copied()
    }

    /// Neighbors with the index of the connecting edge: incoming first, then
    /// outgoing, then (when asked) reappear.
    pub fn neighbors_and_edges(
        &self,
        include_reappear: bool,
    ) -> impl Iterator<Item = (NodeId, EdgeIndex)> + '_ {
        let reappear = include_reappear.then_some(&self.reappear);
        self.incoming
            .iter()
            .chain(self.outgoing.iter())
            .chain(reappear.into_iter().flatten())
            .map(|(id, edge)| (*id, *edge))
    }

    /// Index of the edge shared with `neighbor`, looked up in the incoming,
    /// outgoing and (when asked) reappear maps, in that order.
    pub fn edge_to(&self, neighbor: &NodeId, include_reappear: bool) -> Option<EdgeIndex> {
        self.incoming
            .get(neighbor)
            .or_else(|| self.outgoing.get(neighbor))
            .or_else(|| include_reappear.then(|| self.reappear.get(neighbor)).flatten())
            .copied()
    }

    pub fn num_intersecting_neighbors(&self) -> usize {
        self.intersections.len()
    }

    pub fn intersecting_neighbors(&self) -> impl Iterator<Item = (NodeId, IntersectionIndex)> + '_ {
        self.intersections.iter().map(|(id, record)| (*id, *record))
    }

    pub fn disappear_strength(&self) -> Option<f64> {
        self.disappear_strength
    }

    pub(crate) fn set_disappear_strength(&mut self, x: f64) {
        self.disappear_strength = Some(x);
    }
}

impl fmt::Display for ClusterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cluster {} at timepoint {}, number of elements in cluster: {}",
            self.index(),
            self.timepoint(),
            self.size()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::vertices::partition_from_lists;

    fn node(id: &str, elements: &[&str]) -> ClusterNode {
        let cluster = partition_from_lists(vec![elements.to_vec()]).remove(0);
        ClusterNode::new(id.parse().unwrap(), cluster)
    }

    #[test]
    fn test_new_node_has_no_neighbors() {
        let n = node("0819_00", &["a", "b", "a"]);
        assert_eq!(n.size(), 2);
        assert!(!n.has_neighbors(true));
        assert_eq!(n.disappear_strength(), None);
        assert_eq!(n.to_string(), "cluster 0 at timepoint 0819, number of elements in cluster: 2");
    }

    #[test]
    fn test_edge_lookup_respects_reappear_flag() {
        let mut n = node("0819_00", &["a"]);
        let other: NodeId = "0823_01".parse().unwrap();
        n.reappear.insert(other, 7);

        assert_eq!(n.edge_to(&other, false), None);
        assert_eq!(n.edge_to(&other, true), Some(7));
        assert!(!n.has_neighbors(false));
        assert!(n.has_neighbors(true));
        assert_eq!(n.neighbors_and_edges(false).count(), 0);
        assert_eq!(n.neighbors_and_edges(true).collect::<Vec<_>>(), vec![(other, 7)]);
    }
}
