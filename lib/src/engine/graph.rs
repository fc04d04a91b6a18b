// lib/src/engine/graph.rs

use std::collections::{BTreeMap, HashMap, HashSet};

use log::trace;
use models::{Cluster, GraphError, GraphResult, NodeId, Timepoint, TransitionType, ValidationError};

use crate::engine::edge::{Edge, IntersectionRecord};
use crate::engine::vertex::{ClusterNode, EdgeIndex, IntersectionIndex};

/// Clusters through time and the element-overlap relationships between them.
///
/// Nodes, edges and intersection records live in dense arenas owned by the
/// graph; nodes refer to their edges by arena index. The declared timeline
/// fixes which timepoints are adjacent.
#[derive(Clone, Debug, Default)]
pub struct TransitionGraph {
    timeline: Vec<Timepoint>,
    positions: HashMap<Timepoint, usize>,

    nodes: Vec<ClusterNode>,
    node_index: HashMap<NodeId, usize>,
    // aligned with `timeline`, insertion order
    nodes_by_timepoint: Vec<Vec<usize>>,

    edges: Vec<Edge>,
    intersections: Vec<IntersectionRecord>,
    intersection_index: HashMap<(NodeId, NodeId), IntersectionIndex>,
}

impl TransitionGraph {
    /// Creates an empty graph over the given ordered timeline.
    ///
    /// # Errors
    /// `ValidationError::DuplicateTimepoint` if a label repeats.
    pub fn new(timeline: impl IntoIterator<Item = Timepoint>) -> GraphResult<Self> {
        let mut graph = TransitionGraph::default();
        for timepoint in timeline {
            if graph.positions.contains_key(&timepoint) {
                return Err(ValidationError::DuplicateTimepoint(timepoint.to_string()).into());
            }
            graph.positions.insert(timepoint, graph.timeline.len());
            graph.timeline.push(timepoint);
            graph.nodes_by_timepoint.push(Vec::new());
        }
        Ok(graph)
    }

    /// An empty graph sharing this graph's timeline.
    pub(crate) fn empty_like(&self) -> Self {
        TransitionGraph {
            timeline: self.timeline.clone(),
            positions: self.positions.clone(),
            nodes_by_timepoint: vec![Vec::new(); self.timeline.len()],
            ..TransitionGraph::default()
        }
    }

    // ---- timeline ----

    pub fn timeline(&self) -> &[Timepoint] {
        &self.timeline
    }

    pub fn position(&self, timepoint: &Timepoint) -> Option<usize> {
        self.positions.get(timepoint).copied()
    }

    pub fn next_timepoint(&self, timepoint: &Timepoint) -> Option<Timepoint> {
        let position = self.position(timepoint)?;
        self.timeline.get(position + 1).copied()
    }

    pub fn previous_timepoint(&self, timepoint: &Timepoint) -> Option<Timepoint> {
        let position = self.position(timepoint)?;
        position.checked_sub(1).map(|p| self.timeline[p])
    }

    fn require_position(&self, timepoint: &Timepoint) -> GraphResult<usize> {
        self.position(timepoint)
            .ok_or(GraphError::UnknownTimepoint(*timepoint))
    }

    // ---- nodes ----

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_nodes_at(&self, timepoint: &Timepoint) -> GraphResult<usize> {
        let position = self.require_position(timepoint)?;
        Ok(self.nodes_by_timepoint[position].len())
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ClusterNode> + '_ {
        self.nodes.iter()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(ClusterNode::id).collect()
    }

    /// The set of node IDs, which is what two graphs are compared by.
    pub fn node_id_set(&self) -> HashSet<NodeId> {
        self.node_index.keys().copied().collect()
    }

    pub fn node(&self, id: &NodeId) -> GraphResult<&ClusterNode> {
        self.node_index
            .get(id)
            .map(|&slot| &self.nodes[slot])
            .ok_or(GraphError::NodeNotFound(*id))
    }

    pub fn node_at(&self, timepoint: Timepoint, index: usize) -> GraphResult<&ClusterNode> {
        self.node(&NodeId::new(timepoint, index))
    }

    fn node_mut(&mut self, id: &NodeId) -> GraphResult<&mut ClusterNode> {
        match self.node_index.get(id) {
            Some(&slot) => Ok(&mut self.nodes[slot]),
            None => Err(GraphError::NodeNotFound(*id)),
        }
    }

    /// Nodes at `timepoint` in insertion order.
    pub fn nodes_at(&self, timepoint: &Timepoint) -> GraphResult<impl Iterator<Item = &ClusterNode> + '_> {
        let position = self.require_position(timepoint)?;
        Ok(self.nodes_by_timepoint[position].iter().map(move |&slot| &self.nodes[slot]))
    }

    /// Nodes at `timepoint` ordered by ID, i.e. by cluster index.
    pub fn sorted_nodes_at(&self, timepoint: &Timepoint) -> GraphResult<Vec<&ClusterNode>> {
        let mut nodes: Vec<&ClusterNode> = self.nodes_at(timepoint)?.collect();
        nodes.sort_by_key(|node| node.id());
        Ok(nodes)
    }

    /// Creates and indexes the node for cluster `index` at `timepoint`.
    ///
    /// # Errors
    /// `UnknownTimepoint`, `DuplicateNode`, or `ValidationError::EmptyCluster`.
    pub fn add_node(&mut self, elements: Cluster, timepoint: Timepoint, index: usize) -> GraphResult<NodeId> {
        let position = self.require_position(&timepoint)?;
        let id = NodeId::new(timepoint, index);
        if self.has_node(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        if elements.is_empty() {
            return Err(ValidationError::EmptyCluster(timepoint.to_string(), index).into());
        }

        let slot = self.nodes.len();
        self.nodes.push(ClusterNode::new(id, elements));
        self.node_index.insert(id, slot);
        self.nodes_by_timepoint[position].push(slot);
        Ok(id)
    }

    pub(crate) fn set_disappear_strength(&mut self, id: &NodeId, x: f64) -> GraphResult<()> {
        self.node_mut(id)?.set_disappear_strength(x);
        Ok(())
    }

    // ---- intersections ----

    /// Records the elements shared by two nodes on both of them.
    ///
    /// # Errors
    /// `EmptyIntersection` when `intersection` is empty, `NodeNotFound` when
    /// either node is absent.
    pub fn add_intersecting_edge(&mut self, id1: NodeId, id2: NodeId, intersection: Cluster) -> GraphResult<()> {
        if intersection.is_empty() {
            return Err(GraphError::EmptyIntersection(id1, id2));
        }
        self.node(&id1)?;
        self.node(&id2)?;

        let record = self.intersections.len();
        self.intersections.push(IntersectionRecord {
            nodes: (id1, id2),
            elements: intersection,
        });
        self.intersection_index.insert((id1, id2), record);
        self.node_mut(&id1)?.intersections.insert(id2, record);
        self.node_mut(&id2)?.intersections.insert(id1, record);
        Ok(())
    }

    pub fn has_intersecting_edge(&self, id1: &NodeId, id2: &NodeId) -> bool {
        self.intersection_record(id1, id2).is_some()
    }

    fn intersection_record(&self, id1: &NodeId, id2: &NodeId) -> Option<&IntersectionRecord> {
        self.intersection_index
            .get(&(*id1, *id2))
            .or_else(|| self.intersection_index.get(&(*id2, *id1)))
            .map(|&record| &self.intersections[record])
    }

    pub fn intersecting_elements(&self, id1: &NodeId, id2: &NodeId) -> GraphResult<&Cluster> {
        self.intersection_record(id1, id2)
            .map(|record| &record.elements)
            .ok_or(GraphError::EdgeNotFound(*id1, *id2))
    }

    pub fn intersection(&self, record: IntersectionIndex) -> &IntersectionRecord {
        &self.intersections[record]
    }

    pub fn intersections(&self) -> &[IntersectionRecord] {
        &self.intersections
    }

    // ---- edges ----

    /// Adds exactly one edge `from --> to`.
    ///
    /// # Errors
    /// `InvalidEdgeType` for `Reappear` (use [`Self::add_reappear_edge`]),
    /// `NodeNotFound`, `NonAdjacentTimepoints` unless `to` sits at the
    /// timepoint right after `from`, and `DuplicateEdge`.
    pub fn add_directed_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        transition_type: TransitionType,
    ) -> GraphResult<EdgeIndex> {
        let change = self.size_change(&from, &to)?;
        self.insert_directed_edge(Edge::new(from, to, transition_type, change))
    }

    pub(crate) fn insert_directed_edge(&mut self, edge: Edge) -> GraphResult<EdgeIndex> {
        let (from, to) = (edge.from, edge.to);
        if edge.transition_type == TransitionType::Reappear {
            return Err(GraphError::InvalidEdgeType(edge.transition_type));
        }
        self.node(&from)?;
        self.node(&to)?;
        let (p_from, p_to) = (
            self.require_position(&from.timepoint)?,
            self.require_position(&to.timepoint)?,
        );
        if p_to != p_from + 1 {
            return Err(GraphError::NonAdjacentTimepoints(from, to));
        }
        if self.node(&from)?.outgoing.contains_key(&to) {
            return Err(GraphError::DuplicateEdge(from, to));
        }

        trace!("{} -- {} --> {}", from, edge.transition_type, to);
        let index = self.edges.len();
        self.edges.push(edge);
        self.node_mut(&from)?.outgoing.insert(to, index);
        self.node_mut(&to)?.incoming.insert(from, index);
        Ok(index)
    }

    /// Adds a pair of reappear edges between `a` and `b`. The edge `a --> b`
    /// records `|b| - |a|`; its reverse records the negation.
    pub fn add_reappear_edge(&mut self, a: NodeId, b: NodeId) -> GraphResult<()> {
        let change = self.size_change(&a, &b)?;
        self.insert_reappear_pair(a, b, change)
    }

    pub(crate) fn insert_reappear_pair(&mut self, a: NodeId, b: NodeId, change: i64) -> GraphResult<()> {
        self.node(&a)?;
        self.node(&b)?;
        if a == b {
            return Err(GraphError::SelfReappear(a));
        }

        trace!("{} -- reappear --> {}", a, b);
        let forward = self.edges.len();
        self.edges.push(Edge::new(a, b, TransitionType::Reappear, change));
        let backward = self.edges.len();
        self.edges.push(Edge::new(b, a, TransitionType::Reappear, -change));
        self.node_mut(&a)?.reappear.insert(b, forward);
        self.node_mut(&b)?.reappear.insert(a, backward);
        Ok(())
    }

    fn size_change(&self, from: &NodeId, to: &NodeId) -> GraphResult<i64> {
        let from = self.node(from)?.size() as i64;
        let to = self.node(to)?.size() as i64;
        Ok(to - from)
    }

    pub fn has_edge(&self, a: &NodeId, b: &NodeId, include_reappear: bool) -> GraphResult<bool> {
        Ok(self.node(a)?.edge_to(b, include_reappear).is_some())
    }

    /// The edge `a` shares with `b`, seen from `a`: its incoming edge from
    /// `b`, else its outgoing edge to `b`, else (when asked) its reappear
    /// edge to `b`.
    pub fn edge(&self, a: &NodeId, b: &NodeId, include_reappear: bool) -> GraphResult<&Edge> {
        self.node(a)?
            .edge_to(b, include_reappear)
            .map(|index| &self.edges[index])
            .ok_or(GraphError::EdgeNotFound(*a, *b))
    }

    pub(crate) fn edge_mut(&mut self, a: &NodeId, b: &NodeId) -> GraphResult<&mut Edge> {
        let index = self.node(a)?.edge_to(b, false).ok_or(GraphError::EdgeNotFound(*a, *b))?;
        Ok(&mut self.edges[index])
    }

    pub fn edge_at(&self, index: EdgeIndex) -> &Edge {
        &self.edges[index]
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_fuzzy_sets(
        &self,
        a: &NodeId,
        b: &NodeId,
        include_reappear: bool,
    ) -> GraphResult<&BTreeMap<TransitionType, f64>> {
        Ok(self.edge(a, b, include_reappear)?.fuzzy_types())
    }

    pub fn transition_type(&self, a: &NodeId, b: &NodeId, include_reappear: bool) -> GraphResult<TransitionType> {
        Ok(self.edge(a, b, include_reappear)?.transition_type)
    }

    /// Outgoing edges of `id` with their target, in target order.
    pub fn outgoing_edges(&self, id: &NodeId) -> GraphResult<impl Iterator<Item = (NodeId, &Edge)> + '_> {
        let node = self.node(id)?;
        Ok(node.outgoing.iter().map(move |(to, &index)| (*to, &self.edges[index])))
    }

    /// Reappear edges of `id` with their other endpoint.
    pub fn reappear_edges(&self, id: &NodeId) -> GraphResult<impl Iterator<Item = (NodeId, &Edge)> + '_> {
        let node = self.node(id)?;
        Ok(node.reappear.iter().map(move |(to, &index)| (*to, &self.edges[index])))
    }
}

/// Graphs are equal when they hold the same node IDs; edges are not compared.
impl PartialEq for TransitionGraph {
    fn eq(&self, other: &Self) -> bool {
        self.num_nodes() == other.num_nodes() && self.node_id_set() == other.node_id_set()
    }
}

impl Eq for TransitionGraph {}

#[cfg(test)]
mod tests {
    use super::*;
    use models::vertices::partition_from_lists;

    fn tp(label: &str) -> Timepoint {
        Timepoint::new(label).unwrap()
    }

    fn cluster(elements: &[&str]) -> Cluster {
        partition_from_lists(vec![elements.to_vec()]).remove(0)
    }

    fn three_day_graph() -> TransitionGraph {
        let mut graph = TransitionGraph::new(vec![tp("0819"), tp("0820"), tp("0821")]).unwrap();
        graph.add_node(cluster(&["a", "b", "c"]), tp("0819"), 0).unwrap();
        graph.add_node(cluster(&["x"]), tp("0819"), 1).unwrap();
        graph.add_node(cluster(&["a", "b"]), tp("0820"), 0).unwrap();
        graph.add_node(cluster(&["a", "b", "d", "e"]), tp("0821"), 0).unwrap();
        graph
    }

    fn id(s: &str) -> NodeId {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_and_lookup_nodes() {
        let graph = three_day_graph();
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_nodes_at(&tp("0819")).unwrap(), 2);
        assert_eq!(graph.node_at(tp("0820"), 0).unwrap().size(), 2);
        assert!(matches!(graph.node(&id("0820_05")), Err(GraphError::NodeNotFound(_))));
        assert_eq!(graph.next_timepoint(&tp("0820")), Some(tp("0821")));
        assert_eq!(graph.previous_timepoint(&tp("0819")), None);
    }

    #[test]
    fn test_rejects_duplicate_node_and_unknown_timepoint() {
        let mut graph = three_day_graph();
        let dup = graph.add_node(cluster(&["q"]), tp("0819"), 0);
        assert!(matches!(dup, Err(GraphError::DuplicateNode(_))));

        let unknown = graph.add_node(cluster(&["q"]), tp("0901"), 0);
        assert!(matches!(unknown, Err(GraphError::UnknownTimepoint(_))));

        let empty = graph.add_node(Cluster::new(), tp("0821"), 1);
        assert!(matches!(empty, Err(GraphError::Validation(ValidationError::EmptyCluster(_, 1)))));
    }

    #[test]
    fn test_rejects_duplicate_timeline_label() {
        let graph = TransitionGraph::new(vec![tp("0819"), tp("0819")]);
        assert!(matches!(
            graph,
            Err(GraphError::Validation(ValidationError::DuplicateTimepoint(_)))
        ));
    }

    #[test]
    fn test_sorted_nodes_use_numeric_index() {
        let mut graph = TransitionGraph::new(vec![tp("0819")]).unwrap();
        for index in [10, 2, 100] {
            graph.add_node(cluster(&[index.to_string().as_str()]), tp("0819"), index).unwrap();
        }
        let inserted: Vec<usize> = graph.nodes_at(&tp("0819")).unwrap().map(|n| n.index()).collect();
        assert_eq!(inserted, vec![10, 2, 100]);
        let sorted: Vec<usize> = graph.sorted_nodes_at(&tp("0819")).unwrap().iter().map(|n| n.index()).collect();
        assert_eq!(sorted, vec![2, 10, 100]);
    }

    #[test]
    fn test_intersecting_edge_is_mutual() {
        let mut graph = three_day_graph();
        graph
            .add_intersecting_edge(id("0819_00"), id("0820_00"), cluster(&["a", "b"]))
            .unwrap();

        assert!(graph.has_intersecting_edge(&id("0820_00"), &id("0819_00")));
        assert_eq!(graph.node(&id("0819_00")).unwrap().num_intersecting_neighbors(), 1);
        assert_eq!(graph.node(&id("0820_00")).unwrap().num_intersecting_neighbors(), 1);
        assert_eq!(graph.intersecting_elements(&id("0819_00"), &id("0820_00")).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_intersection_is_rejected() {
        let mut graph = three_day_graph();
        let result = graph.add_intersecting_edge(id("0819_01"), id("0820_00"), Cluster::new());
        assert!(matches!(result, Err(GraphError::EmptyIntersection(_, _))));
    }

    #[test]
    fn test_directed_edge_contract() {
        let mut graph = three_day_graph();
        graph.add_directed_edge(id("0819_00"), id("0820_00"), TransitionType::Absorbed).unwrap();

        let edge = graph.edge(&id("0819_00"), &id("0820_00"), false).unwrap();
        assert_eq!(edge.transition_type, TransitionType::Absorbed);
        assert_eq!(edge.element_change, -1);
        assert!(graph.node(&id("0820_00")).unwrap().has_incoming_neighbors());
        assert_eq!(
            graph.transition_type(&id("0820_00"), &id("0819_00"), false).unwrap(),
            TransitionType::Absorbed
        );

        let reappear = graph.add_directed_edge(id("0820_00"), id("0821_00"), TransitionType::Reappear);
        assert!(matches!(reappear, Err(GraphError::InvalidEdgeType(TransitionType::Reappear))));

        let skip = graph.add_directed_edge(id("0819_00"), id("0821_00"), TransitionType::Unchanged);
        assert!(matches!(skip, Err(GraphError::NonAdjacentTimepoints(_, _))));

        let dup = graph.add_directed_edge(id("0819_00"), id("0820_00"), TransitionType::Split);
        assert!(matches!(dup, Err(GraphError::DuplicateEdge(_, _))));

        let missing = graph.add_directed_edge(id("0819_00"), id("0820_09"), TransitionType::Split);
        assert!(matches!(missing, Err(GraphError::NodeNotFound(_))));
    }

    #[test]
    fn test_reappear_edges_carry_negated_change() {
        let mut graph = three_day_graph();
        graph.add_reappear_edge(id("0819_00"), id("0821_00")).unwrap();

        let forward = graph.edge(&id("0819_00"), &id("0821_00"), true).unwrap();
        let backward = graph.edge(&id("0821_00"), &id("0819_00"), true).unwrap();
        assert_eq!(forward.transition_type, TransitionType::Reappear);
        assert_eq!(forward.element_change, 1);
        assert_eq!(backward.element_change, -1);
        assert!(!graph.has_edge(&id("0819_00"), &id("0821_00"), false).unwrap());
        assert!(graph.edge(&id("0819_00"), &id("0821_00"), false).is_err());
    }

    #[test]
    fn test_graph_equality_is_node_set_equality() {
        let mut a = three_day_graph();
        let b = three_day_graph();
        a.add_directed_edge(id("0819_00"), id("0820_00"), TransitionType::Absorbed).unwrap();
        assert_eq!(a, b);

        let mut c = three_day_graph();
        c.add_node(cluster(&["z"]), tp("0821"), 1).unwrap();
        assert_ne!(a, c);
    }
}
