// lib/src/engine/traversal.rs
use std::collections::{HashSet, VecDeque};

use log::debug;
use models::{GraphResult, NodeId, TransitionType};

use crate::engine::edge::Edge;
use crate::engine::graph::TransitionGraph;
use crate::engine::vertex::ClusterNode;

impl TransitionGraph {
    /// Breadth-first traversal from `seed` over incoming and outgoing edges
    /// (and reappear edges when asked), returning the induced subgraph: every
    /// reachable node and every traversed edge, with transition types and
    /// element changes preserved.
    pub fn transition_subgraph(&self, seed: &NodeId, include_reappear: bool) -> GraphResult<TransitionGraph> {
        self.node(seed)?;

        let mut subgraph = self.empty_like();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(*seed);

        while let Some(current_id) = queue.pop_front() {
            if !visited.insert(current_id) {
                continue;
            }

            let current = self.node(&current_id)?;
            subgraph.copy_node(current)?;

            for (neighbor_id, edge_index) in current.neighbors_and_edges(include_reappear) {
                subgraph.copy_node(self.node(&neighbor_id)?)?;
                subgraph.copy_edge(self.edge_at(edge_index))?;

                if !visited.contains(&neighbor_id) {
                    queue.push_back(neighbor_id);
                }
            }
        }

        Ok(subgraph)
    }

    /// One subgraph per connected group of transitions, seeded from every
    /// node in timeline order. Subgraphs holding the same node IDs are kept
    /// once; single-node subgraphs are dropped unless asked for.
    pub fn all_transition_subgraphs(
        &self,
        include_reappear: bool,
        include_single_node: bool,
    ) -> GraphResult<Vec<TransitionGraph>> {
        let mut subgraphs: Vec<TransitionGraph> = Vec::new();

        for timepoint in self.timeline() {
            for node in self.nodes_at(timepoint)? {
                let subgraph = self.transition_subgraph(&node.id(), include_reappear)?;
                if !include_single_node && subgraph.num_nodes() < 2 {
                    continue;
                }
                if !subgraphs.contains(&subgraph) {
                    subgraphs.push(subgraph);
                }
            }
        }

        debug!("extracted {} transition subgraphs from {} nodes", subgraphs.len(), self.num_nodes());
        Ok(subgraphs)
    }

    fn copy_node(&mut self, node: &ClusterNode) -> GraphResult<()> {
        if self.has_node(&node.id()) {
            return Ok(());
        }
        self.add_node(node.elements().clone(), node.timepoint(), node.index())?;
        if let Some(x) = node.disappear_strength() {
            self.set_disappear_strength(&node.id(), x)?;
        }
        Ok(())
    }

    fn copy_edge(&mut self, edge: &Edge) -> GraphResult<()> {
        if edge.transition_type == TransitionType::Reappear {
            if !self.node(&edge.from)?.reappear.contains_key(&edge.to) {
                self.insert_reappear_pair(edge.from, edge.to, edge.element_change)?;
            }
        } else if !self.node(&edge.from)?.outgoing.contains_key(&edge.to) {
            self.insert_directed_edge(edge.clone())?;
        }
        Ok(())
    }
}
