// lib/src/engine/export.rs
//! Flat views of an assembled graph for downstream consumers: transition
//! tuples, JSON, a petgraph copy and a printable listing.

use std::collections::HashMap;
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use models::{GraphResult, NodeId, TransitionTuple, TransitionType};

use crate::engine::graph::TransitionGraph;
use crate::matching::membership::{compute_fuzzy_sets, FuzzyLimiter};

impl TransitionGraph {
    /// Whether a reappear edge `from --> to` points forward in time.
    fn is_forward(&self, from: &NodeId, to: &NodeId) -> bool {
        self.position(&to.timepoint) > self.position(&from.timepoint)
    }
}

/// One `strong`, degree 1 tuple per outgoing edge, in timeline order, plus
/// the forward half of every reappear pair when asked.
pub fn crisp_transition_tuples(graph: &TransitionGraph, include_reappear: bool) -> GraphResult<Vec<TransitionTuple>> {
    let mut tuples = Vec::new();

    for timepoint in graph.timeline() {
        for node in graph.nodes_at(timepoint)? {
            let id = node.id();
            for (target, edge) in graph.outgoing_edges(&id)? {
                tuples.push(TransitionTuple::crisp(id, target, edge.transition_type));
            }
            if include_reappear {
                for (target, _) in graph.reappear_edges(&id)? {
                    if graph.is_forward(&id, &target) {
                        tuples.push(TransitionTuple::crisp(id, target, TransitionType::Reappear));
                    }
                }
            }
        }
    }

    Ok(tuples)
}

/// One tuple per outgoing edge, recorded fuzzy kind and nonzero membership
/// degree of that kind's core.
pub fn fuzzy_transition_tuples(graph: &TransitionGraph, limiter: &FuzzyLimiter) -> GraphResult<Vec<TransitionTuple>> {
    let mut tuples = Vec::new();

    for timepoint in graph.timeline() {
        for node in graph.nodes_at(timepoint)? {
            let id = node.id();
            for (target, edge) in graph.outgoing_edges(&id)? {
                for (&kind, &x) in edge.fuzzy_types() {
                    for (strength, degree) in compute_fuzzy_sets(x, limiter) {
                        tuples.push(TransitionTuple(id, target, kind, strength, degree));
                    }
                }
            }
        }
    }

    Ok(tuples)
}

/// Pretty-printed JSON array of five-element arrays.
pub fn transition_tuples_json(tuples: &[TransitionTuple]) -> GraphResult<String> {
    Ok(serde_json::to_string_pretty(tuples)?)
}

/// Copies the graph into a petgraph `DiGraph`, node weights being the node
/// IDs and edge weights the transition types. Reappear pairs become two
/// opposite edges when included.
pub fn to_petgraph(graph: &TransitionGraph, include_reappear: bool) -> GraphResult<DiGraph<NodeId, TransitionType>> {
    let mut digraph = DiGraph::new();
    let mut indices: HashMap<NodeId, NodeIndex> = HashMap::new();

    for timepoint in graph.timeline() {
        for node in graph.sorted_nodes_at(timepoint)? {
            indices.insert(node.id(), digraph.add_node(node.id()));
        }
    }

    for timepoint in graph.timeline() {
        for node in graph.sorted_nodes_at(timepoint)? {
            add_node_edges(graph, &mut digraph, &indices, node.id(), include_reappear)?;
        }
    }

    Ok(digraph)
}

fn add_node_edges(
    graph: &TransitionGraph,
    digraph: &mut DiGraph<NodeId, TransitionType>,
    indices: &HashMap<NodeId, NodeIndex>,
    id: NodeId,
    include_reappear: bool,
) -> GraphResult<()> {
    let from = indices[&id];
    for (target, edge) in graph.outgoing_edges(&id)? {
        digraph.add_edge(from, indices[&target], edge.transition_type);
    }
    if include_reappear {
        for (target, _) in graph.reappear_edges(&id)? {
            digraph.add_edge(from, indices[&target], TransitionType::Reappear);
        }
    }
    Ok(())
}

/// One `a -- type --> b` line per edge, sources in timeline and index order;
/// reappear pairs are listed once from their earlier end.
impl fmt::Display for TransitionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TransitionGraph")?;
        for timepoint in self.timeline() {
            for node in self.sorted_nodes_at(timepoint).map_err(|_| fmt::Error)? {
                let id = node.id();
                for (target, edge) in self.outgoing_edges(&id).map_err(|_| fmt::Error)? {
                    writeln!(f, "{} -- {} --> {}", id, edge.transition_type, target)?;
                }
                for (target, _) in self.reappear_edges(&id).map_err(|_| fmt::Error)? {
                    if self.is_forward(&id, &target) {
                        writeln!(f, "{} -- {} --> {}", id, TransitionType::Reappear, target)?;
                    }
                }
            }
        }
        Ok(())
    }
}
