// lib/src/matching/fuzzy.rs
//! Graded transition cores computed from recorded intersections.
//!
//! Every core is a value in `[0, 1]`; several kinds may hold on the same edge
//! at once. Cores are written into the edge's fuzzy map, overwriting earlier
//! values, so applying them twice leaves the graph unchanged.

use std::collections::HashSet;

use log::{debug, trace};
use models::{Cluster, GraphResult, NodeId, Timepoint, TransitionType};

use crate::engine::graph::TransitionGraph;
use crate::engine::vertex::ClusterNode;

/// A neighbor at an adjacent timepoint together with the shared elements.
struct Overlap<'g> {
    neighbor: &'g ClusterNode,
    shared: &'g Cluster,
}

impl Overlap<'_> {
    fn union_len(&self, node: &ClusterNode) -> usize {
        node.size() + self.neighbor.size() - self.shared.len()
    }
}

fn overlaps_at<'g>(
    graph: &'g TransitionGraph,
    node: &ClusterNode,
    timepoint: Option<Timepoint>,
) -> GraphResult<Vec<Overlap<'g>>> {
    let Some(timepoint) = timepoint else {
        return Ok(Vec::new());
    };

    node.intersecting_neighbors()
        .filter(|(id, _)| id.timepoint == timepoint)
        .map(|(id, record)| -> GraphResult<Overlap<'g>> {
            Ok(Overlap {
                neighbor: graph.node(&id)?,
                shared: &graph.intersection(record).elements,
            })
        })
        .collect()
}

fn forward_overlaps<'g>(graph: &'g TransitionGraph, node: &ClusterNode) -> GraphResult<Vec<Overlap<'g>>> {
    overlaps_at(graph, node, graph.next_timepoint(&node.timepoint()))
}

fn backward_overlaps<'g>(graph: &'g TransitionGraph, node: &ClusterNode) -> GraphResult<Vec<Overlap<'g>>> {
    overlaps_at(graph, node, graph.previous_timepoint(&node.timepoint()))
}

/// Share of the cluster that is not passed on to the next timepoint; 0 at
/// the last timepoint.
pub fn disappear_core(graph: &TransitionGraph, node: &ClusterNode) -> GraphResult<f64> {
    if graph.next_timepoint(&node.timepoint()).is_none() {
        return Ok(0.0);
    }

    let passed: HashSet<&str> = forward_overlaps(graph, node)?
        .iter()
        .flat_map(|overlap| overlap.shared.iter().map(String::as_str))
        .collect();
    Ok(1.0 - passed.len() as f64 / node.size() as f64)
}

/// Jaccard similarity with every forward neighbor.
pub fn unchanged_cores(graph: &TransitionGraph, node: &ClusterNode) -> GraphResult<Vec<(NodeId, f64)>> {
    Ok(forward_overlaps(graph, node)?
        .iter()
        .map(|o| (o.neighbor.id(), o.shared.len() as f64 / o.union_len(node) as f64))
        .collect())
}

/// How much more the overlap covers this cluster than the union; only
/// positive values are kept.
pub fn absorbed_cores(graph: &TransitionGraph, node: &ClusterNode) -> GraphResult<Vec<(NodeId, f64)>> {
    Ok(forward_overlaps(graph, node)?
        .iter()
        .map(|o| {
            let shared = o.shared.len() as f64;
            (o.neighbor.id(), shared / node.size() as f64 - shared / o.union_len(node) as f64)
        })
        .filter(|(_, x)| *x > 0.0)
        .collect())
}

/// How much more the overlap covers the neighbor than the union; only
/// positive values are kept.
pub fn dissolved_cores(graph: &TransitionGraph, node: &ClusterNode) -> GraphResult<Vec<(NodeId, f64)>> {
    Ok(forward_overlaps(graph, node)?
        .iter()
        .map(|o| {
            let shared = o.shared.len() as f64;
            (o.neighbor.id(), shared / o.neighbor.size() as f64 - shared / o.union_len(node) as f64)
        })
        .filter(|(_, x)| *x > 0.0)
        .collect())
}

fn spread_core(node: &ClusterNode, overlaps: &[Overlap<'_>]) -> Option<f64> {
    if overlaps.len() < 2 {
        return None;
    }

    let mut shared: HashSet<&str> = HashSet::new();
    let mut union: HashSet<&str> = node.elements().iter().map(String::as_str).collect();
    for overlap in overlaps {
        shared.extend(overlap.shared.iter().map(String::as_str));
        union.extend(overlap.neighbor.elements().iter().map(String::as_str));
    }
    Some(shared.len() as f64 / union.len() as f64)
}

/// Shared share of everything involved, when the cluster feeds two or more
/// forward neighbors.
pub fn split_core(graph: &TransitionGraph, node: &ClusterNode) -> GraphResult<Option<f64>> {
    Ok(spread_core(node, &forward_overlaps(graph, node)?))
}

/// Backward counterpart of [`split_core`], over previous-timepoint neighbors.
pub fn merge_core(graph: &TransitionGraph, node: &ClusterNode) -> GraphResult<Option<f64>> {
    Ok(spread_core(node, &backward_overlaps(graph, node)?))
}

#[derive(Default)]
struct FuzzyUpdates {
    disappear: Vec<(NodeId, f64)>,
    edges: Vec<(NodeId, NodeId, TransitionType, f64)>,
}

fn collect_updates(graph: &TransitionGraph) -> GraphResult<FuzzyUpdates> {
    let mut updates = FuzzyUpdates::default();

    for node in graph.nodes() {
        let id = node.id();
        updates.disappear.push((id, disappear_core(graph, node)?));

        let edges = &mut updates.edges;
        for (kind, cores) in [
            (TransitionType::Unchanged, unchanged_cores(graph, node)?),
            (TransitionType::Absorbed, absorbed_cores(graph, node)?),
            (TransitionType::Dissolved, dissolved_cores(graph, node)?),
        ] {
            edges.extend(cores.into_iter().map(|(target, x)| (id, target, kind, x)));
        }

        if let Some(x) = split_core(graph, node)? {
            edges.extend(node.outgoing_neighbors().map(|target| (id, target, TransitionType::Split, x)));
        }
        if let Some(x) = merge_core(graph, node)? {
            edges.extend(node.incoming_neighbors().map(|source| (source, id, TransitionType::Merged, x)));
        }
    }

    Ok(updates)
}

/// Computes every core of every node and records them on the graph.
///
/// # Errors
/// `EdgeNotFound` when an intersecting adjacent pair has no directed edge to
/// carry its cores.
pub fn apply_fuzzy_cores(graph: &mut TransitionGraph) -> GraphResult<()> {
    let updates = collect_updates(graph)?;

    for (id, x) in &updates.disappear {
        graph.set_disappear_strength(id, *x)?;
    }
    for (from, to, kind, x) in &updates.edges {
        trace!("{} -- {} ({:.3}) --> {}", from, kind, x, to);
        graph.edge_mut(from, to)?.add_fuzzy_type(*kind, *x);
    }

    debug!(
        "recorded {} fuzzy cores and {} disappear strengths",
        updates.edges.len(),
        updates.disappear.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::vertices::partition_from_lists;

    fn tp(label: &str) -> Timepoint {
        Timepoint::new(label).unwrap()
    }

    fn id(s: &str) -> NodeId {
        s.parse().unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // nodes, intersections and fuzzy edges between two timepoints
    fn raw_graph(first: Vec<Vec<&str>>, second: Vec<Vec<&str>>) -> TransitionGraph {
        let (t0, t1) = (tp("0819"), tp("0820"));
        let mut graph = TransitionGraph::new(vec![t0, t1]).unwrap();
        let first = partition_from_lists(first);
        let second = partition_from_lists(second);
        for (i, cluster) in first.iter().enumerate() {
            graph.add_node(cluster.clone(), t0, i).unwrap();
        }
        for (j, cluster) in second.iter().enumerate() {
            graph.add_node(cluster.clone(), t1, j).unwrap();
        }
        for (i, a) in first.iter().enumerate() {
            for (j, b) in second.iter().enumerate() {
                let shared: Cluster = a.intersection(b).cloned().collect();
                if shared.is_empty() {
                    continue;
                }
                let (from, to) = (NodeId::new(t0, i), NodeId::new(t1, j));
                graph.add_intersecting_edge(from, to, shared).unwrap();
                graph.add_directed_edge(from, to, TransitionType::Fuzzy).unwrap();
            }
        }
        graph
    }

    #[test]
    fn test_overlap_example_cores() {
        let mut graph = raw_graph(vec![vec!["1", "2", "3", "4"]], vec![vec!["2", "3", "4", "5"]]);
        apply_fuzzy_cores(&mut graph).unwrap();

        let edge = graph.edge(&id("0819_00"), &id("0820_00"), false).unwrap();
        assert_eq!(edge.transition_type, TransitionType::Fuzzy);
        assert!(approx(edge.fuzzy_core(TransitionType::Unchanged).unwrap(), 0.6));
        assert!(approx(edge.fuzzy_core(TransitionType::Absorbed).unwrap(), 0.15));
        assert!(approx(edge.fuzzy_core(TransitionType::Dissolved).unwrap(), 0.15));
        assert_eq!(edge.fuzzy_core(TransitionType::Split), None);
        assert_eq!(edge.fuzzy_core(TransitionType::Merged), None);

        let first = graph.node(&id("0819_00")).unwrap();
        assert!(approx(first.disappear_strength().unwrap(), 0.25));
        let last = graph.node(&id("0820_00")).unwrap();
        assert_eq!(last.disappear_strength(), Some(0.0));
    }

    #[test]
    fn test_split_core_lands_on_every_outgoing_edge() {
        let mut graph = raw_graph(vec![vec!["a", "b", "c", "d"]], vec![vec!["a", "b", "x"], vec!["c", "d"]]);
        apply_fuzzy_cores(&mut graph).unwrap();

        let to_first = graph.edge(&id("0819_00"), &id("0820_00"), false).unwrap();
        let to_second = graph.edge(&id("0819_00"), &id("0820_01"), false).unwrap();
        assert!(approx(to_first.fuzzy_core(TransitionType::Split).unwrap(), 0.8));
        assert!(approx(to_second.fuzzy_core(TransitionType::Split).unwrap(), 0.8));

        assert!(approx(to_first.fuzzy_core(TransitionType::Unchanged).unwrap(), 0.4));
        assert!(approx(to_second.fuzzy_core(TransitionType::Unchanged).unwrap(), 0.5));
        assert!(approx(to_first.fuzzy_core(TransitionType::Absorbed).unwrap(), 0.1));
        // 2/4 - 2/4 is not positive
        assert_eq!(to_second.fuzzy_core(TransitionType::Absorbed), None);
        assert!(approx(to_first.fuzzy_core(TransitionType::Dissolved).unwrap(), 2.0 / 3.0 - 0.4));
        assert!(approx(to_second.fuzzy_core(TransitionType::Dissolved).unwrap(), 0.5));

        assert_eq!(graph.node(&id("0819_00")).unwrap().disappear_strength(), Some(0.0));
    }

    #[test]
    fn test_merge_core_lands_on_every_incoming_edge() {
        let mut graph = raw_graph(vec![vec!["a", "b"], vec!["c", "d", "y"]], vec![vec!["a", "b", "c", "d"]]);
        apply_fuzzy_cores(&mut graph).unwrap();

        // shared {a,b,c,d} over union {a,b,c,d,y}
        for source in ["0819_00", "0819_01"] {
            let edge = graph.edge(&id(source), &id("0820_00"), false).unwrap();
            assert!(approx(edge.fuzzy_core(TransitionType::Merged).unwrap(), 0.8));
            assert_eq!(edge.fuzzy_core(TransitionType::Split), None);
        }
        let partial = graph.node(&id("0819_01")).unwrap();
        assert!(approx(partial.disappear_strength().unwrap(), 1.0 / 3.0));
    }

    #[test]
    fn test_cluster_without_successor_fully_disappears() {
        let mut graph = raw_graph(vec![vec!["a"], vec!["q"]], vec![vec!["a", "b"]]);
        apply_fuzzy_cores(&mut graph).unwrap();

        assert_eq!(graph.node(&id("0819_01")).unwrap().disappear_strength(), Some(1.0));
        assert!(!graph.node(&id("0819_01")).unwrap().has_outgoing_neighbors());
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let mut graph = raw_graph(vec![vec!["a", "b", "c", "d"]], vec![vec!["a", "b", "x"], vec!["c", "d"]]);
        apply_fuzzy_cores(&mut graph).unwrap();
        let once = graph.clone();
        apply_fuzzy_cores(&mut graph).unwrap();

        for node in once.nodes() {
            let again = graph.node(&node.id()).unwrap();
            assert_eq!(node.disappear_strength(), again.disappear_strength());
            for (target, edge) in once.outgoing_edges(&node.id()).unwrap() {
                assert_eq!(
                    edge.fuzzy_types(),
                    graph.edge_fuzzy_sets(&node.id(), &target, false).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_missing_edge_is_reported() {
        let (t0, t1) = (tp("0819"), tp("0820"));
        let mut graph = TransitionGraph::new(vec![t0, t1]).unwrap();
        let cluster = partition_from_lists(vec![vec!["a"]]).remove(0);
        let from = graph.add_node(cluster.clone(), t0, 0).unwrap();
        let to = graph.add_node(cluster.clone(), t1, 0).unwrap();
        graph.add_intersecting_edge(from, to, cluster).unwrap();

        assert!(apply_fuzzy_cores(&mut graph).is_err());
    }
}
