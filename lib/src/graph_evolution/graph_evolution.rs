// lib/src/graph_evolution/graph_evolution.rs
//! Assembles a transition graph from a timeline of partitions.

use std::collections::{BTreeMap, HashMap};

use log::{debug, info};
use models::{Cluster, GraphResult, NodeId, Partition, TransitionTuple, TransitionType};
use rayon::prelude::*;

use crate::config::{TransitionConfig, TransitionMode};
use crate::engine::export::{crisp_transition_tuples, fuzzy_transition_tuples};
use crate::engine::graph::TransitionGraph;
use crate::graph_evolution::time_window::Timeline;
use crate::matching::crisp::{CrispMatcher, PairwiseMatching};
use crate::matching::fuzzy::apply_fuzzy_cores;

/// Elements shared by each intersecting `(a, b)` cluster pair of two
/// partitions.
fn partition_intersections(a: &[Cluster], b: &[Cluster]) -> BTreeMap<(usize, usize), Cluster> {
    let owner: HashMap<&str, usize> = b
        .iter()
        .enumerate()
        .flat_map(|(j, cluster)| cluster.iter().map(move |element| (element.as_str(), j)))
        .collect();

    let mut shared: BTreeMap<(usize, usize), Cluster> = BTreeMap::new();
    for (i, cluster) in a.iter().enumerate() {
        for element in cluster {
            if let Some(&j) = owner.get(element.as_str()) {
                shared.entry((i, j)).or_default().insert(element.clone());
            }
        }
    }
    shared
}

#[derive(Debug, Clone, Default)]
pub struct GraphEvolution {
    config: TransitionConfig,
}

impl GraphEvolution {
    pub fn new(config: TransitionConfig) -> GraphResult<Self> {
        config.validate()?;
        Ok(GraphEvolution { config })
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Nodes for every cluster and an intersection record for every
    /// intersecting adjacent pair. With `fuzzy_edges`, each such pair also
    /// gets a `fuzzy` directed edge.
    pub fn build_raw_graph(&self, timeline: &Timeline, fuzzy_edges: bool) -> GraphResult<TransitionGraph> {
        let mut graph = TransitionGraph::new(timeline.timepoints().iter().copied())?;

        for (timepoint, partition) in timeline.iter() {
            for (index, cluster) in partition.iter().enumerate() {
                graph.add_node(cluster.clone(), timepoint, index)?;
            }
        }

        let steps = timeline.iter().zip(timeline.iter().skip(1));
        for ((t_a, a), (t_b, b)) in steps {
            for ((i, j), elements) in partition_intersections(a, b) {
                let (from, to) = (NodeId::new(t_a, i), NodeId::new(t_b, j));
                graph.add_intersecting_edge(from, to, elements)?;
                if fuzzy_edges {
                    graph.add_directed_edge(from, to, TransitionType::Fuzzy)?;
                }
            }
        }

        info!(
            "Built raw graph: {} nodes, {} intersections over {} timepoints",
            graph.num_nodes(),
            graph.intersections().len(),
            timeline.len()
        );
        Ok(graph)
    }

    /// Crisp matching of every adjacent partition pair, in timeline order.
    pub fn pairwise_matchings(&self, timeline: &Timeline) -> Vec<PairwiseMatching> {
        let matcher = CrispMatcher::new(self.config.crisp);
        let partitions: &[Partition] = timeline.partitions();

        if self.config.parallel {
            partitions
                .par_windows(2)
                .map(|pair| matcher.match_clusters(&pair[0], &pair[1]))
                .collect()
        } else {
            partitions
                .windows(2)
                .map(|pair| matcher.match_clusters(&pair[0], &pair[1]))
                .collect()
        }
    }

    /// Raw graph plus one typed edge per matched pair, see
    /// [`PairwiseMatching::transitions`]. Reappear edges follow when enabled.
    pub fn build_crisp_graph(&self, timeline: &Timeline) -> GraphResult<TransitionGraph> {
        let mut graph = self.build_raw_graph(timeline, false)?;
        let timepoints = timeline.timepoints();

        for (position, matching) in self.pairwise_matchings(timeline).into_iter().enumerate() {
            let (t_a, t_b) = (timepoints[position], timepoints[position + 1]);
            for (a, b, kind) in matching.transitions() {
                graph.add_directed_edge(NodeId::new(t_a, a), NodeId::new(t_b, b), kind)?;
            }
            debug!(
                "{} -> {}: {} unchanged, {} absorbed, {} split, {} dissolved, {} merged, {} disappeared",
                t_a,
                t_b,
                matching.unchanged.len(),
                matching.absorbed.len(),
                matching.split.len(),
                matching.dissolved.len(),
                matching.merged.len(),
                matching.disappeared.len()
            );
        }

        if self.config.reappear.enabled {
            self.add_reappearing_clusters(&mut graph)?;
        }

        info!("Built crisp graph: {} nodes, {} edges", graph.num_nodes(), graph.num_edges());
        Ok(graph)
    }

    /// Links every cluster without successors to the first later cluster, two
    /// or more timepoints ahead, that it persists into. Returns the number of
    /// reappear pairs added.
    pub fn add_reappearing_clusters(&self, graph: &mut TransitionGraph) -> GraphResult<usize> {
        let matcher = CrispMatcher::new(self.config.reappear.thresholds());
        let timeline = graph.timeline().to_vec();
        let mut links = Vec::new();

        for (position, timepoint) in timeline.iter().enumerate() {
            for node in graph.nodes_at(timepoint)? {
                if node.has_outgoing_neighbors() {
                    continue;
                }
                for later in timeline.iter().skip(position + 2) {
                    let candidates = graph.sorted_nodes_at(later)?;
                    let partition: Partition = candidates.iter().map(|n| n.elements().clone()).collect();
                    if let Some(matched) = matcher.match_reappearing_cluster(node.elements(), &partition) {
                        links.push((node.id(), candidates[matched].id()));
                        break;
                    }
                }
            }
        }

        for (a, b) in &links {
            debug!("{} reappears as {}", a, b);
            graph.add_reappear_edge(*a, *b)?;
        }

        info!("Added {} reappear links", links.len());
        Ok(links.len())
    }

    /// Raw graph with fuzzy edges, then every graded core.
    pub fn build_fuzzy_graph(&self, timeline: &Timeline) -> GraphResult<TransitionGraph> {
        let mut graph = self.build_raw_graph(timeline, true)?;
        apply_fuzzy_cores(&mut graph)?;
        info!("Built fuzzy graph: {} nodes, {} edges", graph.num_nodes(), graph.num_edges());
        Ok(graph)
    }

    pub fn build(&self, timeline: &Timeline) -> GraphResult<TransitionGraph> {
        match self.config.mode {
            TransitionMode::Crisp => self.build_crisp_graph(timeline),
            TransitionMode::Fuzzy => self.build_fuzzy_graph(timeline),
        }
    }

    /// Tuples of a graph built by [`Self::build`] under the same mode. Crisp
    /// tuples cover outgoing edges only unless `reappear.in_tuples` is set.
    pub fn transition_tuples(&self, graph: &TransitionGraph) -> GraphResult<Vec<TransitionTuple>> {
        let reappear = &self.config.reappear;
        match self.config.mode {
            TransitionMode::Crisp => crisp_transition_tuples(graph, reappear.enabled && reappear.in_tuples),
            TransitionMode::Fuzzy => fuzzy_transition_tuples(graph, &self.config.fuzzy.limiter),
        }
    }

    pub fn transition_subgraphs(&self, graph: &TransitionGraph) -> GraphResult<Vec<TransitionGraph>> {
        let subgraphs = &self.config.subgraphs;
        graph.all_transition_subgraphs(subgraphs.include_reappear, subgraphs.include_single_node)
    }
}
