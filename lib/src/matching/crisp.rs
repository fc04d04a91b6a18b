// lib/src/matching/crisp.rs
//! Crisp pairwise matching between the partitions of two timepoints.
//!
//! Every source cluster gets exactly one decision, checked in strict priority
//! order: disappeared, unchanged, split, absorbed. Running the same procedure
//! with the partitions swapped gives the backward view, whose absorbed and
//! split results read forward as dissolved and merged.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::trace;
use serde::{Deserialize, Serialize};
use models::{Cluster, TransitionType, ValidationError, ValidationResult};

/// The two overlap thresholds of the crisp matcher.
///
/// * `threshold_passed`: share of the source cluster that must transfer.
/// * `threshold_criteria`: share of the destination a transferred block must
///   make up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    pub threshold_passed: f64,
    pub threshold_criteria: f64,
}

impl MatchThresholds {
    pub fn new(threshold_passed: f64, threshold_criteria: f64) -> ValidationResult<Self> {
        let thresholds = MatchThresholds {
            threshold_passed,
            threshold_criteria,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Looser thresholds used when searching for a reappearing cluster.
    pub fn reappear() -> Self {
        MatchThresholds {
            threshold_passed: 0.5,
            threshold_criteria: 0.5,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        for (name, value) in [
            ("threshold_passed", self.threshold_passed),
            ("threshold_criteria", self.threshold_criteria),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ValidationError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

impl Default for MatchThresholds {
    fn default() -> Self {
        MatchThresholds {
            threshold_passed: 2.0 / 3.0,
            threshold_criteria: 2.0 / 3.0,
        }
    }
}

/// Element-to-cluster lookup over a target partition.
pub struct PartitionLookup<'a> {
    owner: HashMap<&'a str, usize>,
    sizes: Vec<usize>,
}

impl<'a> PartitionLookup<'a> {
    pub fn new(partition: &'a [Cluster]) -> Self {
        let mut owner = HashMap::new();
        for (index, cluster) in partition.iter().enumerate() {
            for element in cluster {
                owner.insert(element.as_str(), index);
            }
        }
        PartitionLookup {
            owner,
            sizes: partition.iter().map(Cluster::len).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Splits `cluster` into the blocks it hands to each target cluster.
    pub fn distribute(&self, cluster: &Cluster) -> ClusterDistribution {
        let mut blocks = BTreeMap::new();
        let mut not_passed = 0;
        for element in cluster {
            match self.owner.get(element.as_str()) {
                Some(&target) => *blocks.entry(target).or_insert(0) += 1,
                None => not_passed += 1,
            }
        }
        ClusterDistribution {
            size: cluster.len(),
            not_passed,
            blocks,
        }
    }

    fn target_size(&self, target: usize) -> usize {
        self.sizes[target]
    }
}

/// How the elements of one source cluster spread over a target partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterDistribution {
    pub size: usize,
    pub not_passed: usize,
    /// target cluster index -> number of elements received
    pub blocks: BTreeMap<usize, usize>,
}

impl ClusterDistribution {
    fn share(part: usize, whole: usize) -> f64 {
        part as f64 / whole as f64
    }

    pub fn disappeared(&self, thresholds: &MatchThresholds) -> bool {
        Self::share(self.not_passed, self.size) > thresholds.threshold_passed
    }

    /// The single target that holds a large enough share of this cluster and
    /// is mostly made of it. Two or more such targets is ambiguous.
    pub fn unchanged_target(&self, target: &PartitionLookup<'_>, thresholds: &MatchThresholds) -> Option<usize> {
        let mut candidates = self.blocks.iter().filter(|&(&b, &block)| {
            Self::share(block, target.target_size(b)) >= thresholds.threshold_criteria
                && Self::share(block, self.size) >= thresholds.threshold_passed
        });

        match (candidates.next(), candidates.next()) {
            (Some((&b, _)), None) => Some(b),
            _ => None,
        }
    }

    /// Two or more targets each mostly made of this cluster, jointly covering
    /// enough of it.
    pub fn split_targets(&self, target: &PartitionLookup<'_>, thresholds: &MatchThresholds) -> Option<Vec<usize>> {
        let mut received = 0;
        let mut targets = Vec::new();
        for (&b, &block) in &self.blocks {
            if Self::share(block, target.target_size(b)) >= thresholds.threshold_criteria {
                received += block;
                targets.push(b);
            }
        }

        (targets.len() > 1 && Self::share(received, self.size) >= thresholds.threshold_passed).then_some(targets)
    }

    /// The target receiving the largest block, if that block dominates what
    /// was passed and covers enough of this cluster. Ties go to the lowest
    /// target index.
    pub fn absorbed_target(&self, thresholds: &MatchThresholds) -> Option<usize> {
        let passed: usize = self.blocks.values().sum();
        let mut largest: Option<(usize, usize)> = None;
        for (&b, &block) in &self.blocks {
            if largest.map_or(true, |(_, size)| block > size) {
                largest = Some((b, block));
            }
        }

        let (b, block) = largest?;
        (Self::share(block, passed) >= thresholds.threshold_criteria
            && Self::share(block, self.size) >= thresholds.threshold_passed)
            .then_some(b)
    }
}

/// Outcome for one source cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CrispDecision {
    Disappeared,
    Unchanged(usize),
    Split(Vec<usize>),
    Absorbed(usize),
    NoMatch,
}

/// Applies the decision rules in priority order; the first rule that holds
/// wins.
pub fn classify_cluster(
    cluster: &Cluster,
    target: &PartitionLookup<'_>,
    thresholds: &MatchThresholds,
) -> CrispDecision {
    let distribution = target.distribute(cluster);

    if distribution.disappeared(thresholds) {
        return CrispDecision::Disappeared;
    }
    if let Some(b) = distribution.unchanged_target(target, thresholds) {
        return CrispDecision::Unchanged(b);
    }
    if let Some(bs) = distribution.split_targets(target, thresholds) {
        return CrispDecision::Split(bs);
    }
    if let Some(b) = distribution.absorbed_target(thresholds) {
        return CrispDecision::Absorbed(b);
    }
    CrispDecision::NoMatch
}

/// Decisions of one directional pass, keyed by source cluster index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectionalMatching {
    pub unchanged: BTreeMap<usize, usize>,
    pub absorbed: BTreeMap<usize, usize>,
    pub split: BTreeMap<usize, Vec<usize>>,
    pub disappeared: BTreeSet<usize>,
}

/// All crisp transitions from partition A to partition B, in forward
/// orientation (source index in A, target index in B).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PairwiseMatching {
    pub unchanged: BTreeMap<usize, usize>,
    pub absorbed: BTreeMap<usize, usize>,
    pub split: BTreeMap<usize, Vec<usize>>,
    /// `(a, b)`: B-cluster `b` was mostly drawn from `a`.
    pub dissolved: Vec<(usize, usize)>,
    /// `(as, b)`: B-cluster `b` was assembled from the A-clusters `as`.
    pub merged: Vec<(Vec<usize>, usize)>,
    pub disappeared: BTreeSet<usize>,
}

impl PairwiseMatching {
    /// One `(a, b, type)` edge per matched pair, sorted by pair. A pair named
    /// by several kinds keeps the strongest: merged over dissolved over split
    /// over absorbed over unchanged.
    pub fn transitions(&self) -> Vec<(usize, usize, TransitionType)> {
        let mut resolved: BTreeMap<(usize, usize), TransitionType> = BTreeMap::new();
        resolved.extend(self.unchanged.iter().map(|(&a, &b)| ((a, b), TransitionType::Unchanged)));
        resolved.extend(self.absorbed.iter().map(|(&a, &b)| ((a, b), TransitionType::Absorbed)));
        for (&a, targets) in &self.split {
            resolved.extend(targets.iter().map(|&b| ((a, b), TransitionType::Split)));
        }
        resolved.extend(self.dissolved.iter().map(|&(a, b)| ((a, b), TransitionType::Dissolved)));
        for (sources, b) in &self.merged {
            resolved.extend(sources.iter().map(|&a| ((a, *b), TransitionType::Merged)));
        }
        resolved.into_iter().map(|((a, b), kind)| (a, b, kind)).collect()
    }
}

/// Crisp matches restricted to one source cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SingleClusterMatching {
    pub unchanged: Option<usize>,
    pub absorbed: Option<usize>,
    pub split: Option<Vec<usize>>,
    /// B-clusters mostly drawn from this cluster.
    pub dissolved: Vec<usize>,
    /// Merges this cluster takes part in, with their fellow sources.
    pub merged: Vec<(Vec<usize>, usize)>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CrispMatcher {
    thresholds: MatchThresholds,
}

impl CrispMatcher {
    pub fn new(thresholds: MatchThresholds) -> Self {
        CrispMatcher { thresholds }
    }

    pub fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    /// Classifies every cluster of `a` against `b`.
    pub fn match_forward(&self, a: &[Cluster], b: &[Cluster]) -> DirectionalMatching {
        let target = PartitionLookup::new(b);
        let mut matching = DirectionalMatching::default();

        for (i, cluster) in a.iter().enumerate() {
            let decision = classify_cluster(cluster, &target, &self.thresholds);
            trace!("cluster {} -> {:?}", i, decision);
            match decision {
                CrispDecision::Disappeared => {
                    matching.disappeared.insert(i);
                }
                CrispDecision::Unchanged(j) => {
                    matching.unchanged.insert(i, j);
                }
                CrispDecision::Split(js) => {
                    matching.split.insert(i, js);
                }
                CrispDecision::Absorbed(j) => {
                    matching.absorbed.insert(i, j);
                }
                CrispDecision::NoMatch => {}
            }
        }

        matching
    }

    /// The forward procedure with the partitions swapped; indices are keyed
    /// by B-cluster.
    pub fn match_backward(&self, a: &[Cluster], b: &[Cluster]) -> DirectionalMatching {
        self.match_forward(b, a)
    }

    /// Forward and backward passes combined into forward orientation.
    pub fn match_clusters(&self, a: &[Cluster], b: &[Cluster]) -> PairwiseMatching {
        let forward = self.match_forward(a, b);
        let backward = self.match_backward(a, b);

        PairwiseMatching {
            unchanged: forward.unchanged,
            absorbed: forward.absorbed,
            split: forward.split,
            dissolved: backward.absorbed.into_iter().map(|(b, a)| (a, b)).collect(),
            merged: backward.split.into_iter().map(|(b, sources)| (sources, b)).collect(),
            disappeared: forward.disappeared,
        }
    }

    /// [`Self::match_clusters`] narrowed to the cluster at `index` of `a`.
    pub fn match_single_cluster(&self, a: &[Cluster], index: usize, b: &[Cluster]) -> SingleClusterMatching {
        let mut matching = self.match_clusters(a, b);

        SingleClusterMatching {
            unchanged: matching.unchanged.remove(&index),
            absorbed: matching.absorbed.remove(&index),
            split: matching.split.remove(&index),
            dissolved: matching
                .dissolved
                .iter()
                .filter(|(a, _)| *a == index)
                .map(|&(_, b)| b)
                .collect(),
            merged: matching
                .merged
                .into_iter()
                .filter(|(sources, _)| sources.contains(&index))
                .collect(),
        }
    }

    /// Looks for the cluster of `b` that `cluster` persists into, using only
    /// the disappearance and unchanged rules.
    pub fn match_reappearing_cluster(&self, cluster: &Cluster, b: &[Cluster]) -> Option<usize> {
        let target = PartitionLookup::new(b);
        let distribution = target.distribute(cluster);
        if distribution.disappeared(&self.thresholds) {
            return None;
        }
        distribution.unchanged_target(&target, &self.thresholds)
    }
}
