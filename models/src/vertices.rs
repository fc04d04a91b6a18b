// models/src/vertices.rs
use std::collections::{BTreeSet, HashMap};

use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::Timepoint;

/// An element of a cluster, e.g. a token. Identity only.
pub type Element = String;

/// An unordered set of elements, one community of a partition.
pub type Cluster = BTreeSet<Element>;

/// The clusters found at one timepoint, addressed by position.
pub type Partition = Vec<Cluster>;

/// Builds a partition from raw element lists, collapsing repeated elements
/// inside one list.
pub fn partition_from_lists<I, C, E>(clusters: I) -> Partition
where
    I: IntoIterator<Item = C>,
    C: IntoIterator<Item = E>,
    E: Into<Element>,
{
    clusters
        .into_iter()
        .map(|cluster| cluster.into_iter().map(Into::into).collect())
        .collect()
}

/// Checks the partition contract at the input boundary: no empty cluster and
/// no element shared by two clusters.
///
/// # Errors
/// `ValidationError::EmptyCluster` or `ValidationError::OverlappingClusters`
/// for the first offending cluster, in index order.
pub fn validate_partition(timepoint: &Timepoint, partition: &[Cluster]) -> ValidationResult<()> {
    let mut owner: HashMap<&str, usize> = HashMap::new();

    for (index, cluster) in partition.iter().enumerate() {
        if cluster.is_empty() {
            return Err(ValidationError::EmptyCluster(timepoint.to_string(), index));
        }
        for element in cluster {
            if let Some(first) = owner.insert(element.as_str(), index) {
                return Err(ValidationError::OverlappingClusters {
                    timepoint: timepoint.to_string(),
                    element: element.clone(),
                    first,
                    second: index,
                });
            }
        }
    }

    Ok(())
}
