use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::survey::tools::model::ClassName;

/// All classes contributed by one group's fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Member class names, sorted.
    pub members: Vec<ClassName>,
    /// Left empty for manual curation.
    pub description: String,
}

/// Partitions classes into one cluster per group.
///
/// Every configured group gets a cluster, even when its fragment was missing.
/// A group that only appears in `membership` still gets one so that every
/// class lands in exactly one cluster.
pub fn build_clusters(
    groups: &[String],
    membership: &BTreeMap<ClassName, String>,
) -> BTreeMap<String, Cluster> {
    let mut clusters: BTreeMap<String, Cluster> = groups
        .iter()
        .map(|group| (group.clone(), Cluster::default()))
        .collect();

    // membership iterates alphabetically, so members come out sorted.
    for (name, group) in membership {
        clusters
            .entry(group.clone())
            .or_default()
            .members
            .push(name.clone());
    }

    clusters
}
