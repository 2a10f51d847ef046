//! Afferent (CA) and efferent (CE) coupling.

use bytemetrics_core::types::{FxHashMap, FxHashSet, NodeId};
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::index::{Granularity, UnitIndex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouplingCounts {
    /// Distinct nodes depending on this one.
    pub ca: u32,
    /// Distinct nodes this one depends on.
    pub ce: u32,
}

/// Compute CA/CE for every node of `granularity`.
///
/// Only `USES` edges count unless `include_inheritance` is set. The graph
/// holds at most one edge per ordered pair, so edge weight (call-site
/// multiplicity) never inflates the counts.
pub fn compute_coupling(
    graph: &DependencyGraph,
    index: &UnitIndex,
    granularity: Granularity,
    include_inheritance: bool,
) -> FxHashMap<NodeId, CouplingCounts> {
    let mut efferent: FxHashMap<NodeId, FxHashSet<NodeId>> = FxHashMap::default();
    let mut afferent: FxHashMap<NodeId, FxHashSet<NodeId>> = FxHashMap::default();

    for node in index.nodes(granularity) {
        efferent.entry(node.id).or_default();
        afferent.entry(node.id).or_default();
    }

    for (source, target, edge) in graph.edges(granularity) {
        if !include_inheritance && edge.kind.is_inheritance() {
            continue;
        }
        efferent.entry(source).or_default().insert(target);
        afferent.entry(target).or_default().insert(source);
    }

    efferent
        .into_iter()
        .map(|(id, targets)| {
            let ca = afferent.get(&id).map_or(0, |sources| sources.len() as u32);
            (
                id,
                CouplingCounts {
                    ca,
                    ce: targets.len() as u32,
                },
            )
        })
        .collect()
}
