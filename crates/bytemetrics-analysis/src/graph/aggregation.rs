//! Roll unit edges up to file and package edges.

use bytemetrics_core::types::{FxHashMap, NodeId};

use super::dependency_graph::DependencyGraph;
use super::types::{DependencyEdge, UsageKind};
use crate::index::{Granularity, UnitIndex};

/// Running totals for one owner pair.
#[derive(Debug, Clone, Copy)]
struct Rollup {
    weight: u32,
    kind: UsageKind,
    uniform: bool,
}

impl Rollup {
    fn add(&mut self, edge: &DependencyEdge) {
        self.weight += edge.weight;
        self.uniform &= self.kind == edge.kind;
    }

    fn finish(self) -> DependencyEdge {
        let kind = if self.uniform && self.kind.is_inheritance() {
            self.kind
        } else {
            UsageKind::Uses
        };
        DependencyEdge {
            kind,
            weight: self.weight,
        }
    }
}

/// Derive the edges at `granularity` from the unit edges of `graph`.
///
/// The weight of a derived edge is the sum of its unit edges. Its kind is
/// the shared inheritance kind when every unit edge has the same one, and
/// `USES` otherwise. Unit edges inside one owner produce nothing.
pub fn aggregate(graph: &mut DependencyGraph, index: &UnitIndex, granularity: Granularity) -> usize {
    let mut rollups: FxHashMap<(NodeId, NodeId), Rollup> = FxHashMap::default();

    for (source, target, edge) in graph.edges(Granularity::Unit) {
        let (Some(from), Some(to)) = (
            index.owner_at(source, granularity),
            index.owner_at(target, granularity),
        ) else {
            continue;
        };
        if from == to {
            continue;
        }
        rollups
            .entry((from, to))
            .and_modify(|rollup| rollup.add(edge))
            .or_insert(Rollup {
                weight: edge.weight,
                kind: edge.kind,
                uniform: true,
            });
    }

    let mut pairs: Vec<_> = rollups.into_iter().collect();
    pairs.sort_by(|((a_from, a_to), _), ((b_from, b_to), _)| {
        (index.key(*a_from), index.key(*a_to)).cmp(&(index.key(*b_from), index.key(*b_to)))
    });

    let count = pairs.len();
    for ((from, to), rollup) in pairs {
        graph.insert_edge(from, to, rollup.finish());
    }

    tracing::debug!(granularity = %granularity, edges = count, "aggregated edges");
    count
}
