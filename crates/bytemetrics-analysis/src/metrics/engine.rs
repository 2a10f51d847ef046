//! Metric engine: every metric for every node, computed in parallel.

use bytemetrics_core::config::AnalysisConfig;
use bytemetrics_core::types::{FxHashMap, NodeId};
use rayon::prelude::*;

use super::coupling::{compute_coupling, CouplingCounts};
use super::lcom4::lcom4;
use super::rfc::response_for_class;
use super::types::{Metric, MetricsTable, NodeMetrics};
use crate::classfile::DecodedUnit;
use crate::graph::DependencyGraph;
use crate::hierarchy::HierarchyResolver;
use crate::index::{Granularity, IndexedNode, UnitIndex};

/// Computes RFC, DIT, NOC, LCOM4, CA and CE at unit, file and package
/// granularity over a finished graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricEngine {
    include_inheritance: bool,
    record_blocks: bool,
}

impl MetricEngine {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            include_inheritance: config.effective_coupling_includes_inheritance(),
            record_blocks: config.effective_lcom4_blocks(),
        }
    }

    pub fn compute(&self, index: &UnitIndex, graph: &DependencyGraph) -> MetricsTable {
        let resolver = HierarchyResolver::new(graph);
        let mut coupling: FxHashMap<NodeId, CouplingCounts> = FxHashMap::default();
        for granularity in Granularity::ALL {
            coupling.extend(compute_coupling(graph, index, granularity, self.include_inheritance));
        }

        let nodes: Vec<&IndexedNode> = index.all_nodes().collect();
        let table: MetricsTable = nodes
            .par_iter()
            .map(|node| (node.id, self.node_metrics(node, index, &resolver, &coupling)))
            .collect();

        let failed = table.values().filter(|m| m.failure.is_some()).count();
        tracing::debug!(nodes = table.len(), failed, "metrics computed");
        table
    }

    fn node_metrics(
        &self,
        node: &IndexedNode,
        index: &UnitIndex,
        resolver: &HierarchyResolver<'_>,
        coupling: &FxHashMap<NodeId, CouplingCounts>,
    ) -> NodeMetrics {
        let units: Vec<&DecodedUnit> = index
            .units_under(node.id)
            .into_iter()
            .filter_map(|id| index.unit(id))
            .collect();

        let mut metrics = NodeMetrics::default();
        metrics.values.insert(Metric::Rfc, response_for_class(&units));

        let (lcom, blocks) = lcom4(&units);
        metrics.values.insert(Metric::Lcom4, lcom);
        if self.record_blocks {
            metrics.lcom4_blocks = blocks;
        }

        match resolver.depth(node.id) {
            Ok(depth) => {
                metrics.values.insert(Metric::Dit, depth);
            }
            Err(error) => {
                tracing::warn!(key = %node.key, %error, "DIT not computed");
                metrics.failure = Some(error);
            }
        }
        metrics.values.insert(Metric::Noc, resolver.noc(node.id));

        let counts = coupling.get(&node.id).copied().unwrap_or_default();
        metrics.values.insert(Metric::Ca, counts.ca);
        metrics.values.insert(Metric::Ce, counts.ce);
        metrics
    }
}
