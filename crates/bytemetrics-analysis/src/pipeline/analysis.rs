//! Query surface over one finished analysis run.

use bytemetrics_core::errors::HierarchyError;
use bytemetrics_core::types::NodeId;

use crate::classfile::DecodedUnit;
use crate::graph::{BuildStats, DependencyEdge, DependencyGraph, Edge};
use crate::hierarchy::HierarchyResolver;
use crate::index::{Granularity, IndexedNode, UnitIndex};
use crate::metrics::{Metric, MetricsTable, NodeMetrics};

/// Index, graph and metrics of one run. Unknown keys always yield `None`
/// or an empty list, never a default value.
#[derive(Debug, Default)]
pub struct Analysis {
    index: UnitIndex,
    graph: DependencyGraph,
    metrics: MetricsTable,
}

impl Analysis {
    pub fn new(index: UnitIndex, graph: DependencyGraph, metrics: MetricsTable) -> Self {
        Self {
            index,
            graph,
            metrics,
        }
    }

    pub fn index(&self) -> &UnitIndex {
        &self.index
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn stats(&self) -> BuildStats {
        self.graph.stats
    }

    /// Node registered under `key`, at any granularity.
    pub fn search(&self, key: &str) -> Option<&IndexedNode> {
        self.index.search(key)
    }

    /// Nodes of one granularity, in registration order.
    pub fn nodes(&self, granularity: Granularity) -> impl Iterator<Item = &IndexedNode> + '_ {
        self.index.nodes(granularity)
    }

    pub fn unit(&self, key: &str) -> Option<&DecodedUnit> {
        self.index.id_of(key).and_then(|id| self.index.unit(id))
    }

    /// Edge from `source` to `target`. Always `None` when both are the same.
    pub fn edge(&self, source: &str, target: &str) -> Option<Edge> {
        let from = self.index.id_of(source)?;
        let to = self.index.id_of(target)?;
        self.graph
            .edge(from, to)
            .map(|edge| self.to_edge(from, to, edge))
    }

    /// Outgoing edges of `key`, sorted by target key.
    pub fn edges_from(&self, key: &str) -> Vec<Edge> {
        let Some(id) = self.index.id_of(key) else {
            return Vec::new();
        };
        let mut edges: Vec<Edge> = self
            .graph
            .edges_from(id)
            .into_iter()
            .map(|(target, edge)| self.to_edge(id, target, edge))
            .collect();
        edges.sort_by(|a, b| a.target.cmp(&b.target));
        edges
    }

    /// Incoming edges of `key`, sorted by source key.
    pub fn edges_to(&self, key: &str) -> Vec<Edge> {
        let Some(id) = self.index.id_of(key) else {
            return Vec::new();
        };
        let mut edges: Vec<Edge> = self
            .graph
            .edges_to(id)
            .into_iter()
            .map(|(source, edge)| self.to_edge(source, id, edge))
            .collect();
        edges.sort_by(|a, b| a.source.cmp(&b.source));
        edges
    }

    fn to_edge(&self, source: NodeId, target: NodeId, edge: &DependencyEdge) -> Edge {
        Edge {
            source: self.index.key(source).to_string(),
            target: self.index.key(target).to_string(),
            kind: edge.kind,
            weight: edge.weight,
        }
    }

    /// Value of `metric` for `key`; `None` for unknown keys and for metrics
    /// that failed on this node.
    pub fn metric(&self, key: &str, metric: Metric) -> Option<u32> {
        self.metrics(key).and_then(|m| m.get(metric))
    }

    pub fn metrics(&self, key: &str) -> Option<&NodeMetrics> {
        self.index.id_of(key).and_then(|id| self.metrics.get(&id))
    }

    /// LCOM4 components of `key`; empty for cohesive nodes.
    pub fn lcom4_blocks(&self, key: &str) -> Option<&[Vec<String>]> {
        self.metrics(key).map(|m| m.lcom4_blocks.as_slice())
    }

    /// Why a metric is missing for `key`, if one failed.
    pub fn metric_failure(&self, key: &str) -> Option<&HierarchyError> {
        self.metrics(key).and_then(|m| m.failure.as_ref())
    }

    /// Resolver over this run's graph. Depths are computed on construction.
    pub fn hierarchy(&self) -> HierarchyResolver<'_> {
        HierarchyResolver::new(&self.graph)
    }

    /// Keys of every ancestor of `key`, nearest first.
    pub fn ancestors_of(&self, key: &str) -> Vec<String> {
        let Some(id) = self.index.id_of(key) else {
            return Vec::new();
        };
        HierarchyResolver::structural(&self.graph)
            .ancestors_of(id)
            .into_iter()
            .map(|ancestor| self.index.key(ancestor).to_string())
            .collect()
    }

    /// Keys of the direct inheritance children of `key`.
    pub fn direct_children_of(&self, key: &str) -> Vec<String> {
        let Some(id) = self.index.id_of(key) else {
            return Vec::new();
        };
        let mut children: Vec<String> = HierarchyResolver::structural(&self.graph)
            .direct_children_of(id)
            .into_iter()
            .map(|child| self.index.key(child).to_string())
            .collect();
        children.sort();
        children
    }
}
