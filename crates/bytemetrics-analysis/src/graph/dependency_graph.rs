//! The finished dependency graph over all three granularities.

use bytemetrics_core::types::{FxHashMap, NodeId};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, Direction};

use super::types::{BuildStats, DependencyEdge, GraphNode, UsageKind};
use crate::index::{Granularity, IndexedNode};

/// Directed, weighted dependency graph. Edges only join nodes of the same
/// granularity, there is at most one edge per ordered pair and never a self
/// edge.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying petgraph StableGraph.
    pub graph: StableGraph<GraphNode, DependencyEdge, Directed>,
    /// Map from node id → NodeIndex for O(1) lookup.
    pub node_index: FxHashMap<NodeId, NodeIndex>,
    /// Counters from construction.
    pub stats: BuildStats,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a node for an indexed node, returning the existing one if present.
    pub fn add_node(&mut self, node: &IndexedNode) -> NodeIndex {
        if let Some(&existing) = self.node_index.get(&node.id) {
            return existing;
        }
        let idx = self.graph.add_node(GraphNode {
            id: node.id,
            key: node.key.clone(),
            granularity: node.granularity,
        });
        self.node_index.insert(node.id, idx);
        idx
    }

    pub fn get_node(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_index.get(&id).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.get_node(id).and_then(|idx| self.graph.node_weight(idx))
    }

    /// Add `weight` references of `kind` from `source` to `target`, merging
    /// into an existing edge. Self edges and unknown nodes are ignored.
    pub(crate) fn accumulate(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: UsageKind,
        weight: u32,
    ) -> bool {
        if source == target || weight == 0 {
            return false;
        }
        let (Some(src), Some(tgt)) = (self.get_node(source), self.get_node(target)) else {
            return false;
        };
        match self.graph.find_edge(src, tgt) {
            Some(edge_idx) => {
                if let Some(edge) = self.graph.edge_weight_mut(edge_idx) {
                    edge.weight += weight;
                    edge.kind = edge.kind.merge(kind);
                }
            }
            None => {
                self.graph.add_edge(src, tgt, DependencyEdge { kind, weight });
            }
        }
        true
    }

    /// Insert a fully computed edge. Used for aggregated levels.
    pub(crate) fn insert_edge(&mut self, source: NodeId, target: NodeId, edge: DependencyEdge) {
        if source == target || edge.weight == 0 {
            return;
        }
        if let (Some(src), Some(tgt)) = (self.get_node(source), self.get_node(target)) {
            self.graph.update_edge(src, tgt, edge);
        }
    }

    /// Edge from `source` to `target`, if any.
    pub fn edge(&self, source: NodeId, target: NodeId) -> Option<&DependencyEdge> {
        let src = self.get_node(source)?;
        let tgt = self.get_node(target)?;
        self.graph
            .find_edge(src, tgt)
            .and_then(|idx| self.graph.edge_weight(idx))
    }

    /// Outgoing edges of a node as `(target, edge)`.
    pub fn edges_from(&self, id: NodeId) -> Vec<(NodeId, &DependencyEdge)> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Incoming edges of a node as `(source, edge)`.
    pub fn edges_to(&self, id: NodeId) -> Vec<(NodeId, &DependencyEdge)> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: NodeId, direction: Direction) -> Vec<(NodeId, &DependencyEdge)> {
        let Some(idx) = self.get_node(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, direction)
            .filter_map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                self.graph
                    .node_weight(other)
                    .map(|node| (node.id, edge.weight()))
            })
            .collect()
    }

    /// All edges between nodes of `granularity` as `(source, target, edge)`.
    pub fn edges(&self, granularity: Granularity) -> Vec<(NodeId, NodeId, &DependencyEdge)> {
        self.graph
            .edge_references()
            .filter_map(|edge| {
                let source = self.graph.node_weight(edge.source())?;
                let target = self.graph.node_weight(edge.target())?;
                (source.granularity == granularity).then_some((source.id, target.id, edge.weight()))
            })
            .collect()
    }
}
