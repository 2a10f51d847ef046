//! Incremental graph construction from decoded references.

use bytemetrics_core::types::NodeId;

use super::aggregation::aggregate;
use super::dependency_graph::DependencyGraph;
use super::types::{AddOutcome, BuildStats, UsageKind};
use crate::classfile::RawReference;
use crate::index::{Granularity, UnitIndex};

/// Accepts references one at a time; `finish` resolves what was deferred
/// and derives the file and package levels.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DependencyGraph,
    pending: Vec<RawReference>,
    stats: BuildStats,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve both endpoints of `reference` and record the unit edge.
    ///
    /// A reference naming a unit that is not registered yet is held until
    /// [`GraphBuilder::finish`].
    pub fn add_reference(&mut self, index: &UnitIndex, reference: &RawReference) -> AddOutcome {
        self.stats.references_seen += 1;
        match self.try_record(index, reference) {
            Some(outcome) => outcome,
            None => {
                self.pending.push(reference.clone());
                AddOutcome::Deferred
            }
        }
    }

    /// References currently waiting for an endpoint.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// `None` when an endpoint is not a registered unit.
    fn try_record(&mut self, index: &UnitIndex, reference: &RawReference) -> Option<AddOutcome> {
        let source = unit_id(index, &reference.source)?;
        let target = unit_id(index, &reference.target)?;
        if source == target {
            self.stats.self_references += 1;
            return Some(AddOutcome::SelfReference);
        }
        for id in [source, target] {
            if let Some(node) = index.node(id) {
                self.graph.add_node(node);
            }
        }
        self.graph
            .accumulate(source, target, UsageKind::from_reference(reference.kind), 1);
        self.stats.recorded += 1;
        Some(AddOutcome::Recorded)
    }

    /// Resolve deferred references, add every indexed node, and derive the
    /// file and package edges. References still unresolved are dropped.
    pub fn finish(mut self, index: &UnitIndex) -> DependencyGraph {
        for node in index.all_nodes() {
            self.graph.add_node(node);
        }

        let pending = std::mem::take(&mut self.pending);
        for reference in &pending {
            match self.try_record(index, reference) {
                Some(_) => self.stats.resolved_late += 1,
                None => {
                    self.stats.unresolved += 1;
                    tracing::trace!(
                        source = %reference.source,
                        target = %reference.target,
                        kind = %reference.kind,
                        "dropping unresolved reference"
                    );
                }
            }
        }

        let file_edges = aggregate(&mut self.graph, index, Granularity::File);
        let package_edges = aggregate(&mut self.graph, index, Granularity::Package);

        tracing::info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            file_edges,
            package_edges,
            recorded = self.stats.recorded,
            resolved_late = self.stats.resolved_late,
            unresolved_references = self.stats.unresolved,
            "dependency graph finished"
        );

        self.graph.stats = self.stats;
        self.graph
    }
}

fn unit_id(index: &UnitIndex, key: &str) -> Option<NodeId> {
    index
        .search(key)
        .filter(|node| node.granularity == Granularity::Unit)
        .map(|node| node.id)
}
