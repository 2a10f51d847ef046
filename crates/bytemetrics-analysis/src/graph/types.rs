//! Dependency graph types: usage kinds, edges, builder stats.

use bytemetrics_core::types::NodeId;
use serde::{Deserialize, Serialize};

use crate::classfile::ReferenceKind;
use crate::index::Granularity;

/// How the source of an edge depends on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageKind {
    Extends,
    Implements,
    Uses,
}

impl UsageKind {
    /// `SUPERCLASS → EXTENDS`, `CONTRACT → IMPLEMENTS`, everything else `USES`.
    pub fn from_reference(kind: ReferenceKind) -> Self {
        match kind {
            ReferenceKind::Superclass => Self::Extends,
            ReferenceKind::Contract => Self::Implements,
            _ => Self::Uses,
        }
    }

    pub fn is_inheritance(&self) -> bool {
        matches!(self, Self::Extends | Self::Implements)
    }

    /// Rank used when one unit pair carries several kinds. Higher wins.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Extends => 2,
            Self::Implements => 1,
            Self::Uses => 0,
        }
    }

    /// The kind that survives when `self` and `other` meet on one unit pair.
    pub fn merge(self, other: Self) -> Self {
        if other.precedence() > self.precedence() {
            other
        } else {
            self
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Extends => "EXTENDS",
            Self::Implements => "IMPLEMENTS",
            Self::Uses => "USES",
        }
    }
}

impl std::fmt::Display for UsageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Edge weight stored in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub kind: UsageKind,
    /// Distinct underlying references; never zero.
    pub weight: u32,
}

/// Node weight stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub key: String,
    pub granularity: Granularity,
}

/// An edge as returned by queries, endpoints given by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: UsageKind,
    pub weight: u32,
}

/// What happened to one reference handed to the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Both endpoints known; the unit edge was created or its weight bumped.
    Recorded,
    /// Source and target are the same unit; discarded.
    SelfReference,
    /// An endpoint is not registered yet; held until `finish`.
    Deferred,
}

/// Counters kept while building one graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub references_seen: usize,
    pub recorded: usize,
    pub self_references: usize,
    /// Deferred references that resolved at `finish`.
    pub resolved_late: usize,
    /// Deferred references dropped at `finish`.
    pub unresolved: usize,
}
