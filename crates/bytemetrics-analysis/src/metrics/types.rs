//! Metric identifiers and per-node results.

use std::collections::BTreeMap;

use bytemetrics_core::errors::HierarchyError;
use bytemetrics_core::types::{FxHashMap, NodeId};
use serde::{Deserialize, Serialize};

/// One of the computed design metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    /// Response for class.
    Rfc,
    /// Depth of inheritance tree.
    Dit,
    /// Number of children.
    Noc,
    /// Lack of cohesion, connected-components variant.
    Lcom4,
    /// Afferent coupling.
    Ca,
    /// Efferent coupling.
    Ce,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Self::Rfc,
        Self::Dit,
        Self::Noc,
        Self::Lcom4,
        Self::Ca,
        Self::Ce,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rfc => "RFC",
            Self::Dit => "DIT",
            Self::Noc => "NOC",
            Self::Lcom4 => "LCOM4",
            Self::Ca => "CA",
            Self::Ce => "CE",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Metric values for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub values: BTreeMap<Metric, u32>,
    /// LCOM4 components as sorted member identifiers; empty when cohesive.
    pub lcom4_blocks: Vec<Vec<String>>,
    /// Set when a metric could not be computed for this node.
    #[serde(skip)]
    pub failure: Option<HierarchyError>,
}

impl NodeMetrics {
    pub fn get(&self, metric: Metric) -> Option<u32> {
        self.values.get(&metric).copied()
    }
}

/// Results for every node of one run.
pub type MetricsTable = FxHashMap<NodeId, NodeMetrics>;
