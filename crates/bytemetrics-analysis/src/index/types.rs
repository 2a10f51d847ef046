//! Index node types.

use bytemetrics_core::types::NodeId;
use serde::{Deserialize, Serialize};

/// Level of a node in the ownership tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Granularity {
    Unit,
    File,
    Package,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Self::Unit, Self::File, Self::Package];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::File => "file",
            Self::Package => "package",
        }
    }

    /// Granularity of this level's owner, `None` for packages.
    pub fn owner(&self) -> Option<Granularity> {
        match self {
            Self::Unit => Some(Self::File),
            Self::File => Some(Self::Package),
            Self::Package => None,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered unit, file, or package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedNode {
    pub id: NodeId,
    pub key: String,
    pub granularity: Granularity,
    /// Owning node; `None` for packages.
    pub parent: Option<NodeId>,
    /// Owned nodes, in registration order.
    pub children: Vec<NodeId>,
}
