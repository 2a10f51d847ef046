//! Unit index: one key space for units, files and packages.

use bytemetrics_core::errors::IndexError;
use bytemetrics_core::types::{FxHashMap, KeyInterner, NodeId};

use super::types::{Granularity, IndexedNode};
use crate::classfile::DecodedUnit;

/// Registry of every node discovered in one analysis run.
///
/// Nodes are created once by [`UnitIndex::register`] and never change
/// afterwards, apart from files and packages gaining children.
#[derive(Debug, Default)]
pub struct UnitIndex {
    interner: KeyInterner,
    nodes: FxHashMap<NodeId, IndexedNode>,
    order: Vec<NodeId>,
    units: FxHashMap<NodeId, DecodedUnit>,
}

impl UnitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `unit` under `file`, itself under `package`.
    ///
    /// The file and package are created on first use. Nothing is modified
    /// when an error is returned.
    pub fn register(
        &mut self,
        unit: DecodedUnit,
        file: &str,
        package: &str,
    ) -> Result<NodeId, IndexError> {
        if self.id_of(&unit.key).is_some() || unit.key == file || unit.key == package {
            return Err(IndexError::DuplicateKey { key: unit.key });
        }
        if file == package {
            return Err(IndexError::DuplicateKey {
                key: file.to_string(),
            });
        }
        let existing_package = self.existing(package, Granularity::Package)?;
        let existing_file = self.existing(file, Granularity::File)?;

        if let Some(file_id) = existing_file {
            let owner = self.parent(file_id);
            if owner != existing_package {
                let existing = owner
                    .and_then(|id| self.node(id))
                    .map(|n| n.key.clone())
                    .unwrap_or_default();
                return Err(IndexError::OwnershipConflict {
                    key: file.to_string(),
                    existing,
                    requested: package.to_string(),
                });
            }
        }

        let package_id = match existing_package {
            Some(id) => id,
            None => self.insert_node(package, Granularity::Package, None),
        };
        let file_id = match existing_file {
            Some(id) => id,
            None => self.insert_node(file, Granularity::File, Some(package_id)),
        };
        let unit_id = self.insert_node(&unit.key, Granularity::Unit, Some(file_id));
        self.units.insert(unit_id, unit);

        tracing::trace!(
            unit = self.key(unit_id),
            file = self.key(file_id),
            package = self.key(package_id),
            "registered unit"
        );
        Ok(unit_id)
    }

    /// Existing node for `key`, which must be of `granularity` if present.
    fn existing(&self, key: &str, granularity: Granularity) -> Result<Option<NodeId>, IndexError> {
        match self.search(key) {
            Some(node) if node.granularity == granularity => Ok(Some(node.id)),
            Some(node) => Err(IndexError::DuplicateKey {
                key: node.key.clone(),
            }),
            None => Ok(None),
        }
    }

    fn insert_node(&mut self, key: &str, granularity: Granularity, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.interner.intern(key));
        let node = IndexedNode {
            id,
            key: self.interner.resolve(&id.inner()).to_string(),
            granularity,
            parent,
            children: Vec::new(),
        };
        self.nodes.insert(id, node);
        self.order.push(id);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(id);
        }
        id
    }

    /// Look up a node by key.
    pub fn search(&self, key: &str) -> Option<&IndexedNode> {
        self.id_of(key).and_then(|id| self.nodes.get(&id))
    }

    pub fn id_of(&self, key: &str) -> Option<NodeId> {
        self.interner
            .get(key)
            .map(NodeId::new)
            .filter(|id| self.nodes.contains_key(id))
    }

    pub fn node(&self, id: NodeId) -> Option<&IndexedNode> {
        self.nodes.get(&id)
    }

    /// Key of a registered node; empty for ids from another index.
    pub fn key(&self, id: NodeId) -> &str {
        self.nodes.get(&id).map_or("", |n| n.key.as_str())
    }

    pub fn granularity(&self, id: NodeId) -> Option<Granularity> {
        self.nodes.get(&id).map(|n| n.granularity)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Decoded unit behind a unit node.
    pub fn unit(&self, id: NodeId) -> Option<&DecodedUnit> {
        self.units.get(&id)
    }

    /// Nodes of one granularity, in registration order.
    pub fn nodes(&self, granularity: Granularity) -> impl Iterator<Item = &IndexedNode> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .filter(move |n| n.granularity == granularity)
    }

    /// Every node, in registration order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &IndexedNode> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// The node itself or its ancestor at `granularity`.
    pub fn owner_at(&self, id: NodeId, granularity: Granularity) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(&c)) {
            if node.granularity == granularity {
                return Some(node.id);
            }
            current = node.parent;
        }
        None
    }

    /// Unit nodes owned directly or transitively by `id` (or `id` itself).
    pub fn units_under(&self, id: NodeId) -> Vec<NodeId> {
        let mut units = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.granularity(current) {
                Some(Granularity::Unit) => units.push(current),
                Some(_) => stack.extend(self.children(current).iter().rev()),
                None => {}
            }
        }
        units
    }

    /// Total number of nodes at all granularities.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}
