//! Inheritance queries over `EXTENDS`/`IMPLEMENTS` edges.

use bytemetrics_core::errors::HierarchyError;
use bytemetrics_core::types::{FxHashMap, FxHashSet, NodeId};

use crate::graph::DependencyGraph;

#[derive(Debug, Clone)]
enum DepthState {
    Visiting,
    Done(Result<u32, HierarchyError>),
}

/// Answers ancestor, children and depth queries for one finished graph.
///
/// Depths are computed for every node up front, so queries are read-only
/// and can run from several threads.
#[derive(Debug)]
pub struct HierarchyResolver<'g> {
    graph: &'g DependencyGraph,
    depths: FxHashMap<NodeId, Result<u32, HierarchyError>>,
}

impl<'g> HierarchyResolver<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        let mut resolver = Self {
            graph,
            depths: FxHashMap::default(),
        };
        let mut memo: FxHashMap<NodeId, DepthState> = FxHashMap::default();
        let mut path = Vec::new();
        let ids: Vec<NodeId> = graph.node_index.keys().copied().collect();
        for id in ids {
            let _ = resolver.depth_of(id, &mut memo, &mut path);
        }
        resolver.depths = memo
            .into_iter()
            .filter_map(|(id, state)| match state {
                DepthState::Done(result) => Some((id, result)),
                DepthState::Visiting => None,
            })
            .collect();

        let cyclic = resolver.depths.values().filter(|d| d.is_err()).count();
        if cyclic > 0 {
            tracing::warn!(nodes = cyclic, "cyclic inheritance detected");
        }
        resolver
    }

    /// Resolver for parent, children and ancestor queries only. No depths
    /// are computed, so `depth` reports 0 for every node.
    pub(crate) fn structural(graph: &'g DependencyGraph) -> Self {
        Self {
            graph,
            depths: FxHashMap::default(),
        }
    }

    /// Targets of outgoing inheritance edges.
    pub fn direct_parents_of(&self, id: NodeId) -> Vec<NodeId> {
        self.graph
            .edges_from(id)
            .into_iter()
            .filter(|(_, edge)| edge.kind.is_inheritance())
            .map(|(target, _)| target)
            .collect()
    }

    /// Distinct sources of incoming inheritance edges.
    pub fn direct_children_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        self.graph
            .edges_to(id)
            .into_iter()
            .filter(|(_, edge)| edge.kind.is_inheritance())
            .map(|(source, _)| source)
            .filter(|source| seen.insert(*source))
            .collect()
    }

    /// Number of children.
    pub fn noc(&self, id: NodeId) -> u32 {
        self.direct_children_of(id).len() as u32
    }

    /// Every node reachable along outgoing inheritance edges, nearest
    /// first. The node itself is never included, even on a cycle.
    pub fn ancestors_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        seen.insert(id);
        let mut ancestors = Vec::new();
        let mut queue = std::collections::VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for parent in self.direct_parents_of(current) {
                if seen.insert(parent) {
                    ancestors.push(parent);
                    queue.push_back(parent);
                }
            }
        }
        ancestors
    }

    /// Depth of inheritance: edges on the longest path to a node without
    /// parents. Nodes without inheritance edges, including unknown ids,
    /// have depth 0.
    pub fn depth(&self, id: NodeId) -> Result<u32, HierarchyError> {
        self.depths.get(&id).cloned().unwrap_or(Ok(0))
    }

    fn key(&self, id: NodeId) -> String {
        self.graph
            .node(id)
            .map(|n| n.key.clone())
            .unwrap_or_default()
    }

    fn depth_of(
        &self,
        id: NodeId,
        memo: &mut FxHashMap<NodeId, DepthState>,
        path: &mut Vec<NodeId>,
    ) -> Result<u32, HierarchyError> {
        match memo.get(&id) {
            Some(DepthState::Done(result)) => return result.clone(),
            Some(DepthState::Visiting) => {
                let start = path.iter().position(|p| *p == id).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|p| self.key(*p)).collect();
                cycle.push(self.key(id));
                return Err(HierarchyError::CyclicHierarchy {
                    key: self.key(id),
                    path: cycle,
                });
            }
            None => {}
        }

        memo.insert(id, DepthState::Visiting);
        path.push(id);

        let mut result = Ok(0);
        for parent in self.direct_parents_of(id) {
            match self.depth_of(parent, memo, path) {
                Ok(depth) => {
                    if let Ok(best) = &mut result {
                        *best = (*best).max(depth + 1);
                    }
                }
                Err(HierarchyError::CyclicHierarchy { path: cycle, .. }) => {
                    result = Err(HierarchyError::CyclicHierarchy {
                        key: self.key(id),
                        path: cycle,
                    });
                    break;
                }
            }
        }

        path.pop();
        memo.insert(id, DepthState::Done(result.clone()));
        result
    }
}
