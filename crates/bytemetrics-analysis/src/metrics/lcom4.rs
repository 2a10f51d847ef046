//! LCOM4: connected components of the member cohesion graph.

use bytemetrics_core::types::{FxHashMap, FxHashSet};

use crate::classfile::{field_id, method_id, DecodedUnit};

/// Undirected graph over member identifiers.
#[derive(Debug, Clone, Default)]
pub struct CohesionGraph {
    members: Vec<String>,
    positions: FxHashMap<String, usize>,
    links: Vec<(usize, usize)>,
}

impl CohesionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member, returning its position. Re-adding is a no-op.
    pub fn add_member(&mut self, id: impl Into<String>) -> usize {
        let id = id.into();
        if let Some(&pos) = self.positions.get(&id) {
            return pos;
        }
        let pos = self.members.len();
        self.positions.insert(id.clone(), pos);
        self.members.push(id);
        pos
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Link two existing members. Unknown identifiers are ignored.
    pub fn link(&mut self, a: &str, b: &str) {
        if let (Some(&x), Some(&y)) = (self.positions.get(a), self.positions.get(b)) {
            self.links.push((x, y));
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Connected components, each sorted, ordered by their first member.
    pub fn components(&self) -> Vec<Vec<String>> {
        let mut sets = DisjointSet::new(self.members.len());
        for &(a, b) in &self.links {
            sets.union(a, b);
        }

        let mut groups: FxHashMap<usize, Vec<String>> = FxHashMap::default();
        for (pos, member) in self.members.iter().enumerate() {
            groups.entry(sets.find(pos)).or_default().push(member.clone());
        }
        let mut components: Vec<Vec<String>> = groups
            .into_values()
            .map(|mut group| {
                group.sort();
                group
            })
            .collect();
        components.sort();
        components
    }
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Build the cohesion graph of `units`: declared fields and methods, with a
/// link from each method to the own fields it touches and the own methods
/// it invokes.
pub fn cohesion_graph(units: &[&DecodedUnit]) -> CohesionGraph {
    let mut graph = CohesionGraph::new();
    for unit in units {
        for id in unit.field_ids() {
            graph.add_member(id);
        }
        for id in unit.method_ids() {
            graph.add_member(id);
        }
    }

    for unit in units {
        for method in &unit.methods {
            let Some(body) = &method.body else { continue };
            let site = method_id(&unit.key, &method.name, &method.descriptor);
            let mut touched: FxHashSet<String> = FxHashSet::default();
            for access in &body.field_accesses {
                touched.insert(field_id(&access.owner, &access.name));
            }
            for call in &body.invocations {
                touched.insert(call.method_id());
            }
            for member in touched {
                if graph.contains(&member) {
                    graph.link(&site, &member);
                }
            }
        }
    }
    graph
}

/// LCOM4 value and its blocks. Zero members count as one component; blocks
/// are only reported when the value exceeds one.
pub fn lcom4(units: &[&DecodedUnit]) -> (u32, Vec<Vec<String>>) {
    let components = cohesion_graph(units).components();
    let value = components.len().max(1) as u32;
    if value > 1 {
        (value, components)
    } else {
        (value, Vec::new())
    }
}
