//! Dependency graph over [`DeclId`]s: plain integer edges, no borrowed
//! references into the arena (spec.md §4.3 "DependencyGraph", edge A->B
//! iff A's definition textually references B).

use crate::resolver::type_map::DeclId;

#[derive(Debug, Default)]
pub struct DependencyGraph {
    adjacency: Vec<Vec<DeclId>>,
}

impl DependencyGraph {
    pub fn with_capacity(node_count: usize) -> Self {
        DependencyGraph {
            adjacency: vec![Vec::new(); node_count],
        }
    }

    pub fn add_edge(&mut self, from: DeclId, to: DeclId) {
        let edges = &mut self.adjacency[from.0 as usize];
        if !edges.contains(&to) {
            edges.push(to);
        }
    }

    pub fn neighbors(&self, id: DeclId) -> &[DeclId] {
        &self.adjacency[id.0 as usize]
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }
}
