use super::ProductGraph;
use crate::domain::{Product, ProductId};
use std::collections::HashSet;

/// Lazy depth-first walk over every transitive prerequisite of a product.
///
/// Created by [`ProductGraph::all_prerequisites`]. Nodes are marked visited
/// when pushed, so diamonds and cycles yield each product exactly once.
#[derive(Debug)]
pub struct AllPrerequisites<'a> {
    graph: &'a ProductGraph,
    stack: Vec<ProductId>,
    visited: HashSet<ProductId>,
}

impl<'a> AllPrerequisites<'a> {
    pub(super) fn new(graph: &'a ProductGraph, start: &ProductId) -> Self {
        let mut walk = Self {
            graph,
            stack: Vec::new(),
            visited: HashSet::new(),
        };
        walk.push_prerequisites_of(start);
        walk
    }

    fn push_prerequisites_of(&mut self, id: &ProductId) {
        let Some(edges) = self.graph.prerequisite_ids(id) else {
            return;
        };
        // Reversed so the first-added prerequisite is visited first
        for pre in edges.iter().rev() {
            if self.visited.insert(*pre) {
                self.stack.push(*pre);
            }
        }
    }
}

impl<'a> Iterator for AllPrerequisites<'a> {
    type Item = &'a Product;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            self.push_prerequisites_of(&id);
            if let Some(product) = self.graph.get(&id) {
                return Some(product);
            }
        }
        None
    }
}
