//! Deterministic topological ordering and cycle extraction.
//!
//! Ordering uses Kahn's algorithm with a min-heap of insertion indices as the
//! ready set: whenever several products are ready, the one added earliest is
//! emitted first. When no order exists, a single concrete cycle is extracted
//! from the products left over.

use crate::domain::{Product, ProductId};
use crate::error::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;

/// One product on a [`Cycle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleMember {
    /// Product identifier
    pub id: ProductId,
    /// Product name at the time the cycle was found
    pub name: String,
}

/// A closed chain of prerequisite edges.
///
/// Each member depends on the next one, and the last member depends on the
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cycle {
    members: Vec<CycleMember>,
}

impl Cycle {
    /// The members in dependency order.
    #[must_use]
    pub fn members(&self) -> &[CycleMember] {
        &self.members
    }

    /// Member identifiers in dependency order.
    pub fn ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.members.iter().map(|m| m.id)
    }

    /// Number of distinct products on the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a cycle produced by ordering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `id` lies on the cycle.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.members.iter().any(|m| m.id == *id)
    }
}

impl fmt::Display for Cycle {
    /// Renders as `A (1a2b3c4d) -> B (5e6f7a8b) -> A (1a2b3c4d)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.members.first() else {
            return Ok(());
        };
        for member in &self.members {
            write!(f, "{} ({}) -> ", member.name, member.id.short())?;
        }
        write!(f, "{} ({})", first.name, first.id.short())
    }
}

/// Order every product after all of its prerequisites.
///
/// `adjacency` maps each product to its direct prerequisites. Edges naming
/// ids absent from `nodes` are ignored.
///
/// # Errors
///
/// Returns [`Error::CycleDetected`] if the prerequisite relation is cyclic.
pub fn topological_order(
    nodes: &IndexMap<ProductId, Product>,
    adjacency: &IndexMap<ProductId, IndexSet<ProductId>>,
) -> Result<Vec<ProductId>> {
    let count = nodes.len();

    // Prerequisite edges by insertion index
    let prerequisites: Vec<Vec<usize>> = nodes
        .keys()
        .map(|id| {
            adjacency
                .get(id)
                .into_iter()
                .flatten()
                .filter_map(|pre| nodes.get_index_of(pre))
                .collect()
        })
        .collect();

    let mut remaining: Vec<usize> = prerequisites.iter().map(Vec::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (index, pres) in prerequisites.iter().enumerate() {
        for &pre in pres {
            dependents[pre].push(index);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = remaining
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut order = Vec::with_capacity(count);
    while let Some(Reverse(index)) = ready.pop() {
        order.push(index);
        for &dependent in &dependents[index] {
            remaining[dependent] -= 1;
            if remaining[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    if order.len() == count {
        return Ok(order
            .into_iter()
            .filter_map(|index| nodes.get_index(index).map(|(id, _)| *id))
            .collect());
    }

    let residual: Vec<bool> = remaining.iter().map(|degree| *degree > 0).collect();
    tracing::debug!(
        ordered = order.len(),
        blocked = count - order.len(),
        "Ordering blocked by a cycle"
    );

    let path = (0..count)
        .filter(|index| residual[*index])
        .find_map(|start| shortest_cycle_through(start, &prerequisites, &residual))
        .ok_or_else(|| {
            Error::MalformedInput("ordering stalled without a cycle".to_string())
        })?;

    let members = path
        .into_iter()
        .filter_map(|index| nodes.get_index(index))
        .map(|(id, product)| CycleMember {
            id: *id,
            name: product.name.clone(),
        })
        .collect();

    Err(Error::CycleDetected {
        cycle: Cycle { members },
    })
}

/// Breadth-first search for the shortest chain of prerequisite edges leading
/// from `start` back to itself, staying inside the residual subgraph.
///
/// Returns the path starting at `start`, without repeating it at the end.
fn shortest_cycle_through(
    start: usize,
    prerequisites: &[Vec<usize>],
    residual: &[bool],
) -> Option<Vec<usize>> {
    let mut parent: Vec<Option<usize>> = vec![None; prerequisites.len()];
    let mut seen = vec![false; prerequisites.len()];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;

    while let Some(current) = queue.pop_front() {
        for &next in &prerequisites[current] {
            if !residual[next] {
                continue;
            }
            if next == start {
                let mut path = vec![current];
                let mut node = current;
                while let Some(previous) = parent[node] {
                    path.push(previous);
                    node = previous;
                }
                path.reverse();
                return Some(path);
            }
            if !seen[next] {
                seen[next] = true;
                parent[next] = Some(current);
                queue.push_back(next);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        nodes: IndexMap<ProductId, Product>,
        adjacency: IndexMap<ProductId, IndexSet<ProductId>>,
        ids: Vec<ProductId>,
    }

    /// Products named `names`, with `edges` as (dependent, prerequisite) index pairs.
    fn fixture(names: &[&str], edges: &[(usize, usize)]) -> Fixture {
        let mut nodes = IndexMap::new();
        let mut adjacency = IndexMap::new();
        let mut ids = Vec::new();
        for name in names {
            let product = Product::new(*name);
            ids.push(product.id());
            adjacency.insert(product.id(), IndexSet::new());
            nodes.insert(product.id(), product);
        }
        for &(dependent, pre) in edges {
            adjacency[&ids[dependent]].insert(ids[pre]);
        }
        Fixture {
            nodes,
            adjacency,
            ids,
        }
    }

    fn names(fixture: &Fixture, order: &[ProductId]) -> Vec<String> {
        order
            .iter()
            .map(|id| fixture.nodes[id].name.clone())
            .collect()
    }

    #[test]
    fn test_empty_graph_orders_to_nothing() {
        let f = fixture(&[], &[]);
        assert!(topological_order(&f.nodes, &f.adjacency).unwrap().is_empty());
    }

    #[test]
    fn test_independent_products_keep_insertion_order() {
        let f = fixture(&["C", "A", "B"], &[]);
        let order = topological_order(&f.nodes, &f.adjacency).unwrap();
        assert_eq!(names(&f, &order), ["C", "A", "B"]);
    }

    #[test]
    fn test_prerequisites_come_first() {
        // Plasmid2 needs Plasmid1, Plasmid1 needs Primer
        let f = fixture(&["Plasmid2", "Plasmid1", "Primer"], &[(0, 1), (1, 2)]);
        let order = topological_order(&f.nodes, &f.adjacency).unwrap();
        assert_eq!(names(&f, &order), ["Primer", "Plasmid1", "Plasmid2"]);
    }

    #[test]
    fn test_ready_ties_break_by_insertion_index() {
        // D needs B and C; B and C need A; E is free
        let f = fixture(
            &["D", "C", "B", "A", "E"],
            &[(0, 2), (0, 1), (2, 3), (1, 3)],
        );
        let order = topological_order(&f.nodes, &f.adjacency).unwrap();
        assert_eq!(names(&f, &order), ["A", "C", "B", "D", "E"]);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let f = fixture(&["A", "B", "C", "D"], &[(3, 0), (1, 2), (3, 1)]);
        let first = topological_order(&f.nodes, &f.adjacency).unwrap();
        let second = topological_order(&f.nodes, &f.adjacency).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_two_cycle_is_reported_with_both_members() {
        let f = fixture(&["A", "B"], &[(0, 1), (1, 0)]);
        let err = topological_order(&f.nodes, &f.adjacency).unwrap_err();
        let cycle = err.cycle().unwrap();

        assert_eq!(cycle.ids().collect::<Vec<_>>(), vec![f.ids[0], f.ids[1]]);
    }

    #[test]
    fn test_cycle_excludes_products_merely_downstream() {
        // Free -> (none); X needs A; A <-> B cycle; Y needs X
        let f = fixture(
            &["Free", "X", "A", "B", "Y"],
            &[(1, 2), (2, 3), (3, 2), (4, 1)],
        );
        let err = topological_order(&f.nodes, &f.adjacency).unwrap_err();
        let cycle = err.cycle().unwrap();

        assert_eq!(cycle.len(), 2);
        assert!(cycle.contains(&f.ids[2]));
        assert!(cycle.contains(&f.ids[3]));
        assert!(!cycle.contains(&f.ids[1]));
        assert!(!cycle.contains(&f.ids[4]));
    }

    #[test]
    fn test_reported_cycle_follows_edges() {
        // A needs B, B needs C, C needs A, plus a chord A needs C
        let f = fixture(&["A", "B", "C"], &[(0, 1), (1, 2), (2, 0), (0, 2)]);
        let err = topological_order(&f.nodes, &f.adjacency).unwrap_err();
        let ids: Vec<ProductId> = err.cycle().unwrap().ids().collect();

        for (i, id) in ids.iter().enumerate() {
            let next = ids[(i + 1) % ids.len()];
            assert!(f.adjacency[id].contains(&next), "missing edge in reported cycle");
        }
        // The chord gives the shorter cycle A -> C -> A
        assert_eq!(ids, vec![f.ids[0], f.ids[2]]);
    }

    #[test]
    fn test_cycle_display_closes_the_loop() {
        let f = fixture(&["A", "B"], &[(0, 1), (1, 0)]);
        let err = topological_order(&f.nodes, &f.adjacency).unwrap_err();
        let shown = err.cycle().unwrap().to_string();

        let a = f.ids[0].short();
        let b = f.ids[1].short();
        assert_eq!(shown, format!("A ({a}) -> B ({b}) -> A ({a})"));
        assert!(err.to_string().starts_with("Cycle detected: A ("));
    }
}
