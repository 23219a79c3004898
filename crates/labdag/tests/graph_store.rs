//! Integration tests for the product graph store.
//!
//! These tests cover registration, edge maintenance, removal and the
//! read-only queries used by the shell and the validator.

mod common;

use common::{add, diamond};
use labdag::domain::{Product, ProductId, Status};
use labdag::error::Error;
use labdag::graph::{Prerequisite, ProductGraph};
use std::collections::HashSet;

fn names(products: &[&Product]) -> Vec<String> {
    products.iter().map(|p| p.name.clone()).collect()
}

// ========== Registration ==========

#[test]
fn test_same_name_products_are_distinct() {
    let mut graph = ProductGraph::new();
    let first = add(&mut graph, Product::new("Plasmid1"), &[]);
    let second = add(&mut graph, Product::new("Plasmid1"), &[]);

    assert_ne!(first, second);
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.products_by_name("Plasmid1").len(), 2);
}

#[test]
fn test_prerequisite_values_become_leaf_stubs() {
    let mut graph = ProductGraph::new();
    let primer = Product::new("Primer");
    let backbone = Product::new("Backbone");
    let primer_id = primer.id();
    let plasmid = Product::new("Plasmid");
    let plasmid_id = plasmid.id();

    graph
        .add_product(
            plasmid,
            [Prerequisite::from(primer), Prerequisite::from(backbone)],
        )
        .unwrap();

    assert_eq!(graph.len(), 3);
    assert_eq!(
        names(&graph.prerequisites(&plasmid_id).unwrap()),
        ["Primer", "Backbone"]
    );
    assert!(graph.prerequisites(&primer_id).unwrap().is_empty());
}

#[test]
fn test_failed_add_leaves_graph_unchanged() {
    let mut graph = ProductGraph::new();
    add(&mut graph, Product::new("A"), &[]);
    let before = graph.clone();

    let err = graph
        .add_product(
            Product::new("B"),
            [Prerequisite::New(Product::new("Stub")), ProductId::new().into()],
        )
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(graph, before);
    assert!(graph.products_by_name("Stub").is_empty());
}

#[test]
fn test_edit_in_place_through_get_mut() {
    let mut graph = ProductGraph::new();
    let id = add(&mut graph, Product::new("Cells"), &[]);

    let product = graph.get_mut(&id).unwrap();
    product.status = Status::InProgress;
    product.name = "HEK293 cells".to_string();
    product.resources.push("incubator 2".to_string());

    let stored = graph.get(&id).unwrap();
    assert_eq!(stored.status, Status::InProgress);
    assert_eq!(stored.name, "HEK293 cells");
    assert_eq!(stored.resources, ["incubator 2"]);
    assert_eq!(stored.id(), id);
}

// ========== Removal ==========

#[test]
fn test_remove_product_purges_every_edge() {
    let mut d = diamond();

    d.graph.remove_product(d.a).unwrap();

    assert!(!d.graph.contains(&d.a));
    assert!(d.graph.products().all(|p| p.id() != d.a));
    for product in d.graph.products() {
        assert!(!d.graph.prerequisite_ids(&product.id()).unwrap().contains(&d.a));
    }
    // Edges not touching A survive
    let pres: HashSet<ProductId> = d
        .graph
        .prerequisite_ids(&d.d)
        .unwrap()
        .iter()
        .copied()
        .collect();
    assert_eq!(pres, HashSet::from([d.b, d.c]));
}

#[test]
fn test_remove_leaf_dependent_keeps_other_edges() {
    let mut d = diamond();
    let before_b = d.graph.prerequisite_ids(&d.b).unwrap().clone();
    let before_c = d.graph.prerequisite_ids(&d.c).unwrap().clone();

    d.graph.remove_product(d.d).unwrap();

    assert_eq!(d.graph.prerequisite_ids(&d.b).unwrap(), &before_b);
    assert_eq!(d.graph.prerequisite_ids(&d.c).unwrap(), &before_c);
    assert_eq!(d.graph.len(), 3);
}

#[test]
fn test_remove_keeps_relative_insertion_order() {
    let mut d = diamond();
    d.graph.remove_product(d.b).unwrap();

    let order: Vec<ProductId> = d.graph.products().map(Product::id).collect();
    assert_eq!(order, vec![d.a, d.c, d.d]);
}

#[test]
fn test_remove_dependencies_is_subtractive() {
    let mut d = diamond();

    let removed = d.graph.remove_dependencies(d.d, [d.b, d.a]);

    assert_eq!(removed, 1);
    assert_eq!(names(&d.graph.prerequisites(&d.d).unwrap()), ["C"]);
    assert!(d.graph.contains(&d.b));
}

// ========== Queries ==========

#[test]
fn test_all_prerequisites_on_diamond() {
    let d = diamond();

    let walked: Vec<ProductId> = d.graph.all_prerequisites(&d.d).map(Product::id).collect();
    let unique: HashSet<ProductId> = walked.iter().copied().collect();

    assert_eq!(walked.len(), 3);
    assert_eq!(unique, HashSet::from([d.a, d.b, d.c]));
}

#[test]
fn test_all_prerequisites_is_lazy() {
    let d = diamond();
    let first = d.graph.all_prerequisites(&d.d).next().unwrap();
    assert_eq!(first.id(), d.b);
}

#[test]
fn test_successors_and_endpoints() {
    let d = diamond();

    assert_eq!(names(&d.graph.successors(&d.a).unwrap()), ["B", "C"]);
    assert_eq!(names(&d.graph.endpoints()), ["D"]);
}

#[test]
fn test_lookups_on_unknown_ids() {
    let d = diamond();
    let unknown = ProductId::new();

    assert!(d.graph.get(&unknown).is_none());
    assert!(matches!(d.graph.prerequisites(&unknown), Err(Error::NotFound(_))));
    assert!(matches!(d.graph.successors(&unknown), Err(Error::NotFound(_))));
    assert_eq!(d.graph.all_prerequisites(&unknown).count(), 0);
    assert!(d.graph.products_by_name("nobody").is_empty());
}
