//! Scenario tests for schedule validation.

mod common;

use common::{add, day, three_cycle};
use labdag::domain::{Product, ProductId};
use labdag::graph::ProductGraph;
use rstest::{fixture, rstest};

/// P1 (Jan 30) <- P2 (Feb 15) <- P3 (Feb 1)
#[fixture]
fn plasmid_chain() -> (ProductGraph, [ProductId; 3]) {
    let mut graph = ProductGraph::new();
    let p1 = add(&mut graph, Product::new("Plasmid1").with_target(day(1, 30)), &[]);
    let p2 = add(
        &mut graph,
        Product::new("Plasmid2").with_target(day(2, 15)),
        &[p1],
    );
    let p3 = add(
        &mut graph,
        Product::new("Plasmid3").with_target(day(2, 1)),
        &[p2],
    );
    (graph, [p1, p2, p3])
}

#[rstest]
fn test_target_before_prerequisite_is_flagged(plasmid_chain: (ProductGraph, [ProductId; 3])) {
    let (graph, [_, _, p3]) = plasmid_chain;

    let report = graph.validate().unwrap();

    assert!(!report.valid);
    assert!(report.cycle.is_none());
    let flagged: Vec<ProductId> = report.invalid_dates.iter().map(|p| p.id()).collect();
    assert_eq!(flagged, vec![p3]);
}

#[rstest]
fn test_undated_middle_product_does_not_bridge_dates(
    plasmid_chain: (ProductGraph, [ProductId; 3]),
) {
    let (mut graph, [_, p2, _]) = plasmid_chain;
    graph.get_mut(&p2).unwrap().target = None;

    let report = graph.validate().unwrap();

    // P3 (Feb 1) is still after P1 (Jan 30), P2 no longer constrains it
    assert!(report.invalid_dates.is_empty());
    assert!(report.valid);
}

#[rstest]
fn test_transitive_conflict_is_flagged(plasmid_chain: (ProductGraph, [ProductId; 3])) {
    let (mut graph, [p1, _, _]) = plasmid_chain;
    graph.get_mut(&p1).unwrap().target = Some(day(3, 1));

    let report = graph.validate().unwrap();
    let flagged: Vec<&str> = report.invalid_dates.iter().map(|p| p.name.as_str()).collect();

    assert_eq!(flagged, ["Plasmid2", "Plasmid3"]);
}

#[test]
fn test_three_cycle_with_dates_reports_both() {
    let (mut graph, [a, b, c]) = three_cycle();
    graph.get_mut(&a).unwrap().target = Some(day(1, 1));
    graph.get_mut(&b).unwrap().target = Some(day(6, 1));

    let report = graph.validate().unwrap();

    assert!(!report.valid);
    let cycle = report.cycle.as_ref().unwrap();
    assert_eq!(cycle.ids().collect::<Vec<_>>(), vec![a, b, c]);

    // A needs B (June) by January; B needs C -> A (January) by June, fine
    let flagged: Vec<ProductId> = report.invalid_dates.iter().map(|p| p.id()).collect();
    assert_eq!(flagged, vec![a]);
}

#[test]
fn test_report_serializes_for_scripting() {
    let (graph, _) = three_cycle();
    let report = graph.validate().unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["cycle"].as_array().unwrap().len(), 3);
    assert_eq!(json["cycle"][0]["name"], "A");
}
