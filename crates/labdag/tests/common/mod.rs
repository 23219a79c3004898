//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use labdag::domain::{Product, ProductId};
use labdag::graph::ProductGraph;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Shorthand for a date in 2024.
pub fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

/// Add a product with the given prerequisites, returning its id.
pub fn add(graph: &mut ProductGraph, product: Product, prerequisites: &[ProductId]) -> ProductId {
    let id = product.id();
    graph
        .add_product(product, prerequisites.iter().copied())
        .unwrap();
    id
}

/// Diamond: B and C need A, D needs B and C.
pub struct Diamond {
    pub graph: ProductGraph,
    pub a: ProductId,
    pub b: ProductId,
    pub c: ProductId,
    pub d: ProductId,
}

pub fn diamond() -> Diamond {
    let mut graph = ProductGraph::new();
    let a = add(&mut graph, Product::new("A"), &[]);
    let b = add(&mut graph, Product::new("B"), &[a]);
    let c = add(&mut graph, Product::new("C"), &[a]);
    let d = add(&mut graph, Product::new("D"), &[b, c]);
    Diamond { graph, a, b, c, d }
}

/// A -> B -> C -> A, each needing the next.
pub fn three_cycle() -> (ProductGraph, [ProductId; 3]) {
    let mut graph = ProductGraph::new();
    let a = add(&mut graph, Product::new("A"), &[]);
    let b = add(&mut graph, Product::new("B"), &[]);
    let c = add(&mut graph, Product::new("C"), &[]);
    graph.add_dependency(a, [b]).unwrap();
    graph.add_dependency(b, [c]).unwrap();
    graph.add_dependency(c, [a]).unwrap();
    (graph, [a, b, c])
}

/// Whether consecutive ids (wrapping around) are all prerequisite edges.
pub fn is_real_cycle(graph: &ProductGraph, ids: &[ProductId]) -> bool {
    !ids.is_empty()
        && ids.iter().enumerate().all(|(i, id)| {
            let next = ids[(i + 1) % ids.len()];
            graph
                .prerequisite_ids(id)
                .is_some_and(|edges| edges.contains(&next))
        })
}

/// Run the labdag binary in `dir` with empty stdin.
pub fn run_labdag_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_labdag"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute labdag binary")
}
