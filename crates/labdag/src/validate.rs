//! Schedule validation.

use crate::domain::Product;
use crate::error::{Error, Result};
use crate::graph::ProductGraph;
use crate::order::Cycle;
use serde::Serialize;

/// Outcome of [`validate`].
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport<'a> {
    /// True iff there is no cycle and no date conflict
    pub valid: bool,

    /// One concrete cycle, if the graph has any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<Cycle>,

    /// Products whose target precedes the target of some transitive
    /// prerequisite, in insertion order
    pub invalid_dates: Vec<&'a Product>,
}

/// Check a graph for cycles and impossible target dates.
///
/// A product's target is invalid when any transitive prerequisite has a
/// strictly later target. Products without a target are never flagged and
/// never constrain others. Dates are checked even when the graph is cyclic.
///
/// # Errors
///
/// Propagates ordering failures other than a detected cycle.
pub fn validate(graph: &ProductGraph) -> Result<ValidationReport<'_>> {
    let cycle = match graph.order_ids() {
        Ok(_) => None,
        Err(Error::CycleDetected { cycle }) => Some(cycle),
        Err(e) => return Err(e),
    };

    let invalid_dates: Vec<&Product> = graph
        .products()
        .filter(|product| {
            let Some(target) = product.target else {
                return false;
            };
            graph
                .all_prerequisites(&product.id())
                .filter_map(|pre| pre.target)
                .max()
                .is_some_and(|latest| latest > target)
        })
        .collect();

    if let Some(cycle) = &cycle {
        tracing::info!(%cycle, "Validation found a cycle");
    }
    for product in &invalid_dates {
        tracing::debug!(product = %product.label(), "Target precedes a prerequisite");
    }

    Ok(ValidationReport {
        valid: cycle.is_none() && invalid_dates.is_empty(),
        cycle,
        invalid_dates,
    })
}
