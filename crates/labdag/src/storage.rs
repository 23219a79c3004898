//! JSONL persistence for product graphs.
//!
//! Each line is one [`ProductRecord`]: the product's fields plus the ids of
//! its direct prerequisites. Records are written in topological order (so a
//! file reads top-down from raw materials to deliverables) and replaced
//! atomically through `labdag-jsonl`.

use crate::domain::{Product, ProductId};
use crate::error::{Error, Result};
use crate::graph::ProductGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// On-disk form of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// The product's own fields
    #[serde(flatten)]
    pub product: Product,

    /// Direct prerequisite ids, in the order they were added
    #[serde(default)]
    pub prerequisites: Vec<ProductId>,
}

impl From<labdag_jsonl::Error> for Error {
    fn from(e: labdag_jsonl::Error) -> Self {
        match e {
            labdag_jsonl::Error::Io(io_err) => Error::Io(io_err),
            other => Error::MalformedInput(other.to_string()),
        }
    }
}

/// Build a graph from a JSONL file.
///
/// Products are registered in file order first; edges are added in a second
/// pass so a record may name prerequisites that appear later in the file.
/// Either the whole file loads or nothing is returned.
///
/// # Errors
///
/// - [`Error::Io`] if the file cannot be read
/// - [`Error::MalformedInput`] for an unparsable line, a duplicate product id,
///   a prerequisite id that names no product, or a product listed as its own
///   prerequisite
pub async fn load_from_jsonl(path: &Path) -> Result<ProductGraph> {
    let records: Vec<ProductRecord> = labdag_jsonl::read_jsonl(path).await?;
    let graph = graph_from_records(records)?;
    info!(path = %path.display(), products = graph.len(), "Loaded products");
    Ok(graph)
}

/// Rebuild a graph from records, validating every reference.
///
/// # Errors
///
/// See [`load_from_jsonl`].
pub fn graph_from_records(records: Vec<ProductRecord>) -> Result<ProductGraph> {
    let mut graph = ProductGraph::new();
    let mut edges = Vec::with_capacity(records.len());

    // First pass: nodes
    for ProductRecord {
        product,
        prerequisites,
    } in records
    {
        let id = product.id();
        if graph.contains(&id) {
            return Err(Error::MalformedInput(format!("duplicate product id {id}")));
        }
        if prerequisites.contains(&id) {
            return Err(Error::MalformedInput(format!(
                "{} lists itself as a prerequisite",
                product.label()
            )));
        }
        graph.add(product);
        edges.push((id, prerequisites));
    }

    // Second pass: edges
    for (id, prerequisites) in edges {
        if prerequisites.is_empty() {
            continue;
        }
        if let Some(missing) = prerequisites.iter().find(|pre| !graph.contains(pre)) {
            return Err(Error::MalformedInput(format!(
                "product {id} lists unknown prerequisite {missing}"
            )));
        }
        graph.add_dependency(id, prerequisites)?;
    }

    Ok(graph)
}

/// Records for every product, in the order they are saved.
///
/// Topological order when one exists, insertion order when the graph has a
/// cycle.
///
/// # Errors
///
/// Propagates ordering failures other than a detected cycle.
pub fn records_for(graph: &ProductGraph) -> Result<Vec<ProductRecord>> {
    let ids = match graph.order_ids() {
        Ok(ids) => ids,
        Err(Error::CycleDetected { cycle }) => {
            tracing::warn!(%cycle, "Saving cyclic graph in insertion order");
            graph.products().map(Product::id).collect()
        }
        Err(e) => return Err(e),
    };

    let mut seen = HashSet::with_capacity(ids.len());
    Ok(ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| {
            let product = graph.get(&id)?.clone();
            let prerequisites = graph
                .prerequisite_ids(&id)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default();
            Some(ProductRecord {
                product,
                prerequisites,
            })
        })
        .collect())
}

/// Atomically write a graph to a JSONL file.
///
/// Saving an unchanged graph twice produces byte-identical files.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written, or
/// [`Error::MalformedInput`] if a record fails to serialize.
pub async fn save_to_jsonl(graph: &ProductGraph, path: &Path) -> Result<()> {
    let records = records_for(graph)?;
    let count = records.len();
    labdag_jsonl::write_jsonl_atomic(path, &records).await?;
    info!(path = %path.display(), products = count, "Saved products");
    Ok(())
}
