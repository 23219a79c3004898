//! The product graph store.
//!
//! Products live in an arena keyed by [`ProductId`]; edges live in a
//! separate adjacency map from each product to the set of its direct
//! prerequisites. Both maps preserve insertion order, which the ordering
//! engine uses to break ties deterministically.
//!
//! # Edge Direction
//!
//! Edges point from **dependent to prerequisite**: if a plasmid needs a
//! primer, the plasmid's adjacency set contains the primer's id. Successor
//! lookups therefore scan every adjacency set.
//!
//! # Invariants
//!
//! - Every product has an adjacency entry (possibly empty), and every id in
//!   an adjacency set is a product in the arena.
//! - No product is its own prerequisite.

mod traversal;

pub use traversal::AllPrerequisites;

use crate::domain::{Product, ProductId};
use crate::error::{Error, Result};
use crate::order::{self, Cycle};
use crate::validate::{self, ValidationReport};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// A prerequisite argument to [`ProductGraph::add_product`] and
/// [`ProductGraph::add_dependency`].
///
/// `Existing` must name a product already in the graph. `New` carries a
/// product value which is registered as a leaf if its id is unknown, and
/// ignored in favour of the stored product otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prerequisite {
    /// A product already in the graph, by id
    Existing(ProductId),
    /// A product value, registered if absent
    New(Product),
}

impl Prerequisite {
    /// The id this prerequisite refers to.
    #[must_use]
    pub fn id(&self) -> ProductId {
        match self {
            Self::Existing(id) => *id,
            Self::New(product) => product.id(),
        }
    }
}

impl From<ProductId> for Prerequisite {
    fn from(id: ProductId) -> Self {
        Self::Existing(id)
    }
}

impl From<&ProductId> for Prerequisite {
    fn from(id: &ProductId) -> Self {
        Self::Existing(*id)
    }
}

impl From<Product> for Prerequisite {
    fn from(product: Product) -> Self {
        Self::New(product)
    }
}

/// In-memory dependency graph of products.
///
/// Equality compares products and prerequisite sets by id; insertion order
/// is not part of equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductGraph {
    nodes: IndexMap<ProductId, Product>,
    adjacency: IndexMap<ProductId, IndexSet<ProductId>>,
}

impl ProductGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Mutation ==========

    /// Register a product with no prerequisites, returning its id.
    ///
    /// Re-adding an existing id replaces the product and clears its
    /// prerequisites, exactly like [`add_product`](Self::add_product).
    pub fn add(&mut self, product: Product) -> ProductId {
        let id = product.id();
        self.insert(product, IndexSet::new());
        id
    }

    /// Register `product` with exactly the given prerequisites.
    ///
    /// An existing entry with the same id is overwritten (keeping its
    /// position in insertion order) and its old prerequisite set is
    /// discarded. Prerequisites passed by value that are not yet in the graph
    /// are registered as leaves. Nothing is modified if any argument is
    /// rejected.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if a [`Prerequisite::Existing`] id is unknown
    /// - [`Error::MalformedInput`] if `product` is listed as its own prerequisite
    pub fn add_product<I>(&mut self, product: Product, prerequisites: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Prerequisite>,
    {
        let id = product.id();
        let prerequisites: Vec<Prerequisite> = prerequisites.into_iter().map(Into::into).collect();

        // === Phase 1: validation (no mutations) ===
        for prerequisite in &prerequisites {
            let pre_id = prerequisite.id();
            if pre_id == id {
                tracing::warn!(product = %product.label(), "Rejected self-dependency");
                return Err(Error::MalformedInput(format!(
                    "{} cannot be its own prerequisite",
                    product.label()
                )));
            }
            if matches!(prerequisite, Prerequisite::Existing(_)) && !self.nodes.contains_key(&pre_id)
            {
                return Err(Error::NotFound(pre_id.to_string()));
            }
        }

        // === Phase 2: register stubs and edges ===
        let mut edges = IndexSet::with_capacity(prerequisites.len());
        for prerequisite in prerequisites {
            match prerequisite {
                Prerequisite::Existing(pre_id) => {
                    edges.insert(pre_id);
                }
                Prerequisite::New(stub) => {
                    let pre_id = stub.id();
                    if !self.nodes.contains_key(&pre_id) {
                        debug!(prerequisite = %stub.label(), "Registering prerequisite stub");
                        self.insert(stub, IndexSet::new());
                    }
                    edges.insert(pre_id);
                }
            }
        }

        debug!(product = %product.label(), prerequisites = edges.len(), "Adding product");
        self.insert(product, edges);
        Ok(())
    }

    /// Add prerequisites to a product, keeping the ones it already has.
    ///
    /// `product` may be an existing id or a product value; a value whose id
    /// is unknown is registered.
    ///
    /// # Errors
    ///
    /// Same as [`add_product`](Self::add_product), plus [`Error::NotFound`]
    /// when `product` is an unknown [`Prerequisite::Existing`] id.
    pub fn add_dependency<P, I>(&mut self, product: P, prerequisites: I) -> Result<()>
    where
        P: Into<Prerequisite>,
        I: IntoIterator,
        I::Item: Into<Prerequisite>,
    {
        let product = match product.into() {
            Prerequisite::Existing(id) => self
                .nodes
                .get(&id)
                .cloned()
                .ok_or_else(|| Error::NotFound(id.to_string()))?,
            Prerequisite::New(product) => product,
        };

        let current = self
            .adjacency
            .get(&product.id())
            .cloned()
            .unwrap_or_default();

        let combined = current
            .into_iter()
            .map(Prerequisite::Existing)
            .chain(prerequisites.into_iter().map(Into::into));
        self.add_product(product, combined)
    }

    /// Remove the given prerequisite edges from `product`.
    ///
    /// Unknown products and ids that are not prerequisites are ignored.
    /// Returns the number of edges removed.
    pub fn remove_dependencies<I>(&mut self, product: ProductId, prerequisites: I) -> usize
    where
        I: IntoIterator<Item = ProductId>,
    {
        let Some(edges) = self.adjacency.get_mut(&product) else {
            return 0;
        };
        let removed = prerequisites
            .into_iter()
            .filter(|pre| edges.shift_remove(pre))
            .count();
        debug!(product = %product, removed, "Removed dependencies");
        removed
    }

    /// Remove a product and every edge that points at it.
    ///
    /// The remaining products keep their relative insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the product does not exist.
    pub fn remove_product(&mut self, id: ProductId) -> Result<Product> {
        let product = self
            .nodes
            .shift_remove(&id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        self.adjacency.shift_remove(&id);

        let mut detached = 0usize;
        for edges in self.adjacency.values_mut() {
            if edges.shift_remove(&id) {
                detached += 1;
            }
        }

        debug!(product = %product.label(), detached, "Removed product");
        Ok(product)
    }

    fn insert(&mut self, product: Product, edges: IndexSet<ProductId>) {
        let id = product.id();
        self.nodes.insert(id, product);
        self.adjacency.insert(id, edges);
    }

    // ========== Lookup ==========

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.nodes.get(id)
    }

    /// Look up a product by id for in-place editing.
    ///
    /// The id and creation timestamp cannot be changed through this borrow.
    pub fn get_mut(&mut self, id: &ProductId) -> Option<&mut Product> {
        self.nodes.get_mut(id)
    }

    /// Whether a product with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All products in insertion order.
    pub fn products(&self) -> impl ExactSizeIterator<Item = &Product> + '_ {
        self.nodes.values()
    }

    /// Products whose name equals `name` exactly (case-sensitive), in
    /// insertion order.
    #[must_use]
    pub fn products_by_name(&self, name: &str) -> Vec<&Product> {
        self.nodes.values().filter(|p| p.name == name).collect()
    }

    /// Ids of the direct prerequisites of `id`, in the order they were added.
    #[must_use]
    pub fn prerequisite_ids(&self, id: &ProductId) -> Option<&IndexSet<ProductId>> {
        self.adjacency.get(id)
    }

    /// Direct prerequisites of a product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the product does not exist.
    pub fn prerequisites(&self, id: &ProductId) -> Result<Vec<&Product>> {
        let edges = self
            .adjacency
            .get(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(edges.iter().filter_map(|pre| self.nodes.get(pre)).collect())
    }

    /// Products that list `id` as a direct prerequisite, in insertion order.
    ///
    /// Scans every adjacency set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the product does not exist.
    pub fn successors(&self, id: &ProductId) -> Result<Vec<&Product>> {
        if !self.nodes.contains_key(id) {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(self
            .adjacency
            .iter()
            .filter(|(_, edges)| edges.contains(id))
            .filter_map(|(dependent, _)| self.nodes.get(dependent))
            .collect())
    }

    /// Every product reachable from `id` through prerequisite edges.
    ///
    /// Each product is yielded once, in depth-first discovery order. If `id`
    /// lies on a cycle it is reachable from itself and is yielded too. An
    /// unknown id yields nothing.
    #[must_use]
    pub fn all_prerequisites(&self, id: &ProductId) -> AllPrerequisites<'_> {
        AllPrerequisites::new(self, id)
    }

    /// Products that are nobody's prerequisite (the final deliverables), in
    /// insertion order.
    #[must_use]
    pub fn endpoints(&self) -> Vec<&Product> {
        let required: IndexSet<&ProductId> = self.adjacency.values().flatten().collect();
        self.nodes
            .iter()
            .filter(|(id, _)| !required.contains(id))
            .map(|(_, product)| product)
            .collect()
    }

    // ========== Ordering and validation ==========

    /// Every product, each after all of its prerequisites.
    ///
    /// Ties are broken by insertion order, so an unchanged graph always
    /// yields the same sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] carrying one concrete cycle if no
    /// order exists.
    pub fn order(&self) -> Result<Vec<&Product>> {
        let ids = self.order_ids()?;
        Ok(ids.iter().filter_map(|id| self.nodes.get(id)).collect())
    }

    /// Ids of [`order`](Self::order).
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] if no order exists.
    pub fn order_ids(&self) -> Result<Vec<ProductId>> {
        order::topological_order(&self.nodes, &self.adjacency)
    }

    /// Find one cycle, if the graph has any.
    ///
    /// # Errors
    ///
    /// Propagates ordering failures other than [`Error::CycleDetected`].
    pub fn find_cycle(&self) -> Result<Option<Cycle>> {
        match self.order_ids() {
            Ok(_) => Ok(None),
            Err(Error::CycleDetected { cycle }) => Ok(Some(cycle)),
            Err(e) => Err(e),
        }
    }

    /// Check the graph for cycles and target dates that precede a
    /// prerequisite's target date.
    ///
    /// # Errors
    ///
    /// Propagates ordering failures other than [`Error::CycleDetected`].
    pub fn validate(&self) -> Result<ValidationReport<'_>> {
        validate::validate(self)
    }
}
