//! Domain types for product tracking.
//!
//! A [`Product`] is a trackable deliverable (a plasmid, a cell line, a
//! protocol) identified by a random [`ProductId`]. Names are labels only:
//! several products may share one.

mod date;
mod status;

pub use date::{parse_target_date, TARGET_DATE_FORMATS};
pub use status::Status;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Number of trailing identifier characters shown in compact displays.
pub const SHORT_ID_LEN: usize = 8;

/// Unique, immutable identifier of a product.
///
/// Generated from a v4 UUID at construction and never derived from the
/// product's name, so renaming a product never changes its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Last [`SHORT_ID_LEN`] hex digits, enough to tell same-named products apart.
    #[must_use]
    pub fn short(&self) -> String {
        let full = self.0.simple().to_string();
        full[full.len() - SHORT_ID_LEN..].to_string()
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A node of the dependency graph.
///
/// The identifier and creation timestamp are fixed at construction; every
/// other field may be edited in place through
/// [`ProductGraph::get_mut`](crate::graph::ProductGraph::get_mut).
/// Equality compares all fields, including identifier and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,

    /// Display name (not required to be unique)
    pub name: String,

    /// Progress state
    #[serde(default)]
    pub status: Status,

    /// Intended completion date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NaiveDate>,

    created_at: DateTime<Utc>,

    /// Free-text notes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Free-text description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Ordered resource references (file paths, URLs, sample IDs)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

impl Product {
    /// Create a product with a fresh identifier, stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_identity(ProductId::new(), Utc::now(), name)
    }

    /// Create a product with a known identity, as when rebuilding from storage.
    pub fn with_identity(
        id: ProductId,
        created_at: DateTime<Utc>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            status: Status::default(),
            target: None,
            created_at,
            notes: String::new(),
            description: String::new(),
            resources: Vec::new(),
        }
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the target date.
    #[must_use]
    pub fn with_target(mut self, target: NaiveDate) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a resource reference.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resources.push(resource.into());
        self
    }

    /// The product's identifier.
    #[must_use]
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// When the product was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Name plus short identifier, e.g. `Plasmid1 (3f9c0a1b)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.id.short())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label(), self.status)?;
        if let Some(target) = self.target {
            write!(f, " due {}", target.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}
