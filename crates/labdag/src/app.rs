//! Application context for shell command execution.
//!
//! This module provides the `App` struct that owns the live product graph,
//! remembers which file it belongs to, and tracks unsaved changes.
//!
//! # Example
//!
//! ```no_run
//! use labdag::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut app = App::open(Some(Path::new("lab.jsonl"))).await?;
//!     // Execute commands using app...
//!     app.save(None).await?;
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::graph::ProductGraph;
use crate::storage::{load_from_jsonl, save_to_jsonl};
use std::path::{Path, PathBuf};

/// Application context for shell operations.
#[derive(Debug, Default)]
pub struct App {
    /// The live graph
    graph: ProductGraph,

    /// File used by `load`/`save` when no path is given
    data_file: Option<PathBuf>,

    /// Whether the graph changed since it was loaded or saved
    dirty: bool,
}

impl App {
    /// Create an App with an empty graph and no data file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an App around an existing graph.
    pub fn with_graph(graph: ProductGraph, data_file: Option<PathBuf>) -> Self {
        Self {
            graph,
            data_file,
            dirty: false,
        }
    }

    /// Create an App bound to `data_file`.
    ///
    /// An existing file is loaded; a missing one starts an empty graph that
    /// will be written there on the first save.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(data_file: Option<&Path>) -> Result<Self> {
        let Some(path) = data_file else {
            return Ok(Self::new());
        };

        if tokio::fs::try_exists(path).await? {
            let graph = load_from_jsonl(path).await?;
            Ok(Self::with_graph(graph, Some(path.to_path_buf())))
        } else {
            tracing::info!(path = %path.display(), "Data file not found, starting empty");
            Ok(Self::with_graph(ProductGraph::new(), Some(path.to_path_buf())))
        }
    }

    /// Get an immutable reference to the graph.
    pub fn graph(&self) -> &ProductGraph {
        &self.graph
    }

    /// Get a mutable reference to the graph.
    ///
    /// Edits made through it are not tracked; call
    /// [`mark_changed`](Self::mark_changed) once they took effect.
    pub fn graph_mut(&mut self) -> &mut ProductGraph {
        &mut self.graph
    }

    /// Record that the graph differs from its data file.
    pub fn mark_changed(&mut self) {
        self.dirty = true;
    }

    /// Get the current data file, if any.
    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    /// Whether the graph changed since it was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the graph with the contents of a file.
    ///
    /// Uses the current data file when `path` is `None`. On success the file
    /// becomes the data file; on failure the current graph is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no path is known, or the load error.
    pub async fn load(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let path = self.target_path(path)?;
        let graph = load_from_jsonl(&path).await?;
        self.graph = graph;
        self.data_file = Some(path.clone());
        self.dirty = false;
        Ok(path)
    }

    /// Save the graph to a file.
    ///
    /// Uses the current data file when `path` is `None`. On success the file
    /// becomes the data file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no path is known, or the save error.
    pub async fn save(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let path = self.target_path(path)?;
        save_to_jsonl(&self.graph, &path).await?;
        self.data_file = Some(path.clone());
        self.dirty = false;
        Ok(path)
    }

    fn target_path(&self, path: Option<&Path>) -> Result<PathBuf> {
        path.or(self.data_file.as_deref())
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::Config("no file given and no data_file configured".to_string()))
    }
}
