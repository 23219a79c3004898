//! Schedule charts: a text Gantt chart and Graphviz DOT export.
//!
//! The Gantt layout gives every product one column. A product starts in the
//! column after the latest of its direct prerequisites, so reading left to
//! right follows the order in which work can happen.

use crate::domain::{Product, ProductId, Status};
use crate::error::Result;
use crate::graph::ProductGraph;
use crate::output::color::colorize_bar;
use crate::output::OutputConfig;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::io::{self, Write};

/// One bar of a [`GanttChart`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttRow<'a> {
    /// The scheduled product
    pub product: &'a Product,
    /// First column occupied (0-based)
    pub start: usize,
    /// One past the last column occupied
    pub end: usize,
}

/// Column layout of a graph's products, in topological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttChart<'a> {
    rows: Vec<GanttRow<'a>>,
}

impl<'a> GanttChart<'a> {
    /// Lay out every product of an acyclic graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`](crate::error::Error::CycleDetected)
    /// if the graph has a cycle.
    pub fn layout(graph: &'a ProductGraph) -> Result<Self> {
        let order = graph.order()?;
        let mut ends: HashMap<ProductId, usize> = HashMap::with_capacity(order.len());
        let mut rows = Vec::with_capacity(order.len());

        for product in order {
            let start = graph
                .prerequisite_ids(&product.id())
                .into_iter()
                .flatten()
                .filter_map(|pre| ends.get(pre).copied())
                .max()
                .unwrap_or(0);
            let end = start + 1;
            ends.insert(product.id(), end);
            rows.push(GanttRow {
                product,
                start,
                end,
            });
        }

        Ok(Self { rows })
    }

    /// Rows in topological order.
    #[must_use]
    pub fn rows(&self) -> &[GanttRow<'a>] {
        &self.rows
    }

    /// Number of columns the chart spans.
    #[must_use]
    pub fn span(&self) -> usize {
        self.rows.iter().map(|row| row.end).max().unwrap_or(0)
    }

    /// Write the chart as text, `bar_width` characters per column.
    pub fn render<W: Write>(
        &self,
        w: &mut W,
        bar_width: usize,
        config: &OutputConfig,
    ) -> io::Result<()> {
        if self.rows.is_empty() {
            writeln!(w, "No products.")?;
            return Ok(());
        }

        let bar_width = bar_width.max(1);
        let name_width = self
            .rows
            .iter()
            .map(|row| row.product.name.chars().count())
            .max()
            .unwrap_or(0);
        let span = self.span();

        for row in &self.rows {
            let bar = bar_glyph(row.product.status).repeat((row.end - row.start) * bar_width);
            let lead = " ".repeat(row.start * bar_width);
            let trail = " ".repeat((span - row.end) * bar_width);
            writeln!(
                w,
                "{:<name_width$} |{lead}{}{trail}|",
                row.product.name,
                colorize_bar(&bar, row.product.status, config)
            )?;
        }

        writeln!(
            w,
            "{:<name_width$}  {} to do  {} in progress  {} done",
            "",
            colorize_bar(bar_glyph(Status::ToDo), Status::ToDo, config),
            colorize_bar(bar_glyph(Status::InProgress), Status::InProgress, config),
            colorize_bar(bar_glyph(Status::Done), Status::Done, config),
        )
    }
}

fn bar_glyph(status: Status) -> &'static str {
    match status {
        Status::ToDo => ".",
        Status::InProgress => "=",
        Status::Done => "#",
    }
}

/// Render the graph in Graphviz DOT format.
///
/// Nodes appear in insertion order, labelled by name and colored by status.
/// Edges run from prerequisite to dependent. Works on cyclic graphs too.
#[must_use]
pub fn to_dot(graph: &ProductGraph) -> String {
    let mut dag: DiGraph<&Product, ()> = DiGraph::with_capacity(graph.len(), 0);
    let mut index: HashMap<ProductId, NodeIndex> = HashMap::with_capacity(graph.len());

    for product in graph.products() {
        index.insert(product.id(), dag.add_node(product));
    }

    for product in graph.products() {
        let dependent = index[&product.id()];
        for pre in graph.prerequisite_ids(&product.id()).into_iter().flatten() {
            if let Some(&prerequisite) = index.get(pre) {
                dag.add_edge(prerequisite, dependent, ());
            }
        }
    }

    format!(
        "{:?}",
        Dot::with_attr_getters(
            &dag,
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &|_, _| String::new(),
            &|_, (_, product)| {
                format!(
                    "label = \"{}\" color = \"{}\" ",
                    escape_label(&product.name),
                    dot_color(product.status)
                )
            },
        )
    )
}

fn dot_color(status: Status) -> &'static str {
    match status {
        Status::ToDo => "red",
        Status::InProgress => "orange",
        Status::Done => "green",
    }
}

fn escape_label(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
