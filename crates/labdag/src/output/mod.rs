//! Output formatting for shell commands.
//!
//! Every printer writes to a caller-supplied [`Write`] so the shell can be
//! driven against in-memory buffers.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors)

pub mod color;

use crate::config::ShellConfig;
use crate::domain::Product;
use crate::graph::ProductGraph;
use crate::validate::ValidationReport;
use std::io::{self, Write};

pub use color::{error, success, warning};

use color::{bold, colorize_id, colorize_status, dimmed};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(max_width: usize, use_colors: bool) -> Self {
        Self {
            max_width,
            use_colors,
        }
    }

    /// Take the output settings from the shell configuration.
    pub fn from_shell_config(config: &ShellConfig) -> Self {
        Self::new(config.max_width, config.color)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_colors: true,
        }
    }
}

// ============================================================================
// Terminal Width Detection
// ============================================================================

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

// ============================================================================
// Section Printing Helpers
// ============================================================================

/// Print a text section with a bold title and wrapped, indented content.
fn print_text_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &str,
    width: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}:", bold(title, config))?;
    for line in wrap_text(content, width.saturating_sub(2)) {
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

fn print_product_section<W: Write>(
    w: &mut W,
    title: &str,
    products: &[&Product],
    config: &OutputConfig,
) -> io::Result<()> {
    if products.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{} ({}):", bold(title, config), products.len())?;
    for product in products {
        writeln!(w, "  {}", product_line(product, config))?;
    }
    Ok(())
}

/// `Name (short) [status] due YYYY-MM-DD`, colored.
fn product_line(product: &Product, config: &OutputConfig) -> String {
    let mut line = format!(
        "{} ({}) [{}]",
        product.name,
        colorize_id(&product.id().short(), config),
        colorize_status(product.status, config)
    );
    if let Some(target) = product.target {
        line.push_str(&format!(" due {}", target.format("%Y-%m-%d")));
    }
    line
}

// ============================================================================
// Printers
// ============================================================================

/// Print one line per product, followed by its direct prerequisites.
pub fn print_product_list<W: Write>(
    w: &mut W,
    graph: &ProductGraph,
    products: &[&Product],
    config: &OutputConfig,
) -> io::Result<()> {
    if products.is_empty() {
        writeln!(w, "No products.")?;
        return Ok(());
    }

    for product in products {
        writeln!(w, "{}", product_line(product, config))?;
        let prerequisites = graph.prerequisites(&product.id()).unwrap_or_default();
        if !prerequisites.is_empty() {
            let labels: Vec<String> = prerequisites.iter().map(|p| p.label()).collect();
            writeln!(w, "    {} {}", dimmed("needs:", config), labels.join(", "))?;
        }
    }
    Ok(())
}

/// Print every field of a product plus its neighbours.
pub fn print_product_details<W: Write>(
    w: &mut W,
    graph: &ProductGraph,
    product: &Product,
    config: &OutputConfig,
) -> io::Result<()> {
    let content_width = get_terminal_width().min(config.max_width);

    writeln!(w, "{}", product_line(product, config))?;
    writeln!(w, "{} {}", dimmed("Id:", config), product.id())?;
    writeln!(
        w,
        "{} {}",
        dimmed("Created:", config),
        product.created_at().format("%Y-%m-%d %H:%M")
    )?;

    print_text_section(w, "Description", &product.description, content_width, config)?;
    print_text_section(w, "Notes", &product.notes, content_width, config)?;

    if !product.resources.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Resources", config))?;
        for resource in &product.resources {
            writeln!(w, "  - {resource}")?;
        }
    }

    let prerequisites = graph.prerequisites(&product.id()).unwrap_or_default();
    let successors = graph.successors(&product.id()).unwrap_or_default();
    print_product_section(w, "Prerequisites", &prerequisites, config)?;
    print_product_section(w, "Needed by", &successors, config)?;

    Ok(())
}

/// Print products as a numbered sequence.
pub fn print_numbered<W: Write>(
    w: &mut W,
    products: &[&Product],
    config: &OutputConfig,
) -> io::Result<()> {
    if products.is_empty() {
        writeln!(w, "No products.")?;
        return Ok(());
    }
    let digits = products.len().to_string().len();
    for (index, product) in products.iter().enumerate() {
        writeln!(
            w,
            "{:>digits$}. {}",
            index + 1,
            product_line(product, config)
        )?;
    }
    Ok(())
}

/// Print a validation report.
pub fn print_validation<W: Write>(
    w: &mut W,
    report: &ValidationReport<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    if report.valid {
        writeln!(w, "{}", success("No problems found.", config))?;
        return Ok(());
    }

    writeln!(w, "{}", error("Issues found in graph!", config))?;

    if let Some(cycle) = &report.cycle {
        writeln!(w, "Cycle: {cycle}")?;
    }

    if !report.invalid_dates.is_empty() {
        writeln!(
            w,
            "{}",
            warning("Target dates earlier than a prerequisite's target:", config)
        )?;
        for product in &report.invalid_dates {
            writeln!(w, "  {}", product_line(product, config))?;
        }
    }
    Ok(())
}

/// Wrap text to fit within a given width, preserving existing line breaks.
/// Uses textwrap to handle edge cases like long words (URLs, file paths).
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width)
                    .into_iter()
                    .map(|s| s.into_owned())
                    .collect()
            }
        })
        .collect()
}
