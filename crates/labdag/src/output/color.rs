//! Color and styling helpers for shell output.
//!
//! Semantic Color Theme:
//!   - Success/Done:   green  (done status, completed actions)
//!   - Warning/Active: yellow (in progress, date conflicts)
//!   - Error/To do:    red    (errors, cycles, chart bars not started)
//!   - Info/Reference: cyan   (product ids)
//!   - Muted:          dimmed (field labels)
//!   - Emphasis:       bold   (section headers)

use crate::domain::Status;
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply color to status text.
pub(crate) fn colorize_status(status: Status, config: &OutputConfig) -> String {
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        Status::ToDo => text.white().to_string(),
        Status::InProgress => text.yellow().to_string(),
        Status::Done => text.green().to_string(),
    }
}

/// Color chart bars red, yellow or green by status.
pub(crate) fn colorize_bar(bar: &str, status: Status, config: &OutputConfig) -> String {
    if !config.use_colors {
        return bar.to_string();
    }
    match status {
        Status::ToDo => bar.red().to_string(),
        Status::InProgress => bar.yellow().to_string(),
        Status::Done => bar.green().to_string(),
    }
}

/// Colorize a product id (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}
