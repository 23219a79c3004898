//! Shell input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::domain::Status;

/// Maximum length of a product name, in characters
pub const MAX_NAME_LENGTH: usize = 200;

/// Validate a product name.
///
/// Names are trimmed, must be non-empty, single-line and free of control
/// characters.
pub fn validate_name(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Product name cannot be empty".to_string());
    }

    let length = s.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(format!(
            "Product name cannot exceed {MAX_NAME_LENGTH} characters, got {length} characters"
        ));
    }

    if let Some(pos) = s.chars().position(char::is_control) {
        return Err(format!(
            "Product name contains invalid control character at position {pos}"
        ));
    }

    Ok(s.to_string())
}

/// Parse a status argument (`0`-`2`, `to_do`, `in progress`, `done`, ...).
pub fn parse_status(s: &str) -> Result<Status, String> {
    Status::parse(s).map_err(|e| e.to_string())
}
