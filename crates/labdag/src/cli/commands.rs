//! Shell command definitions.
//!
//! Each shell line is tokenized and parsed with clap, so every command gets
//! argument validation and `help <command>` for free.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::validators::{parse_status, validate_name};
use crate::domain::Status;

/// One parsed shell line.
#[derive(Parser, Debug)]
#[command(
    name = "labdag",
    no_binary_name = true,
    disable_version_flag = true,
    override_usage = "<COMMAND> [ARGS]...",
    help_template = "Commands:\n{subcommands}\n\nType 'help <command>' for details."
)]
pub struct ShellLine {
    /// Command to execute
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Commands available in the shell
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Replace the graph with the contents of a file
    ///
    /// Uses the configured data file when no path is given. The current graph
    /// is kept if the file cannot be loaded.
    Load {
        /// JSONL file to read
        file: Option<PathBuf>,
    },

    /// Write the graph to a file
    ///
    /// Uses the current data file when no path is given.
    Save {
        /// JSONL file to write
        file: Option<PathBuf>,
    },

    /// List products with status, target and prerequisites
    Show,

    /// Show every detail of one product
    Info {
        /// Product name or id
        product: String,
    },

    /// Add a new product
    ///
    /// Prerequisites that do not exist yet are created.
    Add {
        /// Name of the new product
        #[arg(value_parser = validate_name)]
        name: String,

        /// Names or ids of its prerequisites
        prerequisites: Vec<String>,
    },

    /// Remove a product and every edge to it
    Remove {
        /// Product name or id
        product: String,
    },

    /// Add prerequisites to a product
    ///
    /// The product and any unknown prerequisites are created if needed.
    Depends {
        /// Product name or id
        product: String,

        /// Names or ids of the prerequisites to add
        #[arg(required = true)]
        prerequisites: Vec<String>,
    },

    /// Remove prerequisites from a product
    Undepend {
        /// Product name or id
        product: String,

        /// Names or ids of the prerequisites to remove
        #[arg(required = true)]
        prerequisites: Vec<String>,
    },

    /// Set the status of a product (to_do, in_progress, done or 0-2)
    Mark {
        /// Product name or id
        product: String,

        /// New status
        #[arg(value_parser = parse_status)]
        status: Status,
    },

    /// Set the target date of a product, or `clear` it
    ///
    /// Accepts YYYY-MM-DD, M/D/YYYY, M-D-YYYY, M/D/YY, M-D-YY, or M/D and
    /// M-D for the current year.
    Target {
        /// Product name or id
        product: String,

        /// Target date or `clear`
        date: String,
    },

    /// Replace the notes of a product
    Note {
        /// Product name or id
        product: String,

        /// Note text
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Replace the description of a product
    Describe {
        /// Product name or id
        product: String,

        /// Description text
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Append a resource reference (path, URL, sample id) to a product
    Resource {
        /// Product name or id
        product: String,

        /// Resource reference
        uri: String,
    },

    /// Rename a product
    Rename {
        /// Product name or id
        product: String,

        /// New name
        #[arg(value_parser = validate_name)]
        name: String,
    },

    /// Print products in an order that respects every prerequisite
    Order,

    /// Print the final deliverables (products nothing depends on)
    Endpoints,

    /// Check for cycles and impossible target dates
    Validate,

    /// Print a Gantt chart of the schedule
    Chart,

    /// Print the graph in Graphviz DOT format, or write it to a file
    Dot {
        /// File to write instead of printing
        file: Option<PathBuf>,
    },

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

impl ShellCommand {
    /// Whether running this command can change the graph.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Add { .. }
                | Self::Remove { .. }
                | Self::Depends { .. }
                | Self::Undepend { .. }
                | Self::Mark { .. }
                | Self::Target { .. }
                | Self::Note { .. }
                | Self::Describe { .. }
                | Self::Resource { .. }
                | Self::Rename { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ShellCommand {
        ShellLine::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_parse_add_with_prerequisites() {
        assert_eq!(
            parse(&["add", "Plasmid2", "Plasmid1", "Primer"]),
            ShellCommand::Add {
                name: "Plasmid2".to_string(),
                prerequisites: vec!["Plasmid1".to_string(), "Primer".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_mark_parses_status() {
        assert_eq!(
            parse(&["mark", "Primer", "in_progress"]),
            ShellCommand::Mark {
                product: "Primer".to_string(),
                status: Status::InProgress,
            }
        );
    }

    #[test]
    fn test_parse_mark_rejects_bad_status() {
        let err = ShellLine::try_parse_from(["mark", "Primer", "finished"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_parse_note_joins_free_text() {
        assert_eq!(
            parse(&["note", "Primer", "order", "-", "two", "tubes"]),
            ShellCommand::Note {
                product: "Primer".to_string(),
                text: vec![
                    "order".to_string(),
                    "-".to_string(),
                    "two".to_string(),
                    "tubes".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_depends_requires_prerequisite() {
        assert!(ShellLine::try_parse_from(["depends", "Plasmid"]).is_err());
    }

    #[test]
    fn test_quit_is_exit() {
        assert_eq!(parse(&["quit"]), ShellCommand::Exit);
        assert_eq!(parse(&["exit"]), ShellCommand::Exit);
    }

    #[test]
    fn test_help_is_display_help() {
        let err = ShellLine::try_parse_from(["help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(err.render().to_string().contains("depends"));
    }

    #[test]
    fn test_mutates() {
        assert!(parse(&["remove", "X"]).mutates());
        assert!(!parse(&["show"]).mutates());
        assert!(!parse(&["save"]).mutates());
    }
}
