//! Command-line interface and interactive shell.
//!
//! The binary either starts the shell or, when a command follows the flags,
//! runs that single shell command against the data file and saves it back
//! if the command changed the graph.
//!
//! # Example
//!
//! ```bash
//! labdag --file lab.jsonl
//! labdag --file lab.jsonl add Plasmid2 Plasmid1 Primer
//! labdag --file lab.jsonl validate
//! ```

mod commands;
mod shell;
mod validators;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;

pub use commands::{ShellCommand, ShellLine};
pub use shell::{split_line, Flow, Shell, INTRO};
pub use validators::{parse_status, validate_name, MAX_NAME_LENGTH};

use crate::app::App;
use crate::config::ShellConfig;

/// LabDAG - plan lab work as a dependency graph of products
///
/// Track reagents, constructs and deliverables, what each one needs, and
/// when each is due.
#[derive(Parser, Debug)]
#[command(name = "labdag")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./labdag.yaml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Graph file to load and save (overrides data_file from the config)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// A single shell command to run instead of starting the shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        let config = ShellConfig::discover(self.config.as_deref(), &std::env::current_dir()?).await?;
        let data_file = self.file.clone().or_else(|| config.data_file.clone());
        let app = App::open(data_file.as_deref()).await?;

        let input = BufReader::new(tokio::io::stdin());
        let mut shell = Shell::new(app, config, input, std::io::stdout());

        if self.command.is_empty() {
            return shell.run().await;
        }

        shell.execute_args(&self.command).await?;
        if shell.app().is_dirty() {
            let path = shell.app_mut().save(None).await?;
            tracing::debug!(path = %path.display(), "Saved after one-shot command");
        }
        Ok(())
    }
}
