//! Shell configuration.
//!
//! Settings live in a small YAML file, `labdag.yaml` in the working
//! directory unless `--config` names another one.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "labdag.yaml";

/// Default shell prompt
pub const DEFAULT_PROMPT: &str = "(lab) ";

const DEFAULT_MAX_WIDTH: usize = 80;
const DEFAULT_BAR_WIDTH: usize = 4;

/// Settings for the interactive shell.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Prompt printed before each command
    pub prompt: String,

    /// Graph file loaded at start-up and used by `load`/`save` without an argument
    pub data_file: Option<PathBuf>,

    /// Whether output is coloured
    pub color: bool,

    /// Wrapping width for long text in `info`
    pub max_width: usize,

    /// Characters per chart column
    pub bar_width: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            data_file: None,
            color: true,
            max_width: DEFAULT_MAX_WIDTH,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl ShellConfig {
    /// Parse configuration from YAML text.
    ///
    /// Missing keys take their defaults; unknown keys are rejected.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config.bar_width == 0 {
            return Err(Error::Config("bar_width must be at least 1".to_string()));
        }
        if config.max_width == 0 {
            return Err(Error::Config("max_width must be at least 1".to_string()));
        }
        Ok(config)
    }

    /// Load configuration from a file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Self::from_yaml(&content)
    }

    /// Load from `explicit` if given, else from [`CONFIG_FILE_NAME`] in
    /// `base_dir` if that file exists, else return defaults.
    pub async fn discover(explicit: Option<&Path>, base_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "Loading configuration");
            return Self::load(path).await;
        }

        let candidate = base_dir.join(CONFIG_FILE_NAME);
        if fs::try_exists(&candidate).await? {
            tracing::debug!(path = %candidate.display(), "Loading configuration");
            Self::load(&candidate).await
        } else {
            Ok(Self::default())
        }
    }
}
