//! CLI configuration file.
//!
//! ```yaml
//! output: json
//! pretty: true
//! ladders: [software_stages]
//! fail_on_unrated: true
//! ```
//!
//! Every field is optional. Command-line flags override the file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON report envelope.
    Json,
}

/// Settings read from `--config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Default report format.
    pub output: OutputFormat,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Only evaluate and report these ladders. `None` means all of them.
    pub ladders: Option<Vec<String>>,
    /// Exit with code 3 when any rated wallet has unrated attributes.
    pub fail_on_unrated: bool,
}

impl CliConfig {
    /// Load the configuration. No path, or a path that does not exist,
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Whether a ladder should be evaluated under the allow-list.
    pub fn includes_ladder(&self, ladder: &str) -> bool {
        self.ladders
            .as_ref()
            .map_or(true, |allowed| allowed.iter().any(|l| l == ladder))
    }
}
