//! Error types for the `stratum` binary.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failures reported by `stratum` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading, merging, or validating configuration failed.
    #[error(transparent)]
    Configuration(#[from] Arc<stratum_config::StratumError>),
    /// A schema file could not be used.
    #[error("cannot use schema file '{path}': {reason}")]
    Schema {
        /// Path given on the command line.
        path: Utf8PathBuf,
        /// Why it was rejected.
        reason: String,
    },
    /// `get` was asked for a key the configuration does not define.
    #[error("no configuration value at '{0}'")]
    MissingKey(String),
    /// `check` found required fields without a value.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    /// Rendering JSON output failed.
    #[error("failed to render configuration: {0}")]
    Render(#[from] serde_json::Error),
}

/// Result alias for command execution.
pub type Result<T, E = CliError> = std::result::Result<T, E>;
