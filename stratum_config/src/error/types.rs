//! Primary error enum for configuration assembly.

use thiserror::Error;

use crate::schema::ValidationFailure;

/// Errors that can occur while assembling configuration.
///
/// Merging never fails; loaders swallow their own failures. The variants
/// below cover explicit parsing entry points, option parsing, schema
/// construction, and validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StratumError {
    /// Error originating from a configuration file.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying error reported by the reader or parser.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A source name outside the known vocabulary.
    #[error("unknown configuration source '{name}'")]
    UnknownSource {
        /// Name as supplied by the caller.
        name: String,
    },

    /// A merge strategy name outside the known vocabulary.
    #[error("unknown merge strategy '{name}'")]
    UnknownStrategy {
        /// Name as supplied by the caller.
        name: String,
    },

    /// A priority order that cannot be used.
    #[error("invalid priority order: {message}")]
    InvalidPriority {
        /// Why the order was rejected.
        message: String,
    },

    /// A schema document that does not describe valid rules.
    #[error("invalid schema rule for '{key}': {message}")]
    SchemaDefinition {
        /// Dotted path of the offending rule.
        key: String,
        /// Human-readable explanation.
        message: String,
    },

    /// The merged configuration violates its schema.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}

impl StratumError {
    /// Violations carried by a validation failure, if this is one.
    #[must_use]
    pub const fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}
