//! Layered configuration loading for `stratum`.
//!
//! Configuration fragments are parsed from environment variables and JSON,
//! YAML, TOML, XML and INI files into [`SourceTree`] values. The merge engine
//! folds those fragments under an explicit [`PriorityOrder`] and
//! [`MergeStrategy`], and the schema validator normalises the result against
//! a declarative [`Schema`], collecting every violation in one pass.
//!
//! ```rust
//! use serde_json::json;
//! use stratum_config::{MergeStrategy, NamedSources, SourceKind, merge_by_priority};
//!
//! let sources = NamedSources::new()
//!     .with(SourceKind::Json, json!({"server": {"port": 1, "host": "h"}}))
//!     .with(SourceKind::Env, json!({"server": {"port": 2}}));
//!
//! let merged = merge_by_priority(
//!     &sources,
//!     &[SourceKind::Json, SourceKind::Env],
//!     MergeStrategy::DeepMerge,
//! );
//! assert_eq!(merged["server"], json!({"port": 2, "host": "h"}));
//! ```

mod assembler;
mod env;
pub mod environment;
mod error;
pub mod file;
pub mod merge;
pub mod schema;
mod source;
mod tree;

pub use assembler::{ConfigAssembler, LoadOptions, load_config};
pub use env::EnvLoader;
pub use environment::{EnvironmentDetector, EnvironmentFiles, EnvironmentName};
pub use error::StratumError;
pub use file::{FileFormat, FileLoader, SourceLoader};
pub use merge::{MergeStrategy, merge_by_priority, merge_two};
pub use schema::{
    FieldRule, FieldType, Schema, ValidationFailure, Violation, ViolationKind, validate,
};
pub use source::{NamedSources, PriorityOrder, SourceKind};
pub use tree::{SourceTree, lookup, value_kind};

/// Result type returned by fallible `stratum_config` operations.
///
/// Errors are shared so they can be logged and returned without cloning.
pub type StratumResult<T> = Result<T, std::sync::Arc<StratumError>>;
