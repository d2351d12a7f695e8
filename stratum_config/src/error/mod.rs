//! Error types produced while loading, merging, and validating configuration.

mod constructors;
mod types;

pub use types::StratumError;

pub(crate) use constructors::{file_error, invalid_data};
