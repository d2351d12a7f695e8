//! Test helpers shared across the `stratum` crates.
//!
//! [`figment`] wraps `figment::Jail` so tests can create files and set
//! environment variables in an isolated working directory, and [`tree`]
//! builds configuration trees from JSON literals.

pub mod figment;
pub mod tree;
