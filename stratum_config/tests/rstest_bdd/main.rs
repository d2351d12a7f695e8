//! `rstest-bdd` behaviour suite for `stratum_config`.
//!
//! Fixtures hold the per-scenario state, steps build files and environment
//! variables inside a `figment::Jail`, and scenarios bind the feature files.

mod fixtures;
mod scenarios;
mod steps;
