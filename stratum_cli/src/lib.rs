//! Library facade for the `stratum` binary so integration tests can drive
//! commands without spawning a process.

pub mod cli;
pub mod commands;
pub mod error;
