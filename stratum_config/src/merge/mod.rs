//! Structural merging of configuration trees.
//!
//! [`merge_two`] combines a base tree with an incoming tree under a
//! [`MergeStrategy`]; [`merge_by_priority`] folds a set of named sources in
//! priority order, starting from an empty tree, so the last kind in the
//! order wins every conflict.
//!
//! Inputs are only ever borrowed. Every merge builds a fresh tree, so the
//! same sources can be merged again under a different order or strategy.

mod engine;
mod priority;
mod strategy;

pub use engine::merge_two;
pub use priority::merge_by_priority;
pub use strategy::MergeStrategy;
