//! Priority-ordered folding of named sources.

use crate::source::{NamedSources, SourceKind};
use crate::tree::SourceTree;

use super::{MergeStrategy, merge_two};

/// Merge `sources` in `order`, lowest priority first.
///
/// The fold starts from an empty tree and merges each named tree as the
/// incoming side over the accumulated result, so the last kind in `order`
/// wins conflicts. Kinds in `order` without a tree contribute nothing;
/// trees whose kind is absent from `order` are ignored entirely.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use stratum_config::{MergeStrategy, NamedSources, SourceKind, merge_by_priority};
///
/// let sources = NamedSources::new()
///     .with(SourceKind::Ini, json!({"x": 1}))
///     .with(SourceKind::Json, json!({"x": 2}))
///     .with(SourceKind::Env, json!({"x": 3}));
///
/// let order = [SourceKind::Ini, SourceKind::Json, SourceKind::Env];
/// let merged = merge_by_priority(&sources, &order, MergeStrategy::DeepMerge);
/// assert_eq!(merged["x"], json!(3));
/// ```
#[must_use]
pub fn merge_by_priority(
    sources: &NamedSources,
    order: &[SourceKind],
    strategy: MergeStrategy,
) -> SourceTree {
    order
        .iter()
        .fold(SourceTree::new(), |merged, kind| match sources.get(*kind) {
            Some(tree) => {
                tracing::trace!(source = %kind, keys = tree.len(), %strategy, "merging source");
                merge_two(&merged, tree, strategy)
            }
            None => merged,
        })
}
