//! Pairwise tree merging.

use serde_json::Value;

use crate::tree::SourceTree;

use super::MergeStrategy;

/// Merge `incoming` over `base`, returning a new tree.
///
/// Behaviour for a key defined on both sides:
/// - incoming sequence: appended, prepended, or deduplicated for the array
///   strategies; merged index by index under [`MergeStrategy::DeepMerge`]
///   when both sides are sequences of mappings; otherwise it replaces the
///   base value.
/// - incoming mapping over a base mapping: merged recursively under
///   [`MergeStrategy::DeepMerge`], replaced wholesale under every other
///   strategy.
/// - anything else: the incoming value wins, including type mismatches.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use stratum_config::{MergeStrategy, merge_two};
///
/// let base = json!({"tags": ["x", "y"], "server": {"host": "h", "port": 1}});
/// let incoming = json!({"tags": ["y", "z"], "server": {"port": 2}});
/// let (Some(base), Some(incoming)) = (base.as_object(), incoming.as_object()) else {
///     unreachable!("literals are objects");
/// };
///
/// let merged = merge_two(base, incoming, MergeStrategy::UniqueArrays);
/// assert_eq!(merged["tags"], json!(["x", "y", "z"]));
/// assert_eq!(merged["server"], json!({"port": 2}));
///
/// let merged = merge_two(base, incoming, MergeStrategy::DeepMerge);
/// assert_eq!(merged["server"], json!({"host": "h", "port": 2}));
/// ```
#[must_use]
pub fn merge_two(base: &SourceTree, incoming: &SourceTree, strategy: MergeStrategy) -> SourceTree {
    let mut merged = base.clone();
    for (key, value) in incoming {
        let resolved = match base.get(key) {
            Some(existing) => merge_values(existing, value, strategy),
            None => value.clone(),
        };
        merged.insert(key.clone(), resolved);
    }
    merged
}

fn merge_values(base: &Value, incoming: &Value, strategy: MergeStrategy) -> Value {
    match (base, incoming) {
        (_, Value::Array(items)) => merge_sequences(base.as_array(), items, strategy),
        (Value::Object(base_map), Value::Object(incoming_map)) => match strategy {
            MergeStrategy::DeepMerge => Value::Object(merge_two(base_map, incoming_map, strategy)),
            MergeStrategy::Override
            | MergeStrategy::ShallowMerge
            | MergeStrategy::ConcatArrays
            | MergeStrategy::PrependArrays
            | MergeStrategy::UniqueArrays => incoming.clone(),
        },
        (_, other) => other.clone(),
    }
}

fn merge_sequences(base: Option<&Vec<Value>>, incoming: &[Value], strategy: MergeStrategy) -> Value {
    let base_items = base.map_or(&[][..], Vec::as_slice);
    let items = match strategy {
        MergeStrategy::ConcatArrays => base_items.iter().chain(incoming).cloned().collect(),
        MergeStrategy::PrependArrays => incoming.iter().chain(base_items).cloned().collect(),
        MergeStrategy::UniqueArrays => dedup_scalars(base_items.iter().chain(incoming)),
        MergeStrategy::DeepMerge if is_mapping_sequence(base_items) && is_mapping_sequence(incoming) => {
            merge_by_index(base_items, incoming)
        }
        MergeStrategy::DeepMerge | MergeStrategy::Override | MergeStrategy::ShallowMerge => {
            incoming.to_vec()
        }
    };
    Value::Array(items)
}

fn is_mapping_sequence(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_object)
}

/// Merge element `i` of `incoming` over element `i` of `base`.
///
/// Trailing elements of the longer side are kept as they are.
fn merge_by_index(base: &[Value], incoming: &[Value]) -> Vec<Value> {
    let len = base.len().max(incoming.len());
    (0..len)
        .filter_map(|index| match (base.get(index), incoming.get(index)) {
            (Some(Value::Object(base_map)), Some(Value::Object(incoming_map))) => Some(
                Value::Object(merge_two(base_map, incoming_map, MergeStrategy::DeepMerge)),
            ),
            (_, Some(item)) | (Some(item), None) => Some(item.clone()),
            (None, None) => None,
        })
        .collect()
}

/// Drop repeated scalars, keeping the first occurrence. Mappings and nested
/// sequences are always kept.
fn dedup_scalars<'a>(items: impl Iterator<Item = &'a Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::new();
    for item in items {
        let is_scalar = !matches!(item, Value::Array(_) | Value::Object(_));
        if is_scalar && unique.contains(item) {
            continue;
        }
        unique.push(item.clone());
    }
    unique
}
