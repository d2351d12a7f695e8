//! The shared tree shape produced by every loader.

use serde_json::{Map, Value};

/// One parsed configuration fragment: string keys mapped to scalars,
/// sequences, or nested trees.
pub type SourceTree = Map<String, Value>;

/// Convert an arbitrary value into a tree.
///
/// Mappings are unwrapped; any other value yields an empty tree, mirroring
/// how loaders treat documents that do not describe a mapping.
#[must_use]
pub fn into_tree(value: Value) -> SourceTree {
    match value {
        Value::Object(map) => map,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
            SourceTree::new()
        }
    }
}

/// Name of the runtime kind of `value`, as used in validation messages.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use stratum_config::value_kind;
///
/// assert_eq!(value_kind(&json!([1])), "array");
/// assert_eq!(value_kind(&json!({"a": 1})), "object");
/// assert_eq!(value_kind(&json!(1.5)), "number");
/// ```
#[must_use]
pub const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Resolve a dotted path such as `server.port` or `hosts.0` inside `tree`.
///
/// Numeric segments index into sequences. Returns `None` when any segment is
/// missing.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use stratum_config::lookup;
///
/// let tree = json!({"server": {"hosts": ["a", "b"]}});
/// let tree = tree.as_object().cloned().unwrap_or_default();
/// assert_eq!(lookup(&tree, "server.hosts.1"), Some(&json!("b")));
/// assert_eq!(lookup(&tree, "server.port"), None);
/// ```
#[must_use]
pub fn lookup<'a>(tree: &'a SourceTree, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    segments.try_fold(tree.get(first)?, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
    })
}
