//! Builders for configuration trees in assertions.

use serde_json::{Map, Value};

/// Unwrap a JSON object literal into a tree.
///
/// # Errors
///
/// Returns an error naming the value's kind when `value` is not an object.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use test_helpers::tree::tree;
///
/// let parsed = tree(json!({"port": 8080}))?;
/// assert_eq!(parsed.get("port"), Some(&json!(8080)));
/// assert!(tree(json!([1])).is_err());
/// # Ok::<_, anyhow::Error>(())
/// ```
pub fn tree(value: Value) -> anyhow::Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow::anyhow!("expected a JSON object, found {other}")),
    }
}
