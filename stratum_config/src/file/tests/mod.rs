//! File loader coverage, split by concern.

use serde_json::Value;

use crate::tree::SourceTree;


pub(super) fn as_value(tree: SourceTree) -> Value {
    Value::Object(tree)
}
