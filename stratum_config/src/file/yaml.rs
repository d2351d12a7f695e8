//! YAML parsing backed by `serde-saphyr`.

use serde_json::Value;
use serde_saphyr::Options;

/// Parse YAML contents using strict boolean semantics, so `yes` and `on`
/// stay strings.
pub(super) fn parse_yaml(contents: &str) -> Result<Value, serde_saphyr::Error> {
    if contents.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_saphyr::from_str_with_options(
        contents,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )
}
