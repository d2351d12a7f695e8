//! INI documents read through `rust-ini`.
//!
//! Keys in the general section land at the top level; keys after a header
//! are nested under the section name, and repeated headers add to the same
//! section. Values are unquoted and coerced: integers, decimals,
//! `true`/`false` and `null` become typed scalars, and `undefined` drops the
//! key.

use ini::{Ini, ParseError};
use serde_json::{Map, Number, Value};

use crate::tree::SourceTree;

pub(super) fn parse_ini(data: &str) -> Result<SourceTree, ParseError> {
    let document = Ini::load_from_str(data)?;
    let mut tree = SourceTree::new();

    for (section, properties) in document.iter() {
        let target = match section {
            Some(name) => {
                let entry = tree
                    .entry(name.to_owned())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !entry.is_object() {
                    *entry = Value::Object(Map::new());
                }
                let Value::Object(map) = entry else {
                    continue;
                };
                map
            }
            None => &mut tree,
        };

        for (key, raw) in properties.iter() {
            match coerce(unquote(raw.trim())) {
                Some(value) => {
                    target.insert(key.to_owned(), value);
                }
                None => {
                    target.remove(key);
                }
            }
        }
    }
    Ok(tree)
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            value
                .strip_prefix(quote)
                .and_then(|inner| inner.strip_suffix(quote))
        })
        .unwrap_or(value)
}

/// Typed value for `text`, or `None` when the key should be dropped.
fn coerce(text: &str) -> Option<Value> {
    if text.contains('.') {
        if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Some(Value::Number(number));
        }
    } else if let Ok(integer) = text.parse::<i64>() {
        return Some(Value::from(integer));
    }

    let value = match text.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        "undefined" => return None,
        _ => Value::String(text.to_owned()),
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::parse_ini;
    use anyhow::Result;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[test]
    fn reads_sections_and_top_level_keys() -> Result<()> {
        let tree = parse_ini(
            "name = svc\n; comment\n# another\n[server]\nport=8080\nhost = \"example.org\"\n\n[db]\nurl='pg://x'\n",
        )?;
        assert_eq!(
            Value::Object(tree),
            json!({
                "name": "svc",
                "server": {"port": 8080, "host": "example.org"},
                "db": {"url": "pg://x"}
            })
        );
        Ok(())
    }

    #[rstest]
    #[case("42", json!(42))]
    #[case("-7", json!(-7))]
    #[case("1.5", json!(1.5))]
    #[case("TRUE", json!(true))]
    #[case("false", json!(false))]
    #[case("null", json!(null))]
    #[case("\"8080\"", json!(8080))]
    #[case("1.2.3", json!("1.2.3"))]
    #[case("", json!(""))]
    fn coerces_scalar_values(#[case] raw: &str, #[case] expected: Value) -> Result<()> {
        let tree = parse_ini(&format!("v = {raw}"))?;
        assert_eq!(tree.get("v"), Some(&expected));
        Ok(())
    }

    #[test]
    fn undefined_drops_the_key() -> Result<()> {
        let tree = parse_ini("[a]\nx = 1\nx = undefined\ny = 2")?;
        assert_eq!(Value::Object(tree), json!({"a": {"y": 2}}));
        Ok(())
    }

    #[test]
    fn repeated_sections_accumulate() -> Result<()> {
        let tree = parse_ini("[a]\nx = 1\n[b]\nz = 3\n[a]\ny = 2")?;
        assert_eq!(Value::Object(tree), json!({"a": {"x": 1, "y": 2}, "b": {"z": 3}}));
        Ok(())
    }

    #[test]
    fn section_headers_replace_top_level_scalars() -> Result<()> {
        let tree = parse_ini("server = local\n[server]\nport = 1")?;
        assert_eq!(Value::Object(tree), json!({"server": {"port": 1}}));
        Ok(())
    }

    #[test]
    fn rejects_unterminated_section_headers() {
        assert!(parse_ini("[server\nport = 1").is_err());
    }
}
