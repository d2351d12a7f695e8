//! Format-specific parsing of configuration documents.

use camino::Utf8Path;
use serde_json::Value;

use crate::StratumResult;
use crate::error::{file_error, invalid_data};
use crate::tree::SourceTree;

use super::FileFormat;
use super::ini::parse_ini;
#[cfg(feature = "yaml")]
use super::yaml::parse_yaml;

/// Parse `data` as a `format` document read from `path`.
///
/// `path` is only used for error context. An empty YAML document yields an
/// empty tree.
///
/// # Errors
///
/// Returns a [`crate::StratumError::File`] when the contents fail to parse,
/// when the top-level value is not a mapping, when the format's feature is
/// disabled, or when the format is XML, for which no parser is bundled.
///
/// # Examples
///
/// ```rust
/// use camino::Utf8Path;
/// use serde_json::json;
/// use stratum_config::{FileFormat, file::parse_document};
///
/// let tree = parse_document(Utf8Path::new("inline.json"), r#"{"port": 8080}"#, FileFormat::Json)?;
/// assert_eq!(tree.get("port"), Some(&json!(8080)));
/// # Ok::<_, std::sync::Arc<stratum_config::StratumError>>(())
/// ```
pub fn parse_document(path: &Utf8Path, data: &str, format: FileFormat) -> StratumResult<SourceTree> {
    let std_path = path.as_std_path();
    let value = match format {
        FileFormat::Json => {
            serde_json::from_str::<Value>(data).map_err(|e| file_error(std_path, e))?
        }
        FileFormat::Yaml => parse_yaml_document(path, data)?,
        FileFormat::Toml => parse_toml_document(path, data)?,
        FileFormat::Ini => return parse_ini(data).map_err(|e| file_error(std_path, e)),
        FileFormat::Xml => {
            return Err(invalid_data(
                std_path,
                "no XML parser is bundled; register a loader for the xml source",
            ));
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null if format == FileFormat::Yaml => Ok(SourceTree::new()),
        other => Err(invalid_data(
            std_path,
            format!(
                "top-level value must be a mapping, found {}",
                crate::value_kind(&other)
            ),
        )),
    }
}

fn parse_yaml_document(path: &Utf8Path, data: &str) -> StratumResult<Value> {
    #[cfg(feature = "yaml")]
    {
        parse_yaml(data).map_err(|e| file_error(path.as_std_path(), e))
    }
    #[cfg(not(feature = "yaml"))]
    {
        let _ = data;
        Err(file_error(
            path.as_std_path(),
            std::io::Error::other(
                "yaml feature disabled: enable the 'yaml' feature to support this file format",
            ),
        ))
    }
}

fn parse_toml_document(path: &Utf8Path, data: &str) -> StratumResult<Value> {
    #[cfg(feature = "toml")]
    {
        let table = toml::from_str::<toml::Table>(data).map_err(|e| file_error(path.as_std_path(), e))?;
        Ok(toml_to_json(toml::Value::Table(table)))
    }
    #[cfg(not(feature = "toml"))]
    {
        let _ = data;
        Err(file_error(
            path.as_std_path(),
            std::io::Error::other(
                "toml feature disabled: enable the 'toml' feature to support this file format",
            ),
        ))
    }
}

/// TOML datetimes have no JSON counterpart and are kept as their RFC 3339
/// text.
#[cfg(feature = "toml")]
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::String(text),
        toml::Value::Integer(number) => Value::from(number),
        toml::Value::Float(number) => Value::from(number),
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}
