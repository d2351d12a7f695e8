//! Schema containers and construction from declarative documents.

use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use crate::{StratumError, StratumResult};

use super::validate::static_violations;
use super::{FieldRule, FieldType, Violation};

const RULE_KEYS: [&str; 8] = [
    "required",
    "type",
    "default",
    "enum",
    "min",
    "max",
    "pattern",
    "properties",
];

/// Ordered set of field rules.
///
/// Declaration order is preserved and decides the order in which
/// violations are reported.
///
/// ```rust
/// use serde_json::json;
/// use stratum_config::{FieldRule, FieldType, Schema};
///
/// let schema = Schema::new()
///     .field("apiKey", FieldRule::typed(FieldType::String).required())
///     .field(
///         "server",
///         FieldRule::new().properties(
///             Schema::new().field("port", FieldRule::typed(FieldType::Number)),
///         ),
///     );
/// assert_eq!(schema.len(), 2);
///
/// let same = Schema::from_value(&json!({
///     "apiKey": {"type": "string", "required": true},
///     "server": {"properties": {"port": {"type": "number"}}}
/// }))?;
/// assert_eq!(same.keys().collect::<Vec<_>>(), vec!["apiKey", "server"]);
/// # Ok::<_, std::sync::Arc<stratum_config::StratumError>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
}

impl Schema {
    /// An empty schema that accepts any tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare `key` with `rule`, replacing an earlier declaration in place.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, rule: FieldRule) -> Self {
        let owned_key = key.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == owned_key) {
            Some(slot) => slot.1 = rule,
            None => self.fields.push((owned_key, rule)),
        }
        self
    }

    /// Rule declared for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, rule)| rule)
    }

    /// Declared keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Declared keys and rules in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(key, rule)| (key.as_str(), rule))
    }

    /// Number of declared keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no key is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a schema from a declarative document.
    ///
    /// Each key maps to a rule object using `required`, `type`, `default`,
    /// `enum`, `min`, `max`, `pattern`, and `properties`. A rule object that
    /// uses none of these keys and contains only objects is read as a nested
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::SchemaDefinition`] naming the dotted key of
    /// the first malformed rule, including a rule whose `default` fails the
    /// rule's own type, `enum`, bounds or pattern.
    pub fn from_value(document: &Value) -> StratumResult<Self> {
        let map = document
            .as_object()
            .ok_or_else(|| definition_error("<root>", "schema must be a mapping of keys to rules"))?;
        parse_schema(map, None)
    }
}

fn definition_error(key: &str, message: impl Into<String>) -> Arc<StratumError> {
    Arc::new(StratumError::SchemaDefinition {
        key: key.to_owned(),
        message: message.into(),
    })
}

fn parse_schema(map: &Map<String, Value>, parent: Option<&str>) -> StratumResult<Schema> {
    map.iter().try_fold(Schema::new(), |schema, (key, document)| {
        let path = parent.map_or_else(|| key.clone(), |outer| format!("{outer}.{key}"));
        Ok(schema.field(key.clone(), parse_rule(document, &path)?))
    })
}

fn is_implicit_schema(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && map.keys().all(|key| !RULE_KEYS.contains(&key.as_str()))
        && map.values().all(Value::is_object)
}

fn parse_rule(value: &Value, path: &str) -> StratumResult<FieldRule> {
    let map = value
        .as_object()
        .ok_or_else(|| definition_error(path, "rule must be a mapping"))?;
    if is_implicit_schema(map) {
        return Ok(FieldRule::new().properties(parse_schema(map, Some(path))?));
    }

    let rule = map.iter().try_fold(FieldRule::new(), |partial, (name, setting)| {
        apply_setting(partial, name, setting, path)
    })?;
    check_default(&rule, path)?;
    Ok(rule)
}

/// A default must pass its own rule, or validating the filled-in tree a
/// second time would fail.
fn check_default(rule: &FieldRule, path: &str) -> StratumResult<()> {
    let Some(default) = rule.default.as_ref().filter(|value| !value.is_null()) else {
        return Ok(());
    };
    if rule.nested().is_some() {
        return Ok(());
    }
    match static_violations(default, rule).into_iter().next() {
        Some(kind) => Err(definition_error(
            path,
            format!("invalid default: {}", Violation::new(path, kind)),
        )),
        None => Ok(()),
    }
}

fn apply_setting(rule: FieldRule, name: &str, setting: &Value, path: &str) -> StratumResult<FieldRule> {
    let updated = match name {
        "required" => match setting {
            Value::Bool(true) => rule.required(),
            Value::Bool(false) => rule,
            _ => return Err(definition_error(path, "'required' must be a boolean")),
        },
        "type" => {
            let type_name = setting
                .as_str()
                .ok_or_else(|| definition_error(path, "'type' must be a string"))?;
            rule.of_type(type_name.parse::<FieldType>().map_err(|e| definition_error(path, e))?)
        }
        "default" => rule.default_value(setting.clone()),
        "enum" => {
            let values = setting
                .as_array()
                .ok_or_else(|| definition_error(path, "'enum' must be a sequence"))?;
            rule.one_of(values.iter().cloned())
        }
        "min" => rule.min(number_setting(setting, "min", path)?),
        "max" => rule.max(number_setting(setting, "max", path)?),
        "pattern" => {
            let source = setting
                .as_str()
                .ok_or_else(|| definition_error(path, "'pattern' must be a string"))?;
            let regex = Regex::new(source)
                .map_err(|e| definition_error(path, format!("invalid pattern: {e}")))?;
            rule.pattern(regex)
        }
        "properties" => {
            let nested = setting
                .as_object()
                .ok_or_else(|| definition_error(path, "'properties' must be a mapping"))?;
            rule.properties(parse_schema(nested, Some(path))?)
        }
        other => return Err(definition_error(path, format!("unknown rule key '{other}'"))),
    };
    Ok(updated)
}

fn number_setting(setting: &Value, name: &str, path: &str) -> StratumResult<f64> {
    setting
        .as_f64()
        .ok_or_else(|| definition_error(path, format!("'{name}' must be a number")))
}
