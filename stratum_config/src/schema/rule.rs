//! Per-key validation rules.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use super::Schema;

/// Expected runtime kind of a configuration value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum FieldType {
    /// A string scalar.
    String,
    /// An integer or floating-point scalar.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A nested mapping.
    Object,
    /// A sequence.
    Array,
}

impl FieldType {
    /// Name used in schema documents and violation messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Whether `value` has this kind.
    #[must_use]
    pub const fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::String, Value::String(_))
                | (Self::Number, Value::Number(_))
                | (Self::Boolean, Value::Bool(_))
                | (Self::Object, Value::Object(_))
                | (Self::Array, Value::Array(_))
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            other => Err(format!(
                "unknown type '{other}'; expected string, number, boolean, object or array"
            )),
        }
    }
}

/// Caller-supplied check run after the built-in ones.
///
/// Returning `Err` records a violation; the message is used verbatim, or
/// replaced by `validation failed` when empty.
#[derive(Clone)]
pub struct CustomValidator(Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>);

impl CustomValidator {
    /// Wrap `check` as a validator.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    pub(super) fn check(&self, value: &Value) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(..)")
    }
}

/// Constraints for one key.
///
/// A rule with [`FieldRule::properties`] is composite: its value is walked
/// as a nested tree. Any other rule is a leaf checked in a fixed order:
/// required, default, type, allowed values, bounds, pattern, custom check.
///
/// ```rust
/// use serde_json::json;
/// use stratum_config::{FieldRule, FieldType};
///
/// let port = FieldRule::new()
///     .of_type(FieldType::Number)
///     .default_value(json!(3000))
///     .min(1.0)
///     .max(65535.0);
/// assert!(!port.is_required());
/// ```
#[derive(Clone, Debug, Default)]
pub struct FieldRule {
    pub(super) required: bool,
    pub(super) field_type: Option<FieldType>,
    pub(super) default: Option<Value>,
    pub(super) allowed: Option<Vec<Value>>,
    pub(super) min: Option<f64>,
    pub(super) max: Option<f64>,
    pub(super) pattern: Option<Regex>,
    pub(super) properties: Option<Schema>,
    pub(super) validator: Option<CustomValidator>,
}

impl FieldRule {
    /// A rule with no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a rule that only checks the value kind.
    #[must_use]
    pub fn typed(field_type: FieldType) -> Self {
        Self::new().of_type(field_type)
    }

    /// Reject absent or `null` values.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Require the value to have `field_type`.
    #[must_use]
    pub const fn of_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Value inserted when the key is absent or `null`.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Restrict the value to one of `values`.
    #[must_use]
    pub fn one_of(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.allowed = Some(values.into_iter().collect());
        self
    }

    /// Inclusive lower bound for numeric values.
    #[must_use]
    pub const fn min(mut self, bound: f64) -> Self {
        self.min = Some(bound);
        self
    }

    /// Inclusive upper bound for numeric values.
    #[must_use]
    pub const fn max(mut self, bound: f64) -> Self {
        self.max = Some(bound);
        self
    }

    /// Pattern string values must match.
    #[must_use]
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Make this rule composite, validating its value against `schema`.
    #[must_use]
    pub fn properties(mut self, schema: Schema) -> Self {
        self.properties = Some(schema);
        self
    }

    /// Run `check` after the built-in constraints pass their own checks.
    #[must_use]
    pub fn validate_with<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(CustomValidator::new(check));
        self
    }

    /// Whether absent values are rejected.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Nested schema of a composite rule.
    #[must_use]
    pub const fn nested(&self) -> Option<&Schema> {
        self.properties.as_ref()
    }
}
