//! Schema-driven validation and normalisation.

use std::cmp::Ordering;

use serde_json::Value;

use crate::tree::{SourceTree, value_kind};

use super::{FieldRule, FieldType, Schema, ValidationFailure, Violation, ViolationKind};

/// Validate `config` against `schema`, returning the normalised tree.
///
/// Only declared keys are examined. Defaults fill absent or `null` values,
/// composite rules are walked recursively, and undeclared keys are copied to
/// the output unchanged. Every violation across the whole schema is
/// collected before the outcome is decided.
///
/// # Errors
///
/// Returns a [`ValidationFailure`] listing every violation, in schema
/// declaration order, when at least one check fails.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use stratum_config::{FieldRule, FieldType, Schema, validate};
///
/// let schema = Schema::new()
///     .field("apiKey", FieldRule::typed(FieldType::String).required())
///     .field("port", FieldRule::typed(FieldType::Number).min(1.0).max(65535.0));
///
/// let config = json!({"port": 70000});
/// let config = config.as_object().cloned().unwrap_or_default();
/// let failure = validate(&config, &schema).unwrap_err();
/// assert_eq!(
///     failure.messages(),
///     vec!["apiKey is required", "port must be at most 65535, got 70000"]
/// );
/// ```
pub fn validate(config: &SourceTree, schema: &Schema) -> Result<SourceTree, ValidationFailure> {
    let mut violations = Vec::new();
    let normalised = validate_tree(config, schema, None, &mut violations);
    if violations.is_empty() {
        Ok(normalised)
    } else {
        tracing::debug!(count = violations.len(), "configuration failed validation");
        Err(ValidationFailure::new(violations))
    }
}

fn join_path(parent: Option<&str>, key: &str) -> String {
    parent.map_or_else(|| key.to_owned(), |outer| format!("{outer}.{key}"))
}

fn validate_tree(
    config: &SourceTree,
    schema: &Schema,
    parent: Option<&str>,
    violations: &mut Vec<Violation>,
) -> SourceTree {
    let mut output = config.clone();
    for (key, rule) in schema.iter() {
        let path = join_path(parent, key);
        let value = config.get(key).filter(|value| !value.is_null());
        let checked = match rule.nested() {
            Some(properties) => check_composite(value, rule, properties, &path, violations),
            None => check_leaf(value, rule, &path, violations),
        };
        if let Some(stored) = checked {
            output.insert(key.to_owned(), stored);
        }
    }
    output
}

/// Walk a nested tree. Absent values validate as an empty tree unless the
/// rule is required.
fn check_composite(
    value: Option<&Value>,
    rule: &FieldRule,
    properties: &Schema,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Option<Value> {
    let empty = SourceTree::new();
    let nested = match value {
        None if rule.required => {
            violations.push(Violation::new(path, ViolationKind::Required));
            return None;
        }
        None => &empty,
        Some(Value::Object(map)) => map,
        Some(other) => {
            violations.push(Violation::new(
                path,
                ViolationKind::TypeMismatch {
                    expected: FieldType::Object.as_str(),
                    actual: value_kind(other),
                },
            ));
            &empty
        }
    };
    Some(Value::Object(validate_tree(nested, properties, Some(path), violations)))
}

/// Apply leaf checks in order. Returns the value to store, or `None` to
/// leave the key as it was.
fn check_leaf(
    value: Option<&Value>,
    rule: &FieldRule,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Option<Value> {
    let Some(present) = value else {
        if rule.required {
            violations.push(Violation::new(path, ViolationKind::Required));
            return None;
        }
        return rule.default.clone();
    };

    violations.extend(
        static_violations(present, rule)
            .into_iter()
            .map(|kind| Violation::new(path, kind)),
    );

    if let Some(validator) = &rule.validator
        && let Err(message) = validator.check(present)
    {
        let rendered = if message.is_empty() {
            "validation failed".to_owned()
        } else {
            message
        };
        violations.push(Violation::new(path, ViolationKind::Custom { message: rendered }));
    }

    Some(present.clone())
}

/// Type, membership, bound and pattern failures for a present value.
pub(super) fn static_violations(value: &Value, rule: &FieldRule) -> Vec<ViolationKind> {
    let mut found = Vec::new();

    if let Some(expected) = rule.field_type
        && !expected.matches(value)
    {
        found.push(ViolationKind::TypeMismatch {
            expected: expected.as_str(),
            actual: value_kind(value),
        });
    }

    if let Some(allowed) = &rule.allowed
        && !allowed.iter().any(|candidate| same_value(candidate, value))
    {
        found.push(ViolationKind::NotAllowed {
            allowed: allowed.clone(),
        });
    }

    if let Some(number) = value.as_f64() {
        if let Some(min) = rule.min
            && number < min
        {
            found.push(ViolationKind::BelowMinimum {
                min,
                actual: value.clone(),
            });
        }
        if let Some(max) = rule.max
            && number > max
        {
            found.push(ViolationKind::AboveMaximum {
                max,
                actual: value.clone(),
            });
        }
    }

    if let (Some(pattern), Value::String(text)) = (&rule.pattern, value)
        && !pattern.is_match(text)
    {
        found.push(ViolationKind::PatternMismatch {
            pattern: pattern.as_str().to_owned(),
        });
    }

    found
}

/// Numbers compare by value, so `1` and `1.0` are the same member; other
/// values compare structurally.
fn same_value(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(lhs), Some(rhs)) => lhs.partial_cmp(&rhs) == Some(Ordering::Equal),
        _ => left == right,
    }
}
