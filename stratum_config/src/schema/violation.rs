//! Violations recorded by the validator and their aggregate failure.

use std::{error::Error, fmt};

use serde_json::Value;

/// What went wrong at a key.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum ViolationKind {
    /// A required key was absent or `null`.
    Required,
    /// The value has the wrong kind.
    TypeMismatch {
        /// Kind declared by the rule.
        expected: &'static str,
        /// Kind actually found.
        actual: &'static str,
    },
    /// The value is not one of the allowed values.
    NotAllowed {
        /// Allowed values in declaration order.
        allowed: Vec<Value>,
    },
    /// A number below the inclusive minimum.
    BelowMinimum {
        /// Declared bound.
        min: f64,
        /// Offending value.
        actual: Value,
    },
    /// A number above the inclusive maximum.
    AboveMaximum {
        /// Declared bound.
        max: f64,
        /// Offending value.
        actual: Value,
    },
    /// A string that does not match the declared pattern.
    PatternMismatch {
        /// Source of the pattern.
        pattern: String,
    },
    /// A custom validator rejected the value.
    Custom {
        /// Message returned by the validator.
        message: String,
    },
}

/// One failed check, tied to the dotted path of its key.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    path: String,
    kind: ViolationKind,
}

impl Violation {
    /// Record `kind` at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Dotted key path, such as `server.port`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Nature of the failure.
    #[must_use]
    pub const fn kind(&self) -> &ViolationKind {
        &self.kind
    }
}

/// Renders allowed values the way they appear in configuration text:
/// strings bare, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = &self.path;
        match &self.kind {
            ViolationKind::Required => write!(f, "{path} is required"),
            ViolationKind::TypeMismatch { expected, actual } => {
                write!(f, "{path} should be {expected}, got {actual}")
            }
            ViolationKind::NotAllowed { allowed } => {
                let listed: Vec<String> = allowed.iter().map(display_value).collect();
                write!(f, "{path} must be one of: {}", listed.join(", "))
            }
            ViolationKind::BelowMinimum { min, actual } => {
                write!(f, "{path} must be at least {min}, got {actual}")
            }
            ViolationKind::AboveMaximum { max, actual } => {
                write!(f, "{path} must be at most {max}, got {actual}")
            }
            ViolationKind::PatternMismatch { pattern } => {
                write!(f, "{path} must match pattern {pattern}")
            }
            ViolationKind::Custom { message } => write!(f, "{path}: {message}"),
        }
    }
}

/// Every violation found in one validation run.
///
/// Never empty when returned by [`crate::validate`].
///
/// # Examples
///
/// ```
/// use stratum_config::{ValidationFailure, Violation, ViolationKind};
///
/// let failure = ValidationFailure::new(vec![
///     Violation::new("apiKey", ViolationKind::Required),
///     Violation::new("debug", ViolationKind::TypeMismatch { expected: "boolean", actual: "string" }),
/// ]);
/// assert_eq!(failure.len(), 2);
/// assert_eq!(
///     failure.to_string(),
///     "configuration validation failed:\napiKey is required\ndebug should be boolean, got string"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationFailure(Vec<Violation>);

impl ValidationFailure {
    /// Wrap an ordered list of violations.
    #[must_use]
    pub const fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    /// Iterate over the violations in the order they were found.
    #[must_use = "iterators should be consumed to inspect violations"]
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Number of violations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no violation was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rendered message of every violation.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("configuration validation failed:")?;
        for violation in &self.0 {
            write!(f, "\n{violation}")?;
        }
        Ok(())
    }
}

impl Error for ValidationFailure {}

impl<'a> IntoIterator for &'a ValidationFailure {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ValidationFailure {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
