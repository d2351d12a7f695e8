//! Declarative schemas and the validator that applies them.
//!
//! A [`Schema`] lists keys in declaration order, each with a [`FieldRule`].
//! [`validate`] walks only the declared keys, applies defaults, and collects
//! every [`Violation`] before deciding the outcome, so a single run reports
//! all problems at once. Undeclared keys pass through untouched.

mod definition;
mod rule;
mod validate;
mod violation;

pub use definition::Schema;
pub use rule::{CustomValidator, FieldRule, FieldType};
pub use validate::validate;
pub use violation::{ValidationFailure, Violation, ViolationKind};
