//! Schema-directed validation of tables.
//!
//! A [`Schema`] declares the fields a table may carry, their expected value
//! kinds, and per-field constraints. Validation is a pure read: every
//! problem becomes a human-readable string in the [`Report`], and the whole
//! table is always examined — nothing aborts early.
//!
//! ```
//! use tomlet::{FieldSchema, Kind, Schema};
//!
//! let schema = Schema::new()
//!     .field(FieldSchema::new("port", Kind::Integer).required().max_value(65535))
//!     .field(FieldSchema::new("host", Kind::String));
//!
//! let table = tomlet::parse("port = 99999")?;
//! let report = schema.validate(&table);
//! assert!(!report.valid);
//! # Ok::<(), tomlet::Error>(())
//! ```

#[cfg(test)]
#[path = "./schema_tests.rs"]
mod tests;

use crate::table::Table;
use crate::value::{Kind, Value};
use std::collections::HashSet;

/// A declarative description of the keys, kinds, and constraints expected
/// of a table.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    /// The declared fields, validated in order.
    pub fields: Vec<FieldSchema>,
    /// Accept keys that no [`FieldSchema`] mentions (default `false`).
    pub allow_unknown: bool,
    /// Free-form description of what the schema covers.
    pub description: Option<String>,
}

/// One declared field of a [`Schema`].
#[derive(Clone, Debug)]
pub struct FieldSchema {
    /// The key to look up.
    pub name: String,
    /// The expected value kind; [`Kind::Any`] accepts every variant.
    pub kind: Kind,
    /// Whether the field must be present.
    pub required: bool,
    /// Constraints applied, in order, after the kind check passes.
    pub constraints: Vec<Constraint>,
    /// A schema applied recursively when the field holds a table.
    pub nested: Option<Box<Schema>>,
}

/// A per-field restriction. Each variant targets the value kind it makes
/// sense for and is skipped silently on other kinds.
#[derive(Clone, Debug)]
pub enum Constraint {
    /// Integer must be at least this value.
    MinValue(i64),
    /// Integer must be at most this value.
    MaxValue(i64),
    /// String byte length must be at least this long.
    MinLength(usize),
    /// String byte length must be at most this long.
    MaxLength(usize),
    /// String must equal one of these literals.
    OneOf(Vec<String>),
    /// String must match this pattern. `*` matches any run of characters;
    /// everything else is literal.
    Pattern(String),
    /// Caller-supplied predicate over the raw value.
    Custom {
        /// Shown in the error message when the check fails.
        description: &'static str,
        /// The predicate; `false` fails the field.
        check: fn(&Value) -> bool,
    },
}

/// The outcome of a validation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// `true` exactly when `errors` is empty.
    pub valid: bool,
    /// The accumulated problems, in declaration order.
    pub errors: Vec<String>,
}

/// Validates `table` against `schema`. Equivalent to
/// [`Schema::validate`].
pub fn validate(schema: &Schema, table: &Table) -> Report {
    schema.validate(table)
}

impl Schema {
    /// Creates an empty schema that rejects unknown fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field declaration.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets whether undeclared keys are accepted.
    #[must_use]
    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    /// Attaches a description.
    #[must_use]
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Checks `table`, accumulating every problem into the returned
    /// [`Report`]. The input is never mutated and validation never fails
    /// hard.
    pub fn validate(&self, table: &Table) -> Report {
        let mut errors = Vec::new();
        self.validate_into(table, "", &mut errors);
        Report {
            valid: errors.is_empty(),
            errors,
        }
    }

    fn validate_into(&self, table: &Table, prefix: &str, errors: &mut Vec<String>) {
        for field in &self.fields {
            let path = format!("{prefix}{}", field.name);
            let Some(value) = table.get(&field.name) else {
                if field.required {
                    errors.push(format!("Missing required field: '{path}'"));
                }
                continue;
            };
            if field.kind != Kind::Any && value.kind() != field.kind {
                errors.push(format!(
                    "Field '{path}' has wrong type (expected {}, found {})",
                    field.kind,
                    value.type_str()
                ));
                continue;
            }
            for constraint in &field.constraints {
                constraint.check(&path, value, errors);
            }
            if let Some(nested) = &field.nested {
                if let Some(sub) = value.as_table() {
                    nested.validate_into(sub, &format!("{path}."), errors);
                }
            }
        }

        if !self.allow_unknown {
            let declared: HashSet<&str> =
                self.fields.iter().map(|f| f.name.as_str()).collect();
            for key in table.keys() {
                if !declared.contains(key.as_str()) {
                    errors.push(format!("Unknown field: '{prefix}{key}'"));
                }
            }
        }
    }
}

impl FieldSchema {
    /// Declares a field with the given name and expected kind. Fields start
    /// out optional and unconstrained.
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            constraints: Vec::new(),
            nested: None,
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Requires an integer value of at least `min`.
    #[must_use]
    pub fn min_value(mut self, min: i64) -> Self {
        self.constraints.push(Constraint::MinValue(min));
        self
    }

    /// Requires an integer value of at most `max`.
    #[must_use]
    pub fn max_value(mut self, max: i64) -> Self {
        self.constraints.push(Constraint::MaxValue(max));
        self
    }

    /// Requires a string of at least `len` bytes.
    #[must_use]
    pub fn min_length(mut self, len: usize) -> Self {
        self.constraints.push(Constraint::MinLength(len));
        self
    }

    /// Requires a string of at most `len` bytes.
    #[must_use]
    pub fn max_length(mut self, len: usize) -> Self {
        self.constraints.push(Constraint::MaxLength(len));
        self
    }

    /// Requires the string to equal one of `options`.
    #[must_use]
    pub fn one_of<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.constraints
            .push(Constraint::OneOf(options.into_iter().map(Into::into).collect()));
        self
    }

    /// Requires the string to match a `*`-wildcard pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.push(Constraint::Pattern(pattern.into()));
        self
    }

    /// Attaches a caller-supplied predicate.
    #[must_use]
    pub fn custom(mut self, description: &'static str, check: fn(&Value) -> bool) -> Self {
        self.constraints
            .push(Constraint::Custom { description, check });
        self
    }

    /// Attaches a schema applied when the field holds a table.
    #[must_use]
    pub fn nested(mut self, schema: Schema) -> Self {
        self.nested = Some(Box::new(schema));
        self
    }
}

impl Constraint {
    fn check(&self, path: &str, value: &Value, errors: &mut Vec<String>) {
        match self {
            Constraint::MinValue(min) => {
                if let Some(i) = value.as_integer() {
                    if i < *min {
                        errors.push(format!(
                            "Field '{path}' value {i} is below minimum {min}"
                        ));
                    }
                }
            }
            Constraint::MaxValue(max) => {
                if let Some(i) = value.as_integer() {
                    if i > *max {
                        errors.push(format!(
                            "Field '{path}' value {i} exceeds maximum {max}"
                        ));
                    }
                }
            }
            Constraint::MinLength(len) => {
                if let Some(s) = value.as_str() {
                    if s.len() < *len {
                        errors.push(format!(
                            "Field '{path}' length {} is below minimum length {len}",
                            s.len()
                        ));
                    }
                }
            }
            Constraint::MaxLength(len) => {
                if let Some(s) = value.as_str() {
                    if s.len() > *len {
                        errors.push(format!(
                            "Field '{path}' length {} exceeds maximum length {len}",
                            s.len()
                        ));
                    }
                }
            }
            Constraint::OneOf(options) => {
                if let Some(s) = value.as_str() {
                    if !options.iter().any(|o| o == s) {
                        errors.push(format!(
                            "Field '{path}' must be one of [{}], got '{s}'",
                            options.join(", ")
                        ));
                    }
                }
            }
            Constraint::Pattern(pattern) => {
                if let Some(s) = value.as_str() {
                    if !wildcard_match(pattern, s) {
                        errors.push(format!(
                            "Field '{path}' does not match pattern '{pattern}'"
                        ));
                    }
                }
            }
            Constraint::Custom { description, check } => {
                if !check(value) {
                    errors.push(format!(
                        "Field '{path}' failed custom check ({description})"
                    ));
                }
            }
        }
    }
}

/// Glob-lite matching: `*` matches any (possibly empty) run of bytes,
/// everything else matches itself. Iterative with single-star backtracking.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.as_bytes();
    let text = text.as_bytes();
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && (pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == b'*' {
        p += 1;
    }
    p == pattern.len()
}
