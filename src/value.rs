//! The [`Value`] sum type at the heart of the processor.

#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use crate::array::Array;
use crate::table::Table;
use crate::time::{Date, Datetime, Time};
use std::fmt;

/// A parsed TOML value.
///
/// The type is a closed sum: every value a document can hold is one of these
/// ten variants, and values own their contents transitively. Dropping a
/// value releases everything reachable through it.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// A string (any of the four TOML string forms decode to this).
    String(String),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit IEEE-754 float, including ±infinity and NaN.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// An offset or local date-time.
    Datetime(Datetime),
    /// A local date.
    Date(Date),
    /// A local time.
    Time(Time),
    /// An ordered sequence of values.
    Array(Array),
    /// A keyed mapping of values.
    Table(Table),
}

/// The variant of a [`Value`], or the `Any` wildcard used by schemas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Matches [`Value::String`].
    String,
    /// Matches [`Value::Integer`].
    Integer,
    /// Matches [`Value::Float`].
    Float,
    /// Matches [`Value::Boolean`].
    Boolean,
    /// Matches [`Value::Datetime`].
    Datetime,
    /// Matches [`Value::Date`].
    Date,
    /// Matches [`Value::Time`].
    Time,
    /// Matches [`Value::Array`].
    Array,
    /// Matches [`Value::Table`].
    Table,
    /// Matches every variant.
    Any,
}

impl Kind {
    /// Lowercase name of the kind, as used in schema error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Boolean => "boolean",
            Kind::Datetime => "datetime",
            Kind::Date => "date",
            Kind::Time => "time",
            Kind::Array => "array",
            Kind::Table => "table",
            Kind::Any => "any",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Returns the [`Kind`] of this value (never [`Kind::Any`]).
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Boolean(_) => Kind::Boolean,
            Value::Datetime(_) => Kind::Datetime,
            Value::Date(_) => Kind::Date,
            Value::Time(_) => Kind::Time,
            Value::Array(_) => Kind::Array,
            Value::Table(_) => Kind::Table,
        }
    }

    /// Lowercase name of the variant, for error messages.
    pub fn type_str(&self) -> &'static str {
        self.kind().name()
    }

    /// Returns the borrowed string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float if this is a float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the date-time if this is a date-time value.
    pub fn as_datetime(&self) -> Option<&Datetime> {
        match self {
            Value::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns the date if this is a date value.
    pub fn as_date(&self) -> Option<&Date> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the time if this is a time value.
    pub fn as_time(&self) -> Option<&Time> {
        match self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the borrowed array if this is an array value.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a mutable array reference if this is an array value.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the borrowed table if this is a table value.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns a mutable table reference if this is a table value.
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => s.fmt(f),
            Value::Integer(i) => i.fmt(f),
            Value::Float(v) => v.fmt(f),
            Value::Boolean(b) => b.fmt(f),
            Value::Datetime(dt) => write!(f, "{dt}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Time(t) => write!(f, "{t}"),
            Value::Array(a) => a.fmt(f),
            Value::Table(t) => t.fmt(f),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Datetime> for Value {
    fn from(dt: Datetime) -> Self {
        Value::Datetime(dt)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Value::Date(d)
    }
}

impl From<Time> for Value {
    fn from(t: Time) -> Self {
        Value::Time(t)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items.into())
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}
