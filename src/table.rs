//! The [`Table`] value container.

#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

use crate::array::Array;
use crate::time::{Date, Datetime, Time};
use crate::value::Value;
use indexmap::IndexMap;

/// How a table came into existence during parsing. Drives the
/// duplicate-definition discipline; irrelevant once parsing is done except
/// that `Inline` tables serialize back in `{ … }` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum Definition {
    /// Created as an intermediate of a dotted key or header path. May be
    /// promoted to `Explicit` by a header exactly once.
    #[default]
    Implicit,
    /// Defined by a `[header]` (or as an `[[array]]` element). Closed to
    /// re-declaration.
    Explicit,
    /// Written as an inline `{ … }` value. Closed entirely.
    Inline,
}

/// A TOML table: a mapping from string keys to [`Value`]s.
///
/// Keys are unique and kept in insertion order. A parsed document is rooted
/// in a `Table`; equality ignores key order, matching TOML semantics.
#[derive(Clone, Default)]
pub struct Table {
    entries: IndexMap<String, Value>,
    pub(crate) definition: Definition,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_definition(definition: Definition) -> Self {
        Self {
            entries: IndexMap::new(),
            definition,
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a reference to the value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns `true` if the table contains `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// already present.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Removes `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Iterates over `(key, value)` pairs with mutable values.
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Value> {
        self.entries.iter_mut()
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.entries.keys()
    }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.entries.values()
    }
}

/// Typed getters: each returns the value only when the key is present *and*
/// the stored variant matches.
impl Table {
    /// Returns the string at `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the integer at `key`, if present and an integer.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_integer)
    }

    /// Returns the float at `key`, if present and a float.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_float)
    }

    /// Returns the boolean at `key`, if present and a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Returns the date-time at `key`, if present and a date-time.
    pub fn get_datetime(&self, key: &str) -> Option<&Datetime> {
        self.get(key).and_then(Value::as_datetime)
    }

    /// Returns the date at `key`, if present and a date.
    pub fn get_date(&self, key: &str) -> Option<&Date> {
        self.get(key).and_then(Value::as_date)
    }

    /// Returns the time at `key`, if present and a time.
    pub fn get_time(&self, key: &str) -> Option<&Time> {
        self.get(key).and_then(Value::as_time)
    }

    /// Returns the array at `key`, if present and an array.
    pub fn get_array(&self, key: &str) -> Option<&Array> {
        self.get(key).and_then(Value::as_array)
    }

    /// Returns the table at `key`, if present and a table.
    pub fn get_table(&self, key: &str) -> Option<&Table> {
        self.get(key).and_then(Value::as_table)
    }

    /// Walks a dotted path such as `"server.ports.http"` and returns the
    /// final value. Any missing segment or non-table intermediate yields
    /// `None`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl FromIterator<(String, Value)> for Table {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: IndexMap::from_iter(iter),
            definition: Definition::Implicit,
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Table {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
