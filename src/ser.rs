//! Value tree → TOML text.
//!
//! Emission walks each table in three passes so that a section header can
//! never capture a sibling scalar: first the plain key/value pairs (scalars,
//! inline tables, and arrays that are not arrays of tables), then sub-table
//! sections, then arrays of tables. Output always round-trips: parsing the
//! emitted text reproduces the tree up to key order.

#[cfg(test)]
#[path = "./ser_tests.rs"]
mod tests;

use crate::array::Array;
use crate::table::{Definition, Table};
use crate::value::Value;
use std::fmt::Write as _;

/// Formatting options for [`stringify_with_options`].
///
/// The option set is closed — these four knobs are everything the emitter
/// understands.
///
/// ```
/// use tomlet::FormatOptions;
///
/// let options = FormatOptions::new().with_sorted_keys(true).with_indent(4);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug)]
pub struct FormatOptions {
    /// Columns per nesting level (default 2).
    pub indent: usize,
    /// Indent with spaces; when `false`, one tab per level (default true).
    pub use_spaces: bool,
    /// Blank line between sibling sections and array-of-tables elements
    /// (default true).
    pub blank_lines: bool,
    /// Emit each table's keys in byte-wise ascending order (default false:
    /// insertion order).
    pub sort_keys: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            use_spaces: true,
            blank_lines: true,
            sort_keys: false,
        }
    }
}

impl FormatOptions {
    /// Creates the default option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of columns per nesting level.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Chooses spaces (`true`) or tabs (`false`) for indentation.
    #[must_use]
    pub fn with_spaces(mut self, use_spaces: bool) -> Self {
        self.use_spaces = use_spaces;
        self
    }

    /// Enables or disables blank lines between sibling sections.
    #[must_use]
    pub fn with_blank_lines(mut self, blank_lines: bool) -> Self {
        self.blank_lines = blank_lines;
        self
    }

    /// Enables or disables byte-wise key sorting.
    #[must_use]
    pub fn with_sorted_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }
}

/// Serializes a table to TOML text with default options.
///
/// ```
/// let root = tomlet::parse("name = \"test\"")?;
/// assert_eq!(tomlet::stringify(&root), "name = \"test\"\n");
/// # Ok::<(), tomlet::Error>(())
/// ```
pub fn stringify(table: &Table) -> String {
    stringify_with_options(table, &FormatOptions::default())
}

/// Serializes a table to TOML text with the given options.
pub fn stringify_with_options(table: &Table, options: &FormatOptions) -> String {
    let mut ser = Serializer {
        out: String::new(),
        options,
    };
    let mut path = Vec::new();
    ser.emit_table(table, &mut path, 0);
    ser.out
}

struct Serializer<'o> {
    out: String,
    options: &'o FormatOptions,
}

/// Does this value start its own section rather than a `key = value` line?
enum Placement {
    Pair,
    Section,
    SectionArray,
}

fn placement(value: &Value) -> Placement {
    match value {
        Value::Table(t) if t.definition != Definition::Inline => Placement::Section,
        Value::Array(a) if a.is_array_of_tables() => Placement::SectionArray,
        _ => Placement::Pair,
    }
}

impl Serializer<'_> {
    fn keys_in_order<'t>(&self, table: &'t Table) -> Vec<&'t str> {
        let mut keys: Vec<&str> = table.keys().map(String::as_str).collect();
        if self.options.sort_keys {
            keys.sort_unstable();
        }
        keys
    }

    fn indent(&mut self, depth: usize) {
        if self.options.use_spaces {
            for _ in 0..depth * self.options.indent {
                self.out.push(' ');
            }
        } else {
            for _ in 0..depth {
                self.out.push('\t');
            }
        }
    }

    fn section_gap(&mut self) {
        if self.options.blank_lines && !self.out.is_empty() {
            self.out.push('\n');
        }
    }

    fn header(&mut self, path: &[&str], key: &str, depth: usize, double: bool) {
        self.section_gap();
        self.indent(depth);
        let (open, close) = if double { ("[[", "]]") } else { ("[", "]") };
        self.out.push_str(open);
        for segment in path {
            push_key(&mut self.out, segment);
            self.out.push('.');
        }
        push_key(&mut self.out, key);
        self.out.push_str(close);
        self.out.push('\n');
    }

    fn emit_table<'t>(&mut self, table: &'t Table, path: &mut Vec<&'t str>, depth: usize) {
        let keys = self.keys_in_order(table);

        for &key in &keys {
            let value = table.get(key).expect("key was just listed");
            if matches!(placement(value), Placement::Pair) {
                self.indent(depth);
                push_key(&mut self.out, key);
                self.out.push_str(" = ");
                self.value(value);
                self.out.push('\n');
            }
        }

        for &key in &keys {
            let value = table.get(key).expect("key was just listed");
            if let (Placement::Section, Value::Table(sub)) = (placement(value), value) {
                self.header(path, key, depth, false);
                path.push(key);
                self.emit_table(sub, path, depth + 1);
                path.pop();
            }
        }

        for &key in &keys {
            let value = table.get(key).expect("key was just listed");
            if let (Placement::SectionArray, Value::Array(array)) = (placement(value), value) {
                for element in array {
                    let sub = element
                        .as_table()
                        .expect("array-of-tables elements are tables");
                    self.header(path, key, depth, true);
                    path.push(key);
                    self.emit_table(sub, path, depth + 1);
                    path.pop();
                }
            }
        }
    }

    fn value(&mut self, value: &Value) {
        match value {
            Value::String(s) => push_basic_string(&mut self.out, s),
            Value::Integer(i) => {
                let _ = write!(self.out, "{i}");
            }
            Value::Float(f) => push_float(&mut self.out, *f),
            Value::Boolean(b) => {
                self.out.push_str(if *b { "true" } else { "false" });
            }
            Value::Datetime(dt) => {
                let _ = write!(self.out, "{dt}");
            }
            Value::Date(d) => {
                let _ = write!(self.out, "{d}");
            }
            Value::Time(t) => {
                let _ = write!(self.out, "{t}");
            }
            Value::Array(array) => self.inline_array(array),
            Value::Table(table) => self.inline_table(table),
        }
    }

    fn inline_array(&mut self, array: &Array) {
        self.out.push('[');
        for (i, element) in array.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.value(element);
        }
        self.out.push(']');
    }

    fn inline_table(&mut self, table: &Table) {
        if table.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{ ");
        for (i, key) in self.keys_in_order(table).into_iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            push_key(&mut self.out, key);
            self.out.push_str(" = ");
            self.value(table.get(key).expect("key was just listed"));
        }
        self.out.push_str(" }");
    }
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Keys emit bare when they can; anything else becomes a quoted basic
/// string.
fn push_key(out: &mut String, key: &str) {
    if is_bare_key(key) {
        out.push_str(key);
    } else {
        push_basic_string(out, key);
    }
}

fn push_basic_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            // Remaining control characters have no short escape but would
            // not survive a reparse if emitted raw.
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Floats keep their floatness: integral finite values gain a `.0` so they
/// reparse as floats, and the non-finite values use their TOML spellings.
fn push_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str(if f.is_sign_negative() { "-nan" } else { "nan" });
    } else if f.is_infinite() {
        out.push_str(if f < 0.0 { "-inf" } else { "inf" });
    } else if f == f.trunc() {
        let _ = write!(out, "{f:.1}");
    } else {
        let _ = write!(out, "{f}");
    }
}
