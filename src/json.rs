//! Value tree → JSON text.
//!
//! A small emitter with a compact and a pretty layout. Date-time values
//! become their RFC 3339 strings; non-finite floats become `null`, since
//! JSON has no spelling for them.

#[cfg(test)]
#[path = "./json_tests.rs"]
mod tests;

use crate::array::Array;
use crate::table::Table;
use crate::value::Value;
use std::fmt::Write as _;

/// Serializes a table as compact JSON.
///
/// ```
/// let root = tomlet::parse("a = 1")?;
/// assert_eq!(tomlet::to_json(&root), "{\"a\":1}");
/// # Ok::<(), tomlet::Error>(())
/// ```
pub fn to_json(table: &Table) -> String {
    let mut emitter = Emitter {
        out: String::new(),
        indent: 0,
        pretty: false,
    };
    emitter.table(table, 0);
    emitter.out
}

/// Serializes a table as pretty-printed JSON with `indent` spaces per level.
pub fn to_json_pretty(table: &Table, indent: usize) -> String {
    let mut emitter = Emitter {
        out: String::new(),
        indent,
        pretty: true,
    };
    emitter.table(table, 0);
    emitter.out
}

struct Emitter {
    out: String,
    indent: usize,
    pretty: bool,
}

/// Short all-scalar arrays stay on one line even in pretty output.
fn inlines_in_pretty(array: &Array) -> bool {
    array.len() <= 5
        && array
            .iter()
            .all(|v| !matches!(v, Value::Array(_) | Value::Table(_)))
}

impl Emitter {
    fn newline_indent(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth * self.indent {
            self.out.push(' ');
        }
    }

    fn table(&mut self, table: &Table, depth: usize) {
        if table.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        for (i, (key, value)) in table.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            if self.pretty {
                self.newline_indent(depth + 1);
            }
            push_json_string(&mut self.out, key);
            self.out.push(':');
            if self.pretty {
                self.out.push(' ');
            }
            self.value(value, depth + 1);
        }
        if self.pretty {
            self.newline_indent(depth);
        }
        self.out.push('}');
    }

    fn array(&mut self, array: &Array, depth: usize) {
        if array.is_empty() {
            self.out.push_str("[]");
            return;
        }
        let inline = !self.pretty || inlines_in_pretty(array);
        self.out.push('[');
        for (i, value) in array.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
                if self.pretty && inline {
                    self.out.push(' ');
                }
            }
            if !inline {
                self.newline_indent(depth + 1);
            }
            self.value(value, depth + 1);
        }
        if !inline {
            self.newline_indent(depth);
        }
        self.out.push(']');
    }

    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::String(s) => push_json_string(&mut self.out, s),
            Value::Integer(i) => {
                let _ = write!(self.out, "{i}");
            }
            Value::Float(f) => {
                if !f.is_finite() {
                    self.out.push_str("null");
                } else if *f == f.trunc() {
                    let _ = write!(self.out, "{f:.1}");
                } else {
                    let _ = write!(self.out, "{f}");
                }
            }
            Value::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Datetime(dt) => push_json_string(&mut self.out, &dt.to_string()),
            Value::Date(d) => push_json_string(&mut self.out, &d.to_string()),
            Value::Time(t) => push_json_string(&mut self.out, &t.to_string()),
            Value::Array(a) => self.array(a, depth),
            Value::Table(t) => self.table(t, depth),
        }
    }
}

fn push_json_string(out: &mut String, s: &str) {
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
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
