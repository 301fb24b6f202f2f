//! Token stream → value tree.
//!
//! A recursive-descent parser with one-token lookahead. The parser owns all
//! value decoding: strings lose their delimiters and escapes here, numbers
//! and date-times are range-checked here, and the structural rules of TOML
//! (duplicate keys, closed tables, arrays of tables) are enforced while the
//! tree is built.

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

use crate::array::Array;
use crate::error::{Error, ErrorContext, ErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::table::{Definition, Table};
use crate::time::Moment;
use crate::value::Value;
use crate::Span;

/// Maximum nesting of arrays and inline tables in value position.
const MAX_RECURSION_DEPTH: u32 = 128;

/// Parses a TOML document into its root [`Table`].
///
/// The returned tree owns all of its storage; the source buffer may be
/// dropped immediately afterwards.
///
/// ```
/// let root = tomlet::parse("name = \"test\"")?;
/// assert_eq!(root.get_str("name"), Some("test"));
/// # Ok::<(), tomlet::Error>(())
/// ```
pub fn parse(source: &str) -> Result<Table, Error> {
    if source.len() > u32::MAX as usize {
        return Err(Error::new(
            ErrorKind::Custom("document exceeds the maximum supported size".into()),
            Span::new(0, 0),
        ));
    }
    Parser::new(source).document()
}

/// Parses a TOML document, resolving any failure against the source text.
///
/// On error the [`ErrorContext`] carries the 1-based line and column, the
/// offending source line, the message, and an optional hint — everything
/// needed to print a caret diagnostic.
///
/// ```
/// let err = tomlet::parse_with_context("port = 99999x").unwrap_err();
/// assert_eq!(err.line, 1);
/// ```
pub fn parse_with_context(source: &str) -> Result<Table, ErrorContext<'_>> {
    parse(source).map_err(|e| ErrorContext::new(&e, source))
}

/// A decoded key segment with its source position.
struct Key {
    name: String,
    span: Span,
}

struct Parser<'s> {
    source: &'s str,
    lexer: Lexer<'s>,
    peeked: Option<Token>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            lexer: Lexer::new(source),
            peeked: None,
        }
    }

    fn next(&mut self) -> Result<Token, Error> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> Result<Token, Error> {
        match self.peeked {
            Some(token) => Ok(token),
            None => {
                let token = self.lexer.next_token()?;
                self.peeked = Some(token);
                Ok(token)
            }
        }
    }

    fn text(&self, span: Span) -> &'s str {
        &self.source[std::ops::Range::<usize>::from(span)]
    }

    /// `expected …, found …` for a token that does not fit the production.
    /// An exhausted stream reports [`ErrorKind::UnexpectedEof`] instead.
    fn wanted(&self, expected: &'static str, found: Token) -> Error {
        if found.kind == TokenKind::Eof {
            Error::new(ErrorKind::UnexpectedEof, found.span)
        } else {
            Error::new(
                ErrorKind::Wanted {
                    expected,
                    found: found.describe(),
                },
                found.span,
            )
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, Error> {
        let token = self.next()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.wanted(expected, token))
        }
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool, Error> {
        if self.peek()?.kind == kind {
            self.peeked = None;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn skip_newlines(&mut self) -> Result<(), Error> {
        while self.eat(TokenKind::Newline)? {}
        Ok(())
    }

    fn newline_or_eof(&mut self) -> Result<(), Error> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Newline | TokenKind::Eof => Ok(()),
            _ => Err(self.wanted("a newline", token)),
        }
    }

    // ── document structure ──────────────────────────────────────────

    fn document(mut self) -> Result<Table, Error> {
        let mut root = Table::new();
        // The table that key/value expressions currently land in, as the
        // path of the open section. Re-resolved per expression; every
        // segment was vetted when its header was processed.
        let mut path: Vec<String> = Vec::new();

        loop {
            let token = self.peek()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.peeked = None;
                }
                TokenKind::LeftBracket => {
                    path = self.header(&mut root)?;
                }
                _ => {
                    let table = resolve_path(&mut root, &path);
                    self.keyval(table, MAX_RECURSION_DEPTH)?;
                    self.newline_or_eof()?;
                }
            }
        }
        Ok(root)
    }

    /// `[a.b.c]` or `[[a.b.c]]`. Returns the path the section selects.
    fn header(&mut self, root: &mut Table) -> Result<Vec<String>, Error> {
        let open = self.expect(TokenKind::LeftBracket, "a left bracket")?;

        // `[[` must be two adjacent brackets; `[ [` is a malformed key.
        let is_array = self.peek()?.kind == TokenKind::LeftBracket
            && self.peek()?.span.start == open.span.end;
        if is_array {
            self.peeked = None;
        }

        let mut keys = vec![self.key()?];
        while self.eat(TokenKind::Dot)? {
            keys.push(self.key()?);
        }

        let close = self.expect(TokenKind::RightBracket, "a right bracket")?;
        if is_array {
            let second = self.expect(TokenKind::RightBracket, "a right bracket")?;
            if second.span.start != close.span.end {
                return Err(Error::new(
                    ErrorKind::Wanted {
                        expected: "a right bracket",
                        found: "whitespace",
                    },
                    Span::new(close.span.end, second.span.start),
                ));
            }
        }
        self.newline_or_eof()?;

        let mut current: &mut Table = root;
        let (last, intermediates) = keys.split_last().expect("header has at least one key");
        for key in intermediates {
            current = navigate_header_intermediate(current, key)?;
        }
        if is_array {
            navigate_header_array_final(current, last)?;
        } else {
            navigate_header_table_final(current, last)?;
        }

        Ok(keys.into_iter().map(|k| k.name).collect())
    }

    /// One key segment: a bare identifier or a single-line string.
    fn key(&mut self) -> Result<Key, Error> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Ident => Ok(Key {
                name: self.text(token.span).to_owned(),
                span: token.span,
            }),
            TokenKind::Str {
                multiline: true, ..
            } => Err(self.wanted("a single-line key", token)),
            TokenKind::Str { literal, .. } => {
                let name = self.decode_string(token, literal, false)?;
                if name.is_empty() {
                    return Err(Error::new(
                        ErrorKind::InvalidValue("keys must not be empty"),
                        token.span,
                    ));
                }
                Ok(Key {
                    name,
                    span: token.span,
                })
            }
            _ => Err(self.wanted("a key", token)),
        }
    }

    /// `key ('.' key)* '=' value`, inserted into `table`.
    fn keyval(&mut self, table: &mut Table, depth: u32) -> Result<(), Error> {
        let mut current: &mut Table = table;
        let mut key = self.key()?;
        while self.eat(TokenKind::Dot)? {
            current = navigate_dotted_key(current, &key)?;
            key = self.key()?;
        }

        self.expect(TokenKind::Equals, "an equals")?;
        let value = self.value(depth)?;

        if current.contains_key(&key.name) {
            return Err(Error::new(
                ErrorKind::DuplicateKey { key: key.name },
                key.span,
            ));
        }
        current.insert(key.name, value);
        Ok(())
    }

    // ── values ──────────────────────────────────────────────────────

    fn value(&mut self, depth: u32) -> Result<Value, Error> {
        if depth == 0 {
            let span = self.peek()?.span;
            return Err(Error::new(
                ErrorKind::InvalidValue("nesting is too deep"),
                span,
            ));
        }
        let token = self.next()?;
        match token.kind {
            TokenKind::Str { literal, multiline } => self
                .decode_string(token, literal, multiline)
                .map(Value::String),
            TokenKind::Integer => self.decode_integer(token),
            TokenKind::Float => self.decode_float(token),
            TokenKind::Boolean(b) => Ok(Value::Boolean(b)),
            TokenKind::Datetime => self.decode_datetime(token),
            TokenKind::LeftBracket => self.array_value(depth),
            TokenKind::LeftBrace => self.inline_table(depth),
            _ => Err(self.wanted("a value", token)),
        }
    }

    /// `[ v1, v2, … ]` with newlines permitted anywhere inside and one
    /// trailing comma tolerated. Elements may be of mixed type.
    fn array_value(&mut self, depth: u32) -> Result<Value, Error> {
        let mut array = Array::new();
        loop {
            self.skip_newlines()?;
            if self.eat(TokenKind::RightBracket)? {
                break;
            }
            array.push(self.value(depth - 1)?);
            self.skip_newlines()?;
            if self.eat(TokenKind::Comma)? {
                continue;
            }
            self.skip_newlines()?;
            let token = self.next()?;
            if token.kind == TokenKind::RightBracket {
                break;
            }
            return Err(self.wanted("a comma or a right bracket", token));
        }
        Ok(Value::Array(array))
    }

    /// `{ k = v, … }`. Newlines are not permitted between the braces, a
    /// trailing comma is not permitted, and the finished table — along with
    /// everything inside it — is closed to later extension.
    fn inline_table(&mut self, depth: u32) -> Result<Value, Error> {
        let mut table = Table::with_definition(Definition::Inline);
        if self.eat(TokenKind::RightBrace)? {
            return Ok(Value::Table(table));
        }
        loop {
            self.keyval(&mut table, depth - 1)?;
            if self.eat(TokenKind::RightBrace)? {
                break;
            }
            self.expect(TokenKind::Comma, "a comma or a right brace")?;
        }
        Ok(Value::Table(table))
    }

    // ── scalar decoding ─────────────────────────────────────────────

    /// Strips delimiters and decodes escapes. `token` must be a string.
    fn decode_string(
        &self,
        token: Token,
        literal: bool,
        multiline: bool,
    ) -> Result<String, Error> {
        let raw = self.text(token.span);
        let mut content = if multiline {
            &raw[3..raw.len() - 3]
        } else {
            &raw[1..raw.len() - 1]
        };
        if multiline {
            // One immediately-following newline is trimmed.
            if let Some(rest) = content.strip_prefix("\r\n") {
                content = rest;
            } else if let Some(rest) = content.strip_prefix('\n') {
                content = rest;
            }
        }
        if literal || !content.contains('\\') {
            return Ok(content.to_owned());
        }
        // `content` is a subslice of the source; recover its offset for
        // error spans.
        let content_offset = content.as_ptr() as usize - self.source.as_ptr() as usize;
        decode_escapes(content, content_offset as u32)
    }

    fn decode_integer(&self, token: Token) -> Result<Value, Error> {
        let raw = self.text(token.span).as_bytes();
        let span = token.span;
        let invalid = |rule| Err(Error::new(ErrorKind::InvalidValue(rule), span));

        let (negative, digits) = match raw.first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };

        if digits.len() >= 2
            && digits[0] == b'0'
            && matches!(digits[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
        {
            return invalid("integers may not use hex, octal, or binary prefixes");
        }

        let mut acc: u64 = 0;
        let mut has_digit = false;
        let mut prev_underscore = false;
        let mut leading_zero = false;
        for &b in digits {
            if b == b'_' {
                if !has_digit || prev_underscore {
                    return invalid("underscores must be surrounded by digits");
                }
                prev_underscore = true;
                continue;
            }
            if !b.is_ascii_digit() {
                return invalid("malformed number");
            }
            if leading_zero {
                return invalid("leading zeros are not allowed");
            }
            if !has_digit && b == b'0' {
                leading_zero = true;
            }
            has_digit = true;
            prev_underscore = false;
            acc = match acc
                .checked_mul(10)
                .and_then(|a| a.checked_add((b - b'0') as u64))
            {
                Some(v) => v,
                None => return invalid("integer is out of range"),
            };
        }
        if !has_digit {
            return invalid("malformed number");
        }
        if prev_underscore {
            return invalid("underscores must be surrounded by digits");
        }

        let max = if negative {
            (i64::MAX as u64) + 1
        } else {
            i64::MAX as u64
        };
        if acc > max {
            return invalid("integer is out of range");
        }
        let value = if negative {
            (acc as i64).wrapping_neg()
        } else {
            acc as i64
        };
        Ok(Value::Integer(value))
    }

    fn decode_float(&self, token: Token) -> Result<Value, Error> {
        let raw = self.text(token.span);
        let span = token.span;
        let invalid = |rule| Err(Error::new(ErrorKind::InvalidValue(rule), span));

        let (negative, body) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };
        match body {
            "inf" => {
                return Ok(Value::Float(if negative {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }));
            }
            "nan" => {
                return Ok(Value::Float(if negative {
                    f64::NAN.copysign(-1.0)
                } else {
                    f64::NAN
                }));
            }
            _ => {}
        }

        let bytes = body.as_bytes();
        // Rust's float grammar is laxer than TOML's: shapes like `.5` parse
        // there but the integral digit is mandatory here.
        if !bytes.first().is_some_and(|b| b.is_ascii_digit()) {
            return invalid("malformed number");
        }
        if bytes.len() >= 2 && bytes[0] == b'0' && matches!(bytes[1], b'0'..=b'9' | b'_') {
            return invalid("leading zeros are not allowed");
        }
        // Underscores are digit separators and nothing else: every
        // underscore needs an ASCII digit on both sides.
        for (i, &b) in bytes.iter().enumerate() {
            if b != b'_' {
                continue;
            }
            let before = i.checked_sub(1).map(|j| bytes[j]);
            let after = bytes.get(i + 1).copied();
            if !before.is_some_and(|b| b.is_ascii_digit())
                || !after.is_some_and(|b| b.is_ascii_digit())
            {
                return invalid("underscores must be surrounded by digits");
            }
        }

        let mut cleaned = String::with_capacity(raw.len() + 1);
        if negative {
            cleaned.push('-');
        }
        cleaned.extend(body.chars().filter(|&c| c != '_'));
        let value: f64 = match cleaned.parse() {
            Ok(v) => v,
            Err(_) => return invalid("malformed number"),
        };
        if !value.is_finite() {
            return invalid("float is out of range");
        }
        Ok(Value::Float(value))
    }

    fn decode_datetime(&self, token: Token) -> Result<Value, Error> {
        match Moment::parse(self.text(token.span)) {
            Ok(Moment::Datetime(dt)) => Ok(Value::Datetime(dt)),
            Ok(Moment::Date(d)) => Ok(Value::Date(d)),
            Ok(Moment::Time(t)) => Ok(Value::Time(t)),
            Err(rule) => Err(Error::new(ErrorKind::InvalidValue(rule), token.span)),
        }
    }
}

/// Re-resolves the open section path to its table. Every segment was
/// created and type-checked by [`Parser::header`], so the walk cannot fail.
fn resolve_path<'t>(root: &'t mut Table, path: &[String]) -> &'t mut Table {
    let mut current = root;
    for segment in path {
        let value = current
            .get_mut(segment)
            .expect("section path segments exist once the header is processed");
        current = match value {
            Value::Table(t) => t,
            Value::Array(a) => a
                .last_mut()
                .expect("arrays of tables hold at least one entry")
                .as_table_mut()
                .expect("array-of-tables entries are tables"),
            _ => unreachable!("section paths only traverse tables and arrays of tables"),
        };
    }
    current
}

/// Walks one intermediate segment of a header path, creating an implicit
/// table when the key is absent. Arrays of tables are traversed through
/// their last entry; anything closed or non-table is a structural error.
fn navigate_header_intermediate<'t>(table: &'t mut Table, key: &Key) -> Result<&'t mut Table, Error> {
    if !table.contains_key(&key.name) {
        table.insert(
            key.name.clone(),
            Value::Table(Table::with_definition(Definition::Implicit)),
        );
    }
    match table.get_mut(&key.name).expect("key was just ensured") {
        Value::Table(t) if t.definition != Definition::Inline => Ok(t),
        Value::Array(a) if a.from_headers => Ok(a
            .last_mut()
            .expect("arrays of tables hold at least one entry")
            .as_table_mut()
            .expect("array-of-tables entries are tables")),
        _ => Err(Error::new(
            ErrorKind::InvalidTable {
                key: key.name.clone(),
            },
            key.span,
        )),
    }
}

/// The final segment of `[a.b.c]`: create the table, or promote a
/// previously implicit one. A table that was already defined — by an
/// earlier header, as an inline value, or as any non-table — cannot be
/// (re)opened.
fn navigate_header_table_final(table: &mut Table, key: &Key) -> Result<(), Error> {
    match table.get_mut(&key.name) {
        None => {
            table.insert(
                key.name.clone(),
                Value::Table(Table::with_definition(Definition::Explicit)),
            );
            Ok(())
        }
        Some(Value::Table(t)) if t.definition == Definition::Implicit => {
            t.definition = Definition::Explicit;
            Ok(())
        }
        Some(_) => Err(Error::new(
            ErrorKind::InvalidTable {
                key: key.name.clone(),
            },
            key.span,
        )),
    }
}

/// The final segment of `[[a.b.c]]`: append a fresh table to the array,
/// creating the array on first use. A value array or any other existing
/// value at the key is a structural error.
fn navigate_header_array_final(table: &mut Table, key: &Key) -> Result<(), Error> {
    match table.get_mut(&key.name) {
        None => {
            let mut array = Array::new();
            array.from_headers = true;
            array.push(Value::Table(Table::with_definition(Definition::Explicit)));
            table.insert(key.name.clone(), Value::Array(array));
            Ok(())
        }
        Some(Value::Array(a)) if a.from_headers => {
            a.push(Value::Table(Table::with_definition(Definition::Explicit)));
            Ok(())
        }
        Some(_) => Err(Error::new(
            ErrorKind::InvalidTable {
                key: key.name.clone(),
            },
            key.span,
        )),
    }
}

/// Walks one intermediate segment of a dotted key, creating an implicit
/// table when absent. Only tables still open to dotted extension — those
/// not defined by a header and not inline — may be traversed.
fn navigate_dotted_key<'t>(table: &'t mut Table, key: &Key) -> Result<&'t mut Table, Error> {
    if !table.contains_key(&key.name) {
        table.insert(
            key.name.clone(),
            Value::Table(Table::with_definition(Definition::Implicit)),
        );
    }
    match table.get_mut(&key.name).expect("key was just ensured") {
        Value::Table(t) if t.definition == Definition::Implicit => Ok(t),
        _ => Err(Error::new(
            ErrorKind::InvalidTable {
                key: key.name.clone(),
            },
            key.span,
        )),
    }
}

/// Decodes backslash escapes in basic-string content. `offset` is the byte
/// position of `content` within the source, for error spans.
fn decode_escapes(content: &str, offset: u32) -> Result<String, Error> {
    let bytes = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            let end = content[i..]
                .find('\\')
                .map_or(content.len(), |j| i + j);
            out.push_str(&content[i..end]);
            i = end;
            continue;
        }
        let escape_at = offset + i as u32;
        i += 1;
        match bytes.get(i) {
            Some(b'b') => {
                out.push('\u{8}');
                i += 1;
            }
            Some(b't') => {
                out.push('\t');
                i += 1;
            }
            Some(b'n') => {
                out.push('\n');
                i += 1;
            }
            Some(b'f') => {
                out.push('\u{c}');
                i += 1;
            }
            Some(b'r') => {
                out.push('\r');
                i += 1;
            }
            Some(b'"') => {
                out.push('"');
                i += 1;
            }
            Some(b'\\') => {
                out.push('\\');
                i += 1;
            }
            Some(b'u') => {
                i += 1;
                i += push_hex_escape(&content[i..], 4, &mut out, escape_at)?;
            }
            Some(b'U') => {
                i += 1;
                i += push_hex_escape(&content[i..], 8, &mut out, escape_at)?;
            }
            Some(b' ' | b'\t' | b'\r' | b'\n') => {
                // Line-ending backslash: drop everything through the line
                // terminator and all ASCII whitespace that follows it.
                while matches!(bytes.get(i), Some(b' ' | b'\t')) {
                    i += 1;
                }
                if bytes.get(i) == Some(&b'\r') {
                    i += 1;
                }
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                while matches!(bytes.get(i), Some(b' ' | b'\t' | b'\r' | b'\n')) {
                    i += 1;
                }
            }
            other => {
                let c = other.map_or(char::REPLACEMENT_CHARACTER, |&b| b as char);
                return Err(Error::new(
                    ErrorKind::InvalidEscape(c),
                    Span::new(escape_at, escape_at + 2),
                ));
            }
        }
    }
    Ok(out)
}

/// Decodes an `n`-digit hex escape at the front of `rest` into `out`,
/// returning the number of bytes consumed.
fn push_hex_escape(rest: &str, n: usize, out: &mut String, escape_at: u32) -> Result<usize, Error> {
    let span = Span::new(escape_at, escape_at + 2 + n as u32);
    let digits = rest
        .get(..n)
        .ok_or_else(|| Error::new(ErrorKind::InvalidValue("truncated hex escape"), span))?;
    let value = u32::from_str_radix(digits, 16)
        .map_err(|_| Error::new(ErrorKind::InvalidValue("malformed hex escape"), span))?;
    match char::from_u32(value) {
        Some(c) => {
            out.push(c);
            Ok(n)
        }
        None => Err(Error::new(
            ErrorKind::InvalidValue("escape does not encode a valid Unicode scalar"),
            span,
        )),
    }
}
