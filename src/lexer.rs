//! Byte stream → token stream.
//!
//! A single forward pass with one-byte lookahead, plus fixed-width peeks to
//! tell dates and times apart from numbers. Horizontal whitespace and
//! comments are skipped silently; newlines are explicit tokens because the
//! grammar is line-oriented.
//!
//! The lexer never decodes anything: string tokens keep their delimiters and
//! escapes (escape *shapes* are validated here), number and date-time tokens
//! keep their raw lexeme. Decoding happens in the parser.

#[cfg(test)]
#[path = "./lexer_tests.rs"]
mod tests;

use crate::error::{Error, ErrorKind};
use crate::time;
use crate::Span;

/// The lexical classes of TOML.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// A bare identifier (key, or a stray word in value position).
    Ident,
    /// A string of any form; delimiters included in the span.
    Str {
        /// `'…'` / `'''…'''` rather than `"…"` / `"""…"""`.
        literal: bool,
        /// Triple-delimited form.
        multiline: bool,
    },
    /// An integer-shaped number.
    Integer,
    /// A float-shaped number (fraction, exponent, `inf`, or `nan`).
    Float,
    /// `true` or `false`.
    Boolean(bool),
    /// A date, time, or date-time lexeme (also used for bare times; the
    /// parser classifies it).
    Datetime,
    /// `=`
    Equals,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `\n` or `\r\n`
    Newline,
    /// End of input.
    Eof,
}

/// A token with its source position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Fixed description used in `expected …, found …` messages.
    pub(crate) fn describe(&self) -> &'static str {
        match self.kind {
            TokenKind::Ident => "an identifier",
            TokenKind::Str { .. } => "a string",
            TokenKind::Integer => "an integer",
            TokenKind::Float => "a float",
            TokenKind::Boolean(_) => "a boolean",
            TokenKind::Datetime => "a date-time",
            TokenKind::Equals => "an equals",
            TokenKind::Comma => "a comma",
            TokenKind::Dot => "a period",
            TokenKind::LeftBracket => "a left bracket",
            TokenKind::RightBracket => "a right bracket",
            TokenKind::LeftBrace => "a left brace",
            TokenKind::RightBrace => "a right brace",
            TokenKind::Newline => "a newline",
            TokenKind::Eof => "eof",
        }
    }
}

#[inline]
fn is_keylike_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Bytes permitted inside a comment: tab, printable ASCII minus DEL, and
/// everything non-ASCII.
#[inline]
fn is_comment_byte(b: u8) -> bool {
    matches!(b, 0x09 | 0x20..=0x7E | 0x80..)
}

pub(crate) struct Lexer<'s> {
    bytes: &'s [u8],
    cursor: usize,
}

impl<'s> Lexer<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        let bytes = source.as_bytes();
        // Skip a UTF-8 BOM (EF BB BF) if present.
        let cursor = if bytes.starts_with(b"\xef\xbb\xbf") { 3 } else { 0 };
        Self { bytes, cursor }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.cursor + offset).copied()
    }

    #[inline]
    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// The character at the cursor, for error payloads. The input arrived as
    /// `&str`, so decoding cannot fail.
    fn char_at_cursor(&self) -> char {
        std::str::from_utf8(&self.bytes[self.cursor.min(self.bytes.len())..])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn error(&self, kind: ErrorKind, start: usize, end: usize) -> Error {
        Error::new(kind, Span::new(start as u32, end as u32))
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span::new(start as u32, self.cursor as u32),
        }
    }

    /// Produces the next token, skipping whitespace and comments.
    pub(crate) fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            let start = self.cursor;
            let Some(b) = self.peek() else {
                return Ok(self.token(TokenKind::Eof, start));
            };
            match b {
                b' ' | b'\t' => {
                    self.cursor += 1;
                }
                b'#' => {
                    self.cursor += 1;
                    while let Some(b) = self.peek() {
                        if b == b'\n' || (b == b'\r' && self.peek_at(1) == Some(b'\n')) {
                            break;
                        }
                        if !is_comment_byte(b) {
                            return Err(self.error(
                                ErrorKind::UnexpectedCharacter(self.char_at_cursor()),
                                self.cursor,
                                self.cursor + 1,
                            ));
                        }
                        self.cursor += 1;
                    }
                }
                b'\n' => {
                    self.cursor += 1;
                    return Ok(self.token(TokenKind::Newline, start));
                }
                b'\r' => {
                    if self.peek_at(1) == Some(b'\n') {
                        self.cursor += 2;
                        return Ok(self.token(TokenKind::Newline, start));
                    }
                    return Err(self.error(
                        ErrorKind::UnexpectedCharacter('\r'),
                        start,
                        start + 1,
                    ));
                }
                b'=' => return Ok(self.single(TokenKind::Equals)),
                b',' => return Ok(self.single(TokenKind::Comma)),
                b'.' => return Ok(self.single(TokenKind::Dot)),
                b'[' => return Ok(self.single(TokenKind::LeftBracket)),
                b']' => return Ok(self.single(TokenKind::RightBracket)),
                b'{' => return Ok(self.single(TokenKind::LeftBrace)),
                b'}' => return Ok(self.single(TokenKind::RightBrace)),
                b'"' => return self.string(start, b'"'),
                b'\'' => return self.string(start, b'\''),
                b'A'..=b'Z' | b'a'..=b'z' | b'_' => return Ok(self.word(start)),
                b'0'..=b'9' => {
                    let rest = &self.bytes[self.cursor..];
                    if time::looks_like_date(rest) || time::looks_like_time(rest) {
                        self.cursor += time::scan(rest);
                        return Ok(self.token(TokenKind::Datetime, start));
                    }
                    return self.number(start);
                }
                b'+' | b'-' => {
                    self.cursor += 1;
                    return self.number(start);
                }
                _ => {
                    return Err(self.error(
                        ErrorKind::UnexpectedCharacter(self.char_at_cursor()),
                        start,
                        start + 1,
                    ));
                }
            }
        }
    }

    #[inline]
    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.cursor;
        self.cursor += 1;
        self.token(kind, start)
    }

    /// Maximal run of keylike bytes starting at the cursor.
    fn keylike_run(&mut self) -> &'s [u8] {
        let start = self.cursor;
        while let Some(b) = self.peek() {
            if !is_keylike_byte(b) {
                break;
            }
            self.cursor += 1;
        }
        &self.bytes[start..self.cursor]
    }

    /// An identifier-initial lexeme: `true`/`false` become booleans,
    /// `inf`/`nan` become floats, anything else is a plain identifier.
    fn word(&mut self, start: usize) -> Token {
        let kind = match self.keylike_run() {
            b"true" => TokenKind::Boolean(true),
            b"false" => TokenKind::Boolean(false),
            b"inf" | b"nan" => TokenKind::Float,
            _ => TokenKind::Ident,
        };
        self.token(kind, start)
    }

    /// A number lexeme. The sign, if any, has already been consumed.
    ///
    /// The run is deliberately loose — any keylike bytes are taken, so that
    /// shapes like `0x10` or `12pm` form a single token and fail later with
    /// a value error rather than splitting into surprising token pairs. The
    /// only shapes rejected here are the lexically hopeless ones: a dot or
    /// an exponent sign with nothing after it.
    fn number(&mut self, start: usize) -> Result<Token, Error> {
        if self.cursor > start {
            // Signed specials: +inf, -nan, …
            let rest = &self.bytes[self.cursor..];
            if rest.starts_with(b"inf") || rest.starts_with(b"nan") {
                self.cursor += 3;
                return Ok(self.token(TokenKind::Float, start));
            }
        }

        let mut run = self.keylike_run();
        let mut is_float = false;

        if self.peek() == Some(b'.') {
            if !self
                .peek_at(1)
                .is_some_and(|b| b.is_ascii_digit() || b == b'_')
            {
                self.cursor += 1;
                return Err(self.error(ErrorKind::NumberFormat, start, self.cursor));
            }
            self.cursor += 1;
            run = self.keylike_run();
            is_float = true;
        }

        // `1e+5`: '+' is not keylike, so the exponent continues past the run.
        if matches!(run.last(), Some(b'e' | b'E')) && self.peek() == Some(b'+') {
            if !self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
                self.cursor += 1;
                return Err(self.error(ErrorKind::NumberFormat, start, self.cursor));
            }
            self.cursor += 1;
            run = self.keylike_run();
        }

        if run.is_empty() {
            // A bare sign with nothing after it.
            return Err(self.error(ErrorKind::NumberFormat, start, self.cursor));
        }

        let lexeme = &self.bytes[start..self.cursor];
        let unsigned = match lexeme.first() {
            Some(b'+' | b'-') => &lexeme[1..],
            _ => lexeme,
        };
        // Base-prefixed shapes stay intact so the decoder can reject them
        // with a value error rather than a lexical one.
        let base_prefixed = unsigned.len() >= 2
            && unsigned[0] == b'0'
            && matches!(unsigned[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B');

        if !base_prefixed && matches!(lexeme.last(), Some(b'e' | b'E' | b'-')) {
            // Exponent or exponent sign with no digits after it.
            return Err(self.error(ErrorKind::NumberFormat, start, self.cursor));
        }

        is_float = is_float || lexeme.contains(&b'.');
        if !is_float && !base_prefixed {
            is_float = lexeme.iter().any(|&b| b == b'e' || b == b'E');
        }

        let kind = if is_float {
            TokenKind::Float
        } else {
            TokenKind::Integer
        };
        Ok(self.token(kind, start))
    }

    /// A string lexeme. `start` is the offset of the opening delimiter and
    /// the cursor sits on it. Escape shapes are validated for basic strings;
    /// nothing is decoded.
    fn string(&mut self, start: usize, delim: u8) -> Result<Token, Error> {
        let literal = delim == b'\'';
        self.cursor += 1;
        let mut multiline = false;
        if self.eat(delim) {
            if self.eat(delim) {
                multiline = true;
            } else {
                // Empty single-line string.
                return Ok(self.token(
                    TokenKind::Str {
                        literal,
                        multiline: false,
                    },
                    start,
                ));
            }
        }

        loop {
            let i = self.cursor;
            let Some(b) = self.peek() else {
                return Err(self.error(ErrorKind::UnterminatedString, start, self.bytes.len()));
            };
            match b {
                b'\n' => {
                    if !multiline {
                        return Err(self.error(ErrorKind::UnterminatedString, start, i));
                    }
                    self.cursor += 1;
                }
                b'\r' => {
                    if multiline && self.peek_at(1) == Some(b'\n') {
                        self.cursor += 2;
                    } else {
                        return Err(self.error(
                            ErrorKind::UnexpectedCharacter('\r'),
                            i,
                            i + 1,
                        ));
                    }
                }
                b'\\' if !literal => {
                    self.cursor += 1;
                    self.escape_shape(start, multiline)?;
                }
                d if d == delim => {
                    if !multiline {
                        self.cursor += 1;
                        return Ok(self.token(
                            TokenKind::Str {
                                literal,
                                multiline: false,
                            },
                            start,
                        ));
                    }
                    // Count the delimiter run: fewer than three are content;
                    // three to five close the string (the extras belong to
                    // the content).
                    let mut run = 0;
                    while self.peek_at(run) == Some(delim) {
                        run += 1;
                    }
                    if run < 3 {
                        self.cursor += run;
                        continue;
                    }
                    if run > 5 {
                        return Err(self.error(
                            ErrorKind::UnexpectedCharacter(delim as char),
                            i,
                            i + run,
                        ));
                    }
                    self.cursor += run;
                    return Ok(self.token(
                        TokenKind::Str {
                            literal,
                            multiline: true,
                        },
                        start,
                    ));
                }
                0x09 | 0x20..=0x7E | 0x80.. => {
                    self.cursor += 1;
                }
                _ => {
                    return Err(self.error(
                        ErrorKind::UnexpectedCharacter(self.char_at_cursor()),
                        i,
                        i + 1,
                    ));
                }
            }
        }
    }

    /// Validates the shape of one backslash escape. The cursor sits just
    /// past the backslash.
    fn escape_shape(&mut self, string_start: usize, multiline: bool) -> Result<(), Error> {
        let i = self.cursor;
        let Some(b) = self.peek() else {
            return Err(self.error(ErrorKind::UnterminatedString, string_start, self.bytes.len()));
        };
        match b {
            b'b' | b't' | b'n' | b'f' | b'r' | b'"' | b'\\' => {
                self.cursor += 1;
                Ok(())
            }
            b'u' => {
                self.cursor += 1;
                self.hex_digits(4, string_start)
            }
            b'U' => {
                self.cursor += 1;
                self.hex_digits(8, string_start)
            }
            b' ' | b'\t' | b'\n' | b'\r' if multiline => {
                // Line-ending backslash: optional trailing whitespace, then
                // a newline. Anything else on the line is an error.
                loop {
                    match self.peek() {
                        Some(b' ' | b'\t') => self.cursor += 1,
                        Some(b'\n') => {
                            self.cursor += 1;
                            return Ok(());
                        }
                        Some(b'\r') if self.peek_at(1) == Some(b'\n') => {
                            self.cursor += 2;
                            return Ok(());
                        }
                        _ => {
                            return Err(self.error(
                                ErrorKind::InvalidEscape(b as char),
                                i,
                                i + 1,
                            ));
                        }
                    }
                }
            }
            _ => Err(self.error(
                ErrorKind::InvalidEscape(self.char_at_cursor()),
                i,
                i + 1,
            )),
        }
    }

    fn hex_digits(&mut self, n: usize, string_start: usize) -> Result<(), Error> {
        for _ in 0..n {
            match self.peek() {
                Some(b) if b.is_ascii_hexdigit() => self.cursor += 1,
                Some(_) => {
                    return Err(self.error(
                        ErrorKind::InvalidEscape(self.char_at_cursor()),
                        self.cursor,
                        self.cursor + 1,
                    ));
                }
                None => {
                    return Err(self.error(
                        ErrorKind::UnterminatedString,
                        string_start,
                        self.bytes.len(),
                    ));
                }
            }
        }
        Ok(())
    }
}
