//! Error types surfaced by the parser, binder, and reporting helpers.

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

use crate::Span;
use std::borrow::Cow;
use std::fmt::{self, Debug, Display};

/// Error produced while parsing or binding TOML.
///
/// Carries the failure [`ErrorKind`] and the byte [`Span`] of the offending
/// input. Resolve the span against the source text with
/// [`ErrorContext::new`] to get line/column information and a display-ready
/// report.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The error kind.
    pub kind: ErrorKind,
    /// The span where the error occurred. Empty for errors that arise after
    /// parsing (record binding), which have no source position.
    pub span: Span,
}

impl std::error::Error for Error {}

impl From<(ErrorKind, Span)> for Error {
    fn from((kind, span): (ErrorKind, Span)) -> Self {
        Self { kind, span }
    }
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The failure categories of the processor.
#[derive(Clone, PartialEq)]
pub enum ErrorKind {
    /// The lexer met a byte outside any lexeme.
    UnexpectedCharacter(char),

    /// A malformed escape inside a basic string.
    InvalidEscape(char),

    /// EOF or a bare newline inside a single-line string, or EOF inside a
    /// multiline string.
    UnterminatedString,

    /// A numeric lexeme was syntactically ill-formed (caught at lex time).
    NumberFormat,

    /// Semantic failure while decoding a value: disallowed underscore
    /// placement, base-prefixed integer, leading zero, out-of-range
    /// date component, and the like. The payload names the violated rule.
    InvalidValue(&'static str),

    /// The parser wanted one sort of token but found another.
    Wanted {
        /// Expected token description.
        expected: &'static str,
        /// Actually found token description.
        found: &'static str,
    },

    /// The token stream ended in the middle of a production.
    UnexpectedEof,

    /// A key was assigned twice within one table's scope.
    DuplicateKey {
        /// The duplicated key.
        key: String,
    },

    /// Structural re-open of a closed table, or a type conflict along a
    /// dotted or header path.
    InvalidTable {
        /// The key at which the conflict arose.
        key: String,
    },

    /// Structural rule violated inside an array. Heterogeneous element
    /// types are permitted, so nothing raises this today; reserved.
    InvalidArray,

    /// A required field was missing while binding a record.
    MissingField(&'static str),

    /// An integer did not fit the requested record field type.
    OutOfRange(&'static str),

    /// Keys were left over after binding a record that accepts no extras.
    UnexpectedKeys {
        /// The unexpected keys.
        keys: Vec<String>,
    },

    /// A custom failure raised by a record binding.
    Custom(Cow<'static, str>),
}

impl Display for ErrorKind {
    /// Stable kebab-case code for the kind.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnexpectedCharacter(..) => "unexpected-character",
            Self::InvalidEscape(..) => "invalid-escape",
            Self::UnterminatedString => "unterminated-string",
            Self::NumberFormat => "number-format",
            Self::InvalidValue(..) => "invalid-value",
            Self::Wanted { .. } => "wanted",
            Self::UnexpectedEof => "unexpected-eof",
            Self::DuplicateKey { .. } => "duplicate-key",
            Self::InvalidTable { .. } => "invalid-table",
            Self::InvalidArray => "invalid-array",
            Self::MissingField(..) => "missing-field",
            Self::OutOfRange(..) => "out-of-range",
            Self::UnexpectedKeys { .. } => "unexpected-keys",
            Self::Custom(..) => "custom",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UnexpectedCharacter(c) => {
                write!(f, "unexpected character `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscape(c) => {
                write!(f, "invalid escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ErrorKind::NumberFormat => f.write_str("malformed number"),
            ErrorKind::InvalidValue(rule) => write!(f, "invalid value: {rule}"),
            ErrorKind::Wanted { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ErrorKind::UnexpectedEof => f.write_str("unexpected end of input"),
            ErrorKind::DuplicateKey { key } => write!(f, "duplicate key: `{key}`"),
            ErrorKind::InvalidTable { key } => {
                write!(f, "cannot redefine or extend `{key}`")
            }
            ErrorKind::InvalidArray => f.write_str("invalid array structure"),
            ErrorKind::MissingField(field) => {
                write!(f, "missing field `{field}` in table")
            }
            ErrorKind::OutOfRange(ty) => write!(f, "number is out of range of `{ty}`"),
            ErrorKind::UnexpectedKeys { keys } => {
                f.write_str("unexpected keys in table: [")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{key}\"")?;
                }
                f.write_str("]")
            }
            ErrorKind::Custom(message) => f.write_str(message),
        }
    }
}

/// A parse failure resolved against its source text, ready for display.
///
/// Returned by [`parse_with_context`](crate::parse_with_context). Rendering
/// via [`Display`] produces the line/column header, the offending source
/// line with a caret underneath, and an optional hint.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext<'a> {
    /// 1-based line of the offending token.
    pub line: usize,
    /// 1-based column (in bytes) of the first character of the offending
    /// token.
    pub column: usize,
    /// The full source line containing the error, without its terminator.
    pub source_line: &'a str,
    /// The human-readable message.
    pub message: String,
    /// A fixed suggestion derived from the expected/found token pair, when
    /// one applies.
    pub hint: Option<&'static str>,
    caret_width: usize,
}

impl<'a> ErrorContext<'a> {
    /// Resolves `error` against the source it was produced from.
    pub fn new(error: &Error, source: &'a str) -> Self {
        let offset = (error.span.start as usize).min(source.len());
        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line = source[..line_start].matches('\n').count() + 1;
        let line_end = source[line_start..]
            .find('\n')
            .map_or(source.len(), |i| line_start + i);
        let source_line = source[line_start..line_end].trim_end_matches('\r');
        let column = offset - line_start + 1;
        let caret_width = error
            .span
            .len()
            .clamp(1, source_line.len().saturating_sub(column - 1).max(1));
        Self {
            line,
            column,
            source_line,
            message: error.to_string(),
            hint: hint_for(&error.kind),
            caret_width,
        }
    }
}

impl Display for ErrorContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;
        writeln!(f, " --> line {}, column {}", self.line, self.column)?;
        writeln!(f, "  | {}", self.source_line)?;
        write!(f, "  | {}{}", " ".repeat(self.column - 1), "^".repeat(self.caret_width))?;
        if let Some(hint) = self.hint {
            write!(f, "\n  = hint: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorContext<'_> {}

/// Fixed phrase table mapping expected/found token pairs to suggestions.
fn hint_for(kind: &ErrorKind) -> Option<&'static str> {
    let ErrorKind::Wanted { expected, found } = kind else {
        return None;
    };
    match (*expected, *found) {
        ("an equals", "an identifier") => {
            Some("did you mean to use a dot `.` for a nested key?")
        }
        ("an equals", "a string") => {
            Some("keys containing spaces or symbols must be quoted as one token")
        }
        ("a newline", "an identifier") | ("a newline", "an equals") => {
            Some("each key/value pair must end with a newline")
        }
        ("a value", "an identifier") => {
            Some("unquoted strings are not allowed; wrap the value in quotes")
        }
        ("a right bracket", "a newline") => {
            Some("table headers must be closed on the same line")
        }
        (_, "a newline") if *expected != "a newline" => {
            Some("the line ended before the expression was complete")
        }
        ("a value", "eof") | (_, "eof") => Some("the document ended unexpectedly"),
        _ => None,
    }
}
