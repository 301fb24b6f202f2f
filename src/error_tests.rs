use super::*;

#[test]
fn kind_codes() {
    let cases: Vec<(ErrorKind, &str)> = vec![
        (ErrorKind::UnexpectedCharacter('@'), "unexpected-character"),
        (ErrorKind::InvalidEscape('q'), "invalid-escape"),
        (ErrorKind::UnterminatedString, "unterminated-string"),
        (ErrorKind::NumberFormat, "number-format"),
        (
            ErrorKind::InvalidValue("leading zeros are not allowed"),
            "invalid-value",
        ),
        (
            ErrorKind::Wanted {
                expected: "a newline",
                found: "an identifier",
            },
            "wanted",
        ),
        (ErrorKind::UnexpectedEof, "unexpected-eof"),
        (ErrorKind::DuplicateKey { key: "k".into() }, "duplicate-key"),
        (ErrorKind::InvalidTable { key: "t".into() }, "invalid-table"),
        (ErrorKind::InvalidArray, "invalid-array"),
        (ErrorKind::MissingField("name"), "missing-field"),
        (ErrorKind::OutOfRange("u8"), "out-of-range"),
        (
            ErrorKind::UnexpectedKeys { keys: vec!["a".into()] },
            "unexpected-keys",
        ),
        (ErrorKind::Custom("msg".into()), "custom"),
    ];
    for (kind, code) in &cases {
        assert_eq!(format!("{kind}"), *code);
        assert_eq!(format!("{kind:?}"), *code);
    }
}

#[test]
fn error_messages() {
    let span = Span::new(0, 1);
    let cases: Vec<(ErrorKind, &str)> = vec![
        (
            ErrorKind::UnexpectedCharacter('@'),
            "unexpected character `@`",
        ),
        (
            ErrorKind::UnexpectedCharacter('\t'),
            "unexpected character `\\t`",
        ),
        (
            ErrorKind::InvalidEscape('q'),
            "invalid escape character in string: `q`",
        ),
        (ErrorKind::UnterminatedString, "unterminated string"),
        (ErrorKind::NumberFormat, "malformed number"),
        (
            ErrorKind::InvalidValue("leading zeros are not allowed"),
            "invalid value: leading zeros are not allowed",
        ),
        (
            ErrorKind::Wanted {
                expected: "a newline",
                found: "an identifier",
            },
            "expected a newline, found an identifier",
        ),
        (ErrorKind::UnexpectedEof, "unexpected end of input"),
        (
            ErrorKind::DuplicateKey { key: "k".into() },
            "duplicate key: `k`",
        ),
        (
            ErrorKind::InvalidTable { key: "t".into() },
            "cannot redefine or extend `t`",
        ),
        (
            ErrorKind::MissingField("name"),
            "missing field `name` in table",
        ),
        (
            ErrorKind::OutOfRange("u8"),
            "number is out of range of `u8`",
        ),
        (
            ErrorKind::UnexpectedKeys {
                keys: vec!["a".into(), "b".into()],
            },
            "unexpected keys in table: [\"a\", \"b\"]",
        ),
        (ErrorKind::Custom("boom".into()), "boom"),
    ];
    for (kind, message) in cases {
        let error = Error::new(kind, span);
        assert_eq!(error.to_string(), message);
    }
}

#[test]
fn context_resolves_line_and_column() {
    let source = "ok = 1\nbad = @\nlast = 3";
    let error = Error::new(ErrorKind::UnexpectedCharacter('@'), Span::new(13, 14));
    let ctx = ErrorContext::new(&error, source);
    assert_eq!(ctx.line, 2);
    assert_eq!(ctx.column, 7);
    assert_eq!(ctx.source_line, "bad = @");
    assert!(ctx.hint.is_none());
}

#[test]
fn context_on_first_and_last_lines() {
    let source = "x = @";
    let error = Error::new(ErrorKind::UnexpectedCharacter('@'), Span::new(4, 5));
    let ctx = ErrorContext::new(&error, source);
    assert_eq!((ctx.line, ctx.column), (1, 5));
    assert_eq!(ctx.source_line, "x = @");

    // span at end of input
    let error = Error::new(ErrorKind::UnexpectedEof, Span::new(5, 5));
    let ctx = ErrorContext::new(&error, source);
    assert_eq!(ctx.line, 1);
    assert_eq!(ctx.column, 6);
}

#[test]
fn context_strips_carriage_returns() {
    let source = "a = 1\r\nb = @\r\n";
    let error = Error::new(ErrorKind::UnexpectedCharacter('@'), Span::new(11, 12));
    let ctx = ErrorContext::new(&error, source);
    assert_eq!(ctx.line, 2);
    assert_eq!(ctx.source_line, "b = @");
}

#[test]
fn context_render_has_caret_under_column() {
    let source = "key = 007";
    let error = Error::new(
        ErrorKind::InvalidValue("leading zeros are not allowed"),
        Span::new(6, 9),
    );
    let rendered = ErrorContext::new(&error, source).to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "error: invalid value: leading zeros are not allowed");
    assert_eq!(lines[1], " --> line 1, column 7");
    assert_eq!(lines[2], "  | key = 007");
    assert_eq!(lines[3], "  |       ^^^");
}

#[test]
fn hints_from_token_pairs() {
    let error = Error::new(
        ErrorKind::Wanted {
            expected: "an equals",
            found: "an identifier",
        },
        Span::new(0, 1),
    );
    let ctx = ErrorContext::new(&error, "a b = 1");
    assert_eq!(
        ctx.hint,
        Some("did you mean to use a dot `.` for a nested key?")
    );
    let rendered = ctx.to_string();
    assert!(rendered.contains("hint:"));

    // pairs without a fixed phrase carry no hint
    let error = Error::new(
        ErrorKind::Wanted {
            expected: "a comma",
            found: "an integer",
        },
        Span::new(0, 1),
    );
    assert_eq!(ErrorContext::new(&error, "x").hint, None);
}

#[test]
fn parse_surfaces_context_through_the_api() {
    let err = crate::parse_with_context("a = 1\nb = \"oops").unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.message, "unterminated string");
    assert_eq!(err.source_line, "b = \"oops");
}
