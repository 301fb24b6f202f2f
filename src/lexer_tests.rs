use super::*;

fn lex_all(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer
            .next_token()
            .unwrap_or_else(|e| panic!("lex failed for {input:?}: {e}"));
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

fn kinds(input: &str) -> Vec<TokenKind> {
    lex_all(input).into_iter().map(|t| t.kind).collect()
}

fn lex_err(input: &str) -> Error {
    let mut lexer = Lexer::new(input);
    loop {
        match lexer.next_token() {
            Ok(token) if token.kind == TokenKind::Eof => {
                panic!("expected lex error for {input:?}")
            }
            Ok(_) => {}
            Err(e) => return e,
        }
    }
}

fn text(input: &str, token: &Token) -> String {
    input[std::ops::Range::<usize>::from(token.span)].to_owned()
}

#[test]
fn punctuation_and_newlines() {
    assert_eq!(
        kinds("= , . [ ] { }\n"),
        vec![
            TokenKind::Equals,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
    // CRLF is one newline token.
    assert_eq!(
        kinds("a\r\nb"),
        vec![
            TokenKind::Ident,
            TokenKind::Newline,
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
}

#[test]
fn whitespace_and_comments_are_silent() {
    assert_eq!(kinds("   \t  "), vec![TokenKind::Eof]);
    assert_eq!(kinds("# just a comment"), vec![TokenKind::Eof]);
    // The newline terminating a comment is still emitted.
    assert_eq!(
        kinds("# comment\nkey"),
        vec![TokenKind::Newline, TokenKind::Ident, TokenKind::Eof]
    );
}

#[test]
fn words() {
    assert_eq!(kinds("server"), vec![TokenKind::Ident, TokenKind::Eof]);
    assert_eq!(kinds("has-dashes_and_underscores"), vec![TokenKind::Ident, TokenKind::Eof]);
    assert_eq!(kinds("true"), vec![TokenKind::Boolean(true), TokenKind::Eof]);
    assert_eq!(kinds("false"), vec![TokenKind::Boolean(false), TokenKind::Eof]);
    assert_eq!(kinds("inf"), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(kinds("nan"), vec![TokenKind::Float, TokenKind::Eof]);
    // Near misses are plain identifiers.
    assert_eq!(kinds("truey"), vec![TokenKind::Ident, TokenKind::Eof]);
    assert_eq!(kinds("infx"), vec![TokenKind::Ident, TokenKind::Eof]);
}

#[test]
fn integers_and_floats() {
    assert_eq!(kinds("42"), vec![TokenKind::Integer, TokenKind::Eof]);
    assert_eq!(kinds("+42"), vec![TokenKind::Integer, TokenKind::Eof]);
    assert_eq!(kinds("-42"), vec![TokenKind::Integer, TokenKind::Eof]);
    assert_eq!(kinds("1_000"), vec![TokenKind::Integer, TokenKind::Eof]);

    assert_eq!(kinds("3.14"), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(kinds("1e10"), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(kinds("1E10"), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(kinds("1e-5"), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(kinds("1e+5"), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(kinds("6.02e23"), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(kinds("+inf"), vec![TokenKind::Float, TokenKind::Eof]);
    assert_eq!(kinds("-nan"), vec![TokenKind::Float, TokenKind::Eof]);
}

#[test]
fn number_lexeme_is_preserved() {
    let input = "1_000.5";
    let tokens = lex_all(input);
    assert_eq!(text(input, &tokens[0]), "1_000.5");
}

#[test]
fn base_prefixes_lex_as_one_integer_token() {
    // Rejection happens during value decoding, not here.
    assert_eq!(kinds("0x1A"), vec![TokenKind::Integer, TokenKind::Eof]);
    assert_eq!(kinds("0o777"), vec![TokenKind::Integer, TokenKind::Eof]);
    assert_eq!(kinds("0b1010"), vec![TokenKind::Integer, TokenKind::Eof]);
    assert_eq!(kinds("0xEF"), vec![TokenKind::Integer, TokenKind::Eof]);
}

#[test]
fn malformed_numbers() {
    assert_eq!(lex_err("1.").kind, ErrorKind::NumberFormat);
    assert_eq!(lex_err("1e").kind, ErrorKind::NumberFormat);
    assert_eq!(lex_err("1e+").kind, ErrorKind::NumberFormat);
    assert_eq!(lex_err("+").kind, ErrorKind::NumberFormat);
    assert_eq!(lex_err("-").kind, ErrorKind::NumberFormat);
}

#[test]
fn datetime_lexemes() {
    let input = "1979-05-27T07:32:00-07:00";
    let tokens = lex_all(input);
    assert_eq!(tokens[0].kind, TokenKind::Datetime);
    assert_eq!(text(input, &tokens[0]), input);

    assert_eq!(kinds("1979-05-27"), vec![TokenKind::Datetime, TokenKind::Eof]);
    assert_eq!(kinds("07:32:00"), vec![TokenKind::Datetime, TokenKind::Eof]);
    assert_eq!(
        kinds("07:32:00.999"),
        vec![TokenKind::Datetime, TokenKind::Eof]
    );
}

#[test]
fn datetime_with_trailing_comment() {
    assert_eq!(
        kinds("1979-05-27 # birthday"),
        vec![TokenKind::Datetime, TokenKind::Eof]
    );
}

#[test]
fn basic_strings() {
    let input = r#""hello""#;
    let tokens = lex_all(input);
    assert_eq!(
        tokens[0].kind,
        TokenKind::Str {
            literal: false,
            multiline: false
        }
    );
    assert_eq!(text(input, &tokens[0]), input);

    // Escapes are shape-checked but kept verbatim.
    let input = r#""line\nbreak A""#;
    let tokens = lex_all(input);
    assert_eq!(text(input, &tokens[0]), input);
}

#[test]
fn literal_strings_ignore_backslashes() {
    let input = r"'no\escape'";
    let tokens = lex_all(input);
    assert_eq!(
        tokens[0].kind,
        TokenKind::Str {
            literal: true,
            multiline: false
        }
    );
    assert_eq!(text(input, &tokens[0]), input);
}

#[test]
fn multiline_strings() {
    let input = "\"\"\"\nhello\nworld\"\"\"";
    let tokens = lex_all(input);
    assert_eq!(
        tokens[0].kind,
        TokenKind::Str {
            literal: false,
            multiline: true
        }
    );

    let input = "'''\nraw\n'''";
    let tokens = lex_all(input);
    assert_eq!(
        tokens[0].kind,
        TokenKind::Str {
            literal: true,
            multiline: true
        }
    );
}

#[test]
fn multiline_string_with_inner_quotes() {
    // One or two consecutive quotes are content; five at the end means two
    // content quotes plus the terminator.
    let input = "\"\"\"a\"b\"\"c\"\"\"";
    let tokens = lex_all(input);
    assert_eq!(text(input, &tokens[0]), input);

    let input = "\"\"\"content\"\"\"\"\"";
    let tokens = lex_all(input);
    assert_eq!(text(input, &tokens[0]), input);
}

#[test]
fn string_errors() {
    assert_eq!(lex_err("\"unclosed").kind, ErrorKind::UnterminatedString);
    assert_eq!(lex_err("'unclosed").kind, ErrorKind::UnterminatedString);
    assert_eq!(lex_err("\"\"\"unclosed").kind, ErrorKind::UnterminatedString);
    // Bare newline inside a single-line string.
    assert_eq!(lex_err("\"line\nbreak\"").kind, ErrorKind::UnterminatedString);
}

#[test]
fn escape_shape_errors() {
    assert_eq!(lex_err(r#""\q""#).kind, ErrorKind::InvalidEscape('q'));
    assert_eq!(lex_err(r#""\u12""#).kind, ErrorKind::InvalidEscape('"'));
    assert_eq!(lex_err(r#""\uZZZZ""#).kind, ErrorKind::InvalidEscape('Z'));
    // A literal backslash is only an error in basic strings.
    assert_eq!(kinds(r"'\q'").len(), 2);
}

#[test]
fn line_ending_backslash_is_multiline_only() {
    let input = "\"\"\"a \\\n   b\"\"\"";
    let tokens = lex_all(input);
    assert_eq!(
        tokens[0].kind,
        TokenKind::Str {
            literal: false,
            multiline: true
        }
    );
    // Trailing whitespace between the backslash and the newline is fine.
    let input = "\"\"\"a \\  \nb\"\"\"";
    assert_eq!(kinds(input).len(), 2);
    // In a single-line string the same shape is an invalid escape.
    assert_eq!(lex_err("\"a \\ b\"").kind, ErrorKind::InvalidEscape(' '));
}

#[test]
fn unexpected_characters() {
    assert!(matches!(
        lex_err("@").kind,
        ErrorKind::UnexpectedCharacter('@')
    ));
    // Bare carriage return.
    assert!(matches!(
        lex_err("a\rb").kind,
        ErrorKind::UnexpectedCharacter('\r')
    ));
    // Control character in a comment.
    assert!(matches!(
        lex_err("# bad\x01comment").kind,
        ErrorKind::UnexpectedCharacter('\x01')
    ));
}

#[test]
fn bom_is_skipped() {
    assert_eq!(
        kinds("\u{feff}key"),
        vec![TokenKind::Ident, TokenKind::Eof]
    );
}

#[test]
fn spans_are_byte_accurate() {
    let input = "key = 42";
    let tokens = lex_all(input);
    assert_eq!(text(input, &tokens[0]), "key");
    assert_eq!(text(input, &tokens[1]), "=");
    assert_eq!(text(input, &tokens[2]), "42");
    assert_eq!(tokens[3].span, Span::new(8, 8));
}
