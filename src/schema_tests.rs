use super::*;
use crate::parse;

fn table(input: &str) -> Table {
    parse(input).unwrap()
}

#[test]
fn empty_schema_accepts_empty_table() {
    let report = Schema::new().validate(&Table::new());
    assert!(report.valid);
    assert!(report.errors.is_empty());
}

#[test]
fn missing_required_field() {
    let schema = Schema::new().field(FieldSchema::new("port", Kind::Integer).required());
    let report = schema.validate(&Table::new());
    assert!(!report.valid);
    assert_eq!(report.errors, ["Missing required field: 'port'"]);
}

#[test]
fn optional_field_may_be_absent() {
    let schema = Schema::new().field(FieldSchema::new("port", Kind::Integer));
    assert!(schema.validate(&Table::new()).valid);
}

#[test]
fn wrong_type() {
    let schema = Schema::new().field(FieldSchema::new("port", Kind::Integer));
    let report = schema.validate(&table("port = \"eighty\""));
    assert!(!report.valid);
    assert_eq!(
        report.errors,
        ["Field 'port' has wrong type (expected integer, found string)"]
    );
}

#[test]
fn any_kind_accepts_everything() {
    let schema = Schema::new().field(FieldSchema::new("x", Kind::Any).required());
    assert!(schema.validate(&table("x = 1")).valid);
    assert!(schema.validate(&table("x = \"s\"")).valid);
    assert!(schema.validate(&table("x = [1]")).valid);
}

#[test]
fn integer_range() {
    let schema = Schema::new().field(
        FieldSchema::new("port", Kind::Integer)
            .required()
            .min_value(1)
            .max_value(65535),
    );

    assert!(schema.validate(&table("port = 8080")).valid);

    let report = schema.validate(&table("port = 99999"));
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    let message = &report.errors[0];
    assert!(message.contains("port"), "{message}");
    assert!(message.contains("99999"), "{message}");
    assert!(message.contains("65535"), "{message}");

    let report = schema.validate(&table("port = 0"));
    assert!(report.errors[0].contains("below minimum 1"));
}

#[test]
fn string_lengths() {
    let schema = Schema::new().field(
        FieldSchema::new("name", Kind::String)
            .min_length(3)
            .max_length(8),
    );
    assert!(schema.validate(&table("name = \"abc\"")).valid);
    assert!(!schema.validate(&table("name = \"ab\"")).valid);
    let report = schema.validate(&table("name = \"toolongname\""));
    assert!(report.errors[0].contains("exceeds maximum length 8"));
}

#[test]
fn one_of_literals() {
    let schema =
        Schema::new().field(FieldSchema::new("mode", Kind::String).one_of(["fast", "slow"]));
    assert!(schema.validate(&table("mode = \"fast\"")).valid);
    let report = schema.validate(&table("mode = \"medium\""));
    assert_eq!(
        report.errors,
        ["Field 'mode' must be one of [fast, slow], got 'medium'"]
    );
}

#[test]
fn wildcard_patterns() {
    let schema =
        Schema::new().field(FieldSchema::new("host", Kind::String).pattern("*.example.com"));
    assert!(schema.validate(&table("host = \"api.example.com\"")).valid);
    assert!(!schema.validate(&table("host = \"example.org\"")).valid);

    assert!(wildcard_match("*", "anything"));
    assert!(wildcard_match("a*c", "abc"));
    assert!(wildcard_match("a*c", "ac"));
    assert!(wildcard_match("a*b*c", "aXbYc"));
    assert!(!wildcard_match("a*c", "ab"));
    assert!(wildcard_match("literal", "literal"));
    assert!(!wildcard_match("literal", "littoral"));
}

#[test]
fn custom_predicate() {
    fn is_even(v: &Value) -> bool {
        v.as_integer().is_some_and(|i| i % 2 == 0)
    }
    let schema =
        Schema::new().field(FieldSchema::new("n", Kind::Integer).custom("must be even", is_even));
    assert!(schema.validate(&table("n = 4")).valid);
    let report = schema.validate(&table("n = 3"));
    assert_eq!(report.errors, ["Field 'n' failed custom check (must be even)"]);
}

#[test]
fn constraints_skip_on_wrong_kind() {
    // The type error is reported once; constraints do not pile on.
    let schema = Schema::new().field(
        FieldSchema::new("port", Kind::Integer)
            .min_value(1)
            .max_value(10),
    );
    let report = schema.validate(&table("port = \"x\""));
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn unknown_fields() {
    let schema = Schema::new().field(FieldSchema::new("a", Kind::Integer));
    let report = schema.validate(&table("a = 1\nb = 2\nc = 3"));
    assert!(!report.valid);
    assert_eq!(
        report.errors,
        ["Unknown field: 'b'", "Unknown field: 'c'"]
    );

    let lax = Schema::new()
        .field(FieldSchema::new("a", Kind::Integer))
        .allow_unknown(true);
    assert!(lax.validate(&table("a = 1\nb = 2")).valid);
}

#[test]
fn nested_schemas_prefix_errors() {
    let schema = Schema::new().field(
        FieldSchema::new("server", Kind::Table).required().nested(
            Schema::new()
                .field(FieldSchema::new("port", Kind::Integer).required().max_value(65535)),
        ),
    );

    let report = schema.validate(&table("[server]\nport = 99999"));
    assert_eq!(
        report.errors,
        ["Field 'server.port' value 99999 exceeds maximum 65535"]
    );

    let report = schema.validate(&table("[server]\nhost = \"x\""));
    assert!(report
        .errors
        .contains(&"Missing required field: 'server.port'".to_string()));
    assert!(report
        .errors
        .contains(&"Unknown field: 'server.host'".to_string()));
}

#[test]
fn multiple_errors_accumulate() {
    let schema = Schema::new()
        .field(FieldSchema::new("a", Kind::Integer).required())
        .field(FieldSchema::new("b", Kind::String).required());
    let report = schema.validate(&table("c = 1"));
    assert_eq!(report.errors.len(), 3);
}

#[test]
fn validator_never_mutates() {
    let input = table("a = 1\nb = \"x\"");
    let before = input.clone();
    let schema = Schema::new().field(FieldSchema::new("a", Kind::String).required());
    let _ = schema.validate(&input);
    assert_eq!(input, before);
}

#[test]
fn adding_a_field_only_shrinks_the_valid_set() {
    let base = Schema::new()
        .allow_unknown(true)
        .field(FieldSchema::new("a", Kind::Integer));
    let stricter = base
        .clone()
        .field(FieldSchema::new("b", Kind::Integer).required());

    for input in ["a = 1", "a = 1\nb = 2", "a = 1\nb = \"s\"", ""] {
        let t = table(input);
        if stricter.validate(&t).valid {
            assert!(base.validate(&t).valid, "monotonicity broken for {input:?}");
        }
    }
}

#[test]
fn widening_a_range_only_grows_the_valid_set() {
    let narrow = Schema::new().field(FieldSchema::new("n", Kind::Integer).max_value(10));
    let wide = Schema::new().field(FieldSchema::new("n", Kind::Integer).max_value(1000));

    for input in ["n = 5", "n = 10", "n = 11", "n = 999", "n = 1001"] {
        let t = table(input);
        if narrow.validate(&t).valid {
            assert!(wide.validate(&t).valid, "monotonicity broken for {input:?}");
        }
    }
}
