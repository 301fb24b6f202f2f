//! Property-based round-trip tests.
//!
//! Random value trees are serialized to TOML and reparsed; the result must
//! equal the original tree up to key order. A second property checks that
//! JSON emission of the same trees is accepted by serde_json with the same
//! shape.

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use tomlet::{Array, Date, Datetime, Table, Time, Value};

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        // bare keys
        "[A-Za-z_][A-Za-z0-9_-]{0,10}",
        // keys that need quoting
        "[a-z ]{1,6}\\.[a-z]{1,3}",
        Just("key with space".to_string()),
    ]
    .prop_filter("keys must not be empty", |k| !k.is_empty())
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        // escapes and quotes
        Just("line1\nline2\ttab".to_string()),
        Just("say \"hi\" \\ back".to_string()),
        Just("control\u{1}char".to_string()),
        Just(String::new()),
        // non-ASCII
        Just("caf\u{e9} \u{4f60}\u{597d}".to_string()),
    ]
}

/// Finite floats only; NaN can never compare equal and the non-finite
/// values are exercised by the unit tests.
fn arb_float() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<i32>().prop_map(|m| m as f64 / 100.0),
        any::<i64>().prop_map(|m| m as f64),
        Just(0.0),
        Just(-0.0),
        Just(1e300),
        Just(-2.5e-10),
    ]
}

fn arb_date() -> impl Strategy<Value = Date> {
    (0u16..=9999, 1u8..=12).prop_flat_map(|(year, month)| {
        let max_day = match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ => 29,
        };
        (Just(year), Just(month), 1u8..=max_day)
            .prop_map(|(year, month, day)| Date::new(year, month, day))
    })
}

fn arb_time() -> impl Strategy<Value = Time> {
    (0u8..24, 0u8..60, 0u8..60, 0u32..1_000_000_000)
        .prop_map(|(h, m, s, n)| Time::new(h, m, s, n))
}

fn arb_offset() -> impl Strategy<Value = Option<i16>> {
    prop_oneof![
        Just(None),
        Just(Some(0)),
        (-1439i16..=1439).prop_map(Some),
    ]
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_string().prop_map(Value::String),
        any::<i64>().prop_map(Value::Integer),
        arb_float().prop_map(Value::Float),
        any::<bool>().prop_map(Value::Boolean),
        arb_date().prop_map(Value::Date),
        arb_time().prop_map(Value::Time),
        (arb_date(), arb_time(), arb_offset())
            .prop_map(|(d, t, o)| Value::Datetime(Datetime::new(d, t, o))),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(|items| Value::Array(Array::from(items))),
            btree_map(arb_key(), inner, 0..6).prop_map(|entries| {
                Value::Table(entries.into_iter().collect::<Table>())
            }),
        ]
    })
}

fn arb_root() -> impl Strategy<Value = Table> {
    btree_map(arb_key(), arb_value(), 0..8)
        .prop_map(|entries| entries.into_iter().collect::<Table>())
}

/// Mirror of the JSON emitter's mapping, used as the oracle for the shape
/// comparison.
fn to_serde(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Value::from(*f),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        Value::Date(d) => serde_json::Value::String(d.to_string()),
        Value::Time(t) => serde_json::Value::String(t.to_string()),
        Value::Array(a) => serde_json::Value::Array(a.iter().map(to_serde).collect()),
        Value::Table(t) => serde_json::Value::Object(
            t.iter().map(|(k, v)| (k.clone(), to_serde(v))).collect(),
        ),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn toml_roundtrip(root in arb_root()) {
        let text = tomlet::stringify(&root);
        let reparsed = tomlet::parse(&text)
            .unwrap_or_else(|e| panic!("emitted TOML failed to reparse: {e}\n---\n{text}"));
        prop_assert_eq!(&reparsed, &root, "roundtrip mismatch\n---\n{}", text);
    }

    #[test]
    fn toml_roundtrip_sorted_and_flat(root in arb_root()) {
        let options = tomlet::FormatOptions::new()
            .with_sorted_keys(true)
            .with_blank_lines(false)
            .with_indent(0);
        let text = tomlet::stringify_with_options(&root, &options);
        let reparsed = tomlet::parse(&text)
            .unwrap_or_else(|e| panic!("emitted TOML failed to reparse: {e}\n---\n{text}"));
        prop_assert_eq!(&reparsed, &root);
    }

    #[test]
    fn json_emission_matches_shape(root in arb_root()) {
        let compact = tomlet::to_json(&root);
        let parsed: serde_json::Value = serde_json::from_str(&compact)
            .unwrap_or_else(|e| panic!("emitted JSON failed to parse: {e}\n---\n{compact}"));
        let expected = to_serde(&Value::Table(root.clone()));
        prop_assert_eq!(&parsed, &expected);

        let pretty = tomlet::to_json_pretty(&root, 2);
        let parsed_pretty: serde_json::Value = serde_json::from_str(&pretty)
            .unwrap_or_else(|e| panic!("emitted JSON failed to parse: {e}\n---\n{pretty}"));
        prop_assert_eq!(&parsed_pretty, &expected);
    }

    #[test]
    fn parsing_is_deterministic(root in arb_root()) {
        let text = tomlet::stringify(&root);
        let a = tomlet::parse(&text).unwrap();
        let b = tomlet::parse(&text).unwrap();
        prop_assert_eq!(a, b);
    }
}
