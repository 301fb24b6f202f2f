//! Binding tables to Rust records.
//!
//! [`FromValue`] converts a [`Value`] into a host type; [`TableHelper`]
//! walks a table field by field; the [`record!`](crate::record) macro
//! generates both the conversion glue and a default [`Schema`] for a struct
//! definition — the build-time substitute for runtime reflection.
//!
//! ```
//! tomlet::record! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Server {
//!         host: String,
//!         port: i64 = 8080,
//!         tags: Option<Vec<String>>,
//!     }
//! }
//!
//! let server: Server = tomlet::parse_into("host = \"localhost\"")?;
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.tags, None);
//! # Ok::<(), tomlet::Error>(())
//! ```

#[cfg(test)]
#[path = "./de_tests.rs"]
mod tests;

use crate::error::{Error, ErrorKind};
use crate::table::Table;
use crate::time::{Date, Datetime, Time};
use crate::value::{Kind, Value};
use crate::Span;

/// Conversion from a TOML [`Value`] into a host type.
///
/// The two associated constants describe the type to the schema generator:
/// [`KIND`](Self::KIND) is the TOML variant the type binds from, and
/// [`OPTIONAL`](Self::OPTIONAL) marks types that tolerate an absent field
/// (`Option<T>`).
pub trait FromValue: Sized {
    /// The value kind this type expects.
    const KIND: Kind = Kind::Any;
    /// Whether an absent field is acceptable.
    const OPTIONAL: bool = false;

    /// Converts a borrowed value. Mismatches produce type errors; the
    /// partially-built result is dropped on failure.
    fn from_value(value: &Value) -> Result<Self, Error>;

    /// The value to use when the field is absent, for types that have one.
    fn from_absent() -> Option<Self> {
        None
    }
}

/// Builds the `expected …, found …` error for a binding mismatch.
pub fn type_error(expected: &'static str, found: &Value) -> Error {
    Error::new(
        ErrorKind::Wanted {
            expected,
            found: found.type_str(),
        },
        Span::default(),
    )
}

/// Parses a TOML document and binds its root table in one step.
///
/// ```
/// tomlet::record! {
///     struct Point { x: i64, y: i64 }
/// }
/// let p: Point = tomlet::parse_into("x = 1\ny = 2")?;
/// assert_eq!((p.x, p.y), (1, 2));
/// # Ok::<(), tomlet::Error>(())
/// ```
pub fn parse_into<T: FromValue>(source: &str) -> Result<T, Error> {
    let root = crate::parse(source)?;
    T::from_value(&Value::Table(root))
}

impl FromValue for String {
    const KIND: Kind = Kind::String;

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value.as_str() {
            Some(s) => Ok(s.to_owned()),
            None => Err(type_error("a string", value)),
        }
    }
}

impl FromValue for bool {
    const KIND: Kind = Kind::Boolean;

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value.as_bool() {
            Some(b) => Ok(b),
            None => Err(type_error("a boolean", value)),
        }
    }
}

fn integer_in_range(value: &Value, min: i64, max: i64, name: &'static str) -> Result<i64, Error> {
    match value.as_integer() {
        Some(i) if i >= min && i <= max => Ok(i),
        Some(_) => Err(Error::new(ErrorKind::OutOfRange(name), Span::default())),
        None => Err(type_error("an integer", value)),
    }
}

macro_rules! integer {
    ($($num:ty),+) => {$(
        impl FromValue for $num {
            const KIND: Kind = Kind::Integer;

            fn from_value(value: &Value) -> Result<Self, Error> {
                integer_in_range(value, <$num>::MIN as i64, <$num>::MAX as i64, stringify!($num))
                    .map(|i| i as $num)
            }
        }
    )+};
}

integer!(i8, i16, i32, isize, u8, u16, u32);

impl FromValue for i64 {
    const KIND: Kind = Kind::Integer;

    fn from_value(value: &Value) -> Result<Self, Error> {
        integer_in_range(value, i64::MIN, i64::MAX, "i64")
    }
}

impl FromValue for u64 {
    const KIND: Kind = Kind::Integer;

    fn from_value(value: &Value) -> Result<Self, Error> {
        integer_in_range(value, 0, i64::MAX, "u64").map(|i| i as u64)
    }
}

impl FromValue for usize {
    const KIND: Kind = Kind::Integer;

    fn from_value(value: &Value) -> Result<Self, Error> {
        const MAX: i64 = if usize::BITS < 64 {
            usize::MAX as i64
        } else {
            i64::MAX
        };
        integer_in_range(value, 0, MAX, "usize").map(|i| i as usize)
    }
}

impl FromValue for f64 {
    const KIND: Kind = Kind::Float;

    fn from_value(value: &Value) -> Result<Self, Error> {
        // Integers widen, with the usual loss above 2^53.
        match value {
            Value::Float(f) => Ok(*f),
            Value::Integer(i) => Ok(*i as f64),
            other => Err(type_error("a float", other)),
        }
    }
}

impl FromValue for f32 {
    const KIND: Kind = Kind::Float;

    fn from_value(value: &Value) -> Result<Self, Error> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for Datetime {
    const KIND: Kind = Kind::Datetime;

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value.as_datetime() {
            Some(dt) => Ok(*dt),
            None => Err(type_error("a date-time", value)),
        }
    }
}

impl FromValue for Date {
    const KIND: Kind = Kind::Date;

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value.as_date() {
            Some(d) => Ok(*d),
            None => Err(type_error("a date", value)),
        }
    }
}

impl FromValue for Time {
    const KIND: Kind = Kind::Time;

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value.as_time() {
            Some(t) => Ok(*t),
            None => Err(type_error("a time", value)),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, Error> {
        Ok(value.clone())
    }
}

impl FromValue for Table {
    const KIND: Kind = Kind::Table;

    fn from_value(value: &Value) -> Result<Self, Error> {
        match value.as_table() {
            Some(t) => Ok(t.clone()),
            None => Err(type_error("a table", value)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const KIND: Kind = Kind::Array;

    fn from_value(value: &Value) -> Result<Self, Error> {
        let Some(array) = value.as_array() else {
            return Err(type_error("an array", value));
        };
        let mut out = Vec::with_capacity(array.len());
        for element in array {
            out.push(T::from_value(element)?);
        }
        Ok(out)
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    const KIND: Kind = Kind::Array;

    fn from_value(value: &Value) -> Result<Self, Error> {
        let Some(array) = value.as_array() else {
            return Err(type_error("an array", value));
        };
        if array.len() != N {
            return Err(Error::new(
                ErrorKind::Custom(
                    format!("expected an array of length {N}, found length {}", array.len())
                        .into(),
                ),
                Span::default(),
            ));
        }
        let mut out = Vec::with_capacity(N);
        for element in array {
            out.push(T::from_value(element)?);
        }
        // Length was checked above, so the conversion cannot fail.
        match out.try_into() {
            Ok(fixed) => Ok(fixed),
            Err(_) => unreachable!("length verified before conversion"),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const KIND: Kind = T::KIND;
    const OPTIONAL: bool = true;

    fn from_value(value: &Value) -> Result<Self, Error> {
        T::from_value(value).map(Some)
    }

    fn from_absent() -> Option<Self> {
        Some(None)
    }
}

/// Field-by-field extraction from a table, tracking which keys have been
/// consumed so leftovers can be rejected at the end.
pub struct TableHelper<'a> {
    table: &'a Table,
    seen: Vec<&'static str>,
}

impl<'a> TableHelper<'a> {
    /// Creates a helper over a borrowed table.
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            seen: Vec::new(),
        }
    }

    /// Returns `true` if the table has the key.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Binds a field, honoring the type's tolerance for absence: a missing
    /// key yields `Option::None` for optional types and a
    /// [`MissingField`](ErrorKind::MissingField) error otherwise.
    pub fn field<T: FromValue>(&mut self, name: &'static str) -> Result<T, Error> {
        self.seen.push(name);
        match self.table.get(name) {
            Some(value) => T::from_value(value),
            None => T::from_absent()
                .ok_or_else(|| Error::new(ErrorKind::MissingField(name), Span::default())),
        }
    }

    /// Binds a required field. Absence is an error even for optional types.
    pub fn required<T: FromValue>(&mut self, name: &'static str) -> Result<T, Error> {
        self.seen.push(name);
        match self.table.get(name) {
            Some(value) => T::from_value(value),
            None => Err(Error::new(ErrorKind::MissingField(name), Span::default())),
        }
    }

    /// Binds a field when present.
    pub fn optional<T: FromValue>(&mut self, name: &'static str) -> Result<Option<T>, Error> {
        self.seen.push(name);
        match self.table.get(name) {
            Some(value) => T::from_value(value).map(Some),
            None => Ok(None),
        }
    }

    /// Fails with [`UnexpectedKeys`](ErrorKind::UnexpectedKeys) when the
    /// table holds keys that were never bound.
    pub fn expect_empty(&self) -> Result<(), Error> {
        let leftover: Vec<String> = self
            .table
            .keys()
            .filter(|k| !self.seen.contains(&k.as_str()))
            .cloned()
            .collect();
        if leftover.is_empty() {
            Ok(())
        } else {
            Err(Error::new(
                ErrorKind::UnexpectedKeys { keys: leftover },
                Span::default(),
            ))
        }
    }
}

/// Declares a record type bound to a table.
///
/// The macro emits the struct itself, a [`FromValue`] implementation, and a
/// `schema()` constructor returning the default [`Schema`](crate::Schema)
/// derived from the definition: each field's expected kind comes from its
/// Rust type, and a field is required unless it is an `Option` or carries a
/// `= default` expression.
///
/// ```
/// tomlet::record! {
///     #[derive(Debug)]
///     pub struct Service {
///         name: String,
///         port: i64 = 8080,
///         replicas: Option<i64>,
///     }
/// }
///
/// let schema = Service::schema();
/// assert_eq!(schema.fields.len(), 3);
/// assert!(schema.fields[0].required);
/// assert!(!schema.fields[1].required);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fattr:meta])*
                $fvis:vis $field:ident : $fty:ty $(= $default:expr)?
            ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis struct $name {
            $(
                $(#[$fattr])*
                $fvis $field: $fty,
            )+
        }

        impl $crate::FromValue for $name {
            const KIND: $crate::Kind = $crate::Kind::Table;

            fn from_value(value: &$crate::Value) -> Result<Self, $crate::Error> {
                let table = match value.as_table() {
                    Some(table) => table,
                    None => return Err($crate::de::type_error("a table", value)),
                };
                let mut helper = $crate::TableHelper::new(table);
                $(
                    let $field = $crate::record!(@field helper, $field, $fty $(, $default)?);
                )+
                helper.expect_empty()?;
                Ok(Self { $($field),+ })
            }
        }

        impl $name {
            /// The default schema derived from this record definition.
            $vis fn schema() -> $crate::Schema {
                let mut schema = $crate::Schema::new();
                $(
                    schema = schema.field($crate::record!(@schema_field $field, $fty $(, $default)?));
                )+
                schema
            }
        }
    };

    (@field $helper:ident, $field:ident, $fty:ty) => {
        $helper.field::<$fty>(stringify!($field))?
    };
    (@field $helper:ident, $field:ident, $fty:ty, $default:expr) => {
        match $helper.optional::<$fty>(stringify!($field))? {
            Some(value) => value,
            None => $default,
        }
    };

    (@schema_field $field:ident, $fty:ty) => {{
        let field = $crate::FieldSchema::new(
            stringify!($field),
            <$fty as $crate::FromValue>::KIND,
        );
        if <$fty as $crate::FromValue>::OPTIONAL {
            field
        } else {
            field.required()
        }
    }};
    (@schema_field $field:ident, $fty:ty, $default:expr) => {
        $crate::FieldSchema::new(
            stringify!($field),
            <$fty as $crate::FromValue>::KIND,
        )
    };
}
