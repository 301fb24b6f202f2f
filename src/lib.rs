//! A TOML 1.0 processor: parse documents into an owned value tree, emit the
//! tree back as well-formed TOML or as JSON, validate tables against
//! declarative schemas, and bind tables to Rust records.
//!
//! # Quick start
//!
//! Use [`parse`] to get a [`Table`], then read it with the typed getters or
//! by walking [`Value`]s.
//!
//! ```
//! let root = tomlet::parse(r#"
//! title = "example"
//!
//! [server]
//! host = "localhost"
//! port = 8080
//! "#)?;
//!
//! assert_eq!(root.get_str("title"), Some("example"));
//! assert_eq!(root.get_path("server.port").unwrap().as_integer(), Some(8080));
//! # Ok::<(), tomlet::Error>(())
//! ```
//!
//! Failures resolve to line/column diagnostics through
//! [`parse_with_context`]:
//!
//! ```
//! let err = tomlet::parse_with_context("num = 007").unwrap_err();
//! assert_eq!((err.line, err.column), (1, 7));
//! println!("{err}"); // message, source line, caret, optional hint
//! ```
//!
//! # Emission
//!
//! [`stringify`] produces round-trippable TOML; [`to_json`] and
//! [`to_json_pretty`] produce JSON. Formatting is controlled with
//! [`FormatOptions`].
//!
//! ```
//! let root = tomlet::parse("b = 2\na = 1")?;
//! let toml = tomlet::stringify_with_options(
//!     &root,
//!     &tomlet::FormatOptions::new().with_sorted_keys(true),
//! );
//! assert_eq!(toml, "a = 1\nb = 2\n");
//! # Ok::<(), tomlet::Error>(())
//! ```
//!
//! # Validation and binding
//!
//! A [`Schema`] checks a table and accumulates human-readable errors; the
//! [`record!`] macro binds tables to structs and derives their default
//! schema.
//!
//! ```
//! use tomlet::{FieldSchema, Kind, Schema};
//!
//! let schema = Schema::new()
//!     .field(FieldSchema::new("port", Kind::Integer).required().max_value(65535));
//! let report = schema.validate(&tomlet::parse("port = 99999")?);
//! assert!(!report.valid);
//! # Ok::<(), tomlet::Error>(())
//! ```

mod array;
pub mod de;
mod error;
mod json;
mod lexer;
mod parser;
mod schema;
mod ser;
mod span;
mod table;
mod time;
mod value;

pub use array::Array;
pub use de::{parse_into, FromValue, TableHelper};
pub use error::{Error, ErrorContext, ErrorKind};
pub use json::{to_json, to_json_pretty};
pub use parser::{parse, parse_with_context};
pub use schema::{validate, Constraint, FieldSchema, Report, Schema};
pub use ser::{stringify, stringify_with_options, FormatOptions};
pub use span::Span;
pub use table::Table;
pub use time::{Date, Datetime, Time};
pub use value::{Kind, Value};

#[cfg(feature = "serde")]
pub mod impl_serde;
