//! # ifamily
//!
//! A tagged object model and its textual notation.
//!
//! ## What is ifamily?
//!
//! ifamily is a small data-interchange format. Values are either untyped
//! scalars (null, booleans, numbers, strings, lists), typed atoms (dates,
//! date-times, binary blobs, UUIDs) or structural types (sets, maps, tuples,
//! graphs and labeled nodes). Every typed value is written with a tag prefix:
//!
//! ```text
//! @node("Person", {"Name": "Nazwa", "Born": @date("2003-04-05")})
//! ```
//!
//! The tag decides how the payload is read back, so decoding recovers exact
//! values: byte-exact binary payloads, exact timestamps, exact identifiers.
//!
//! ## Key Features
//!
//! - **Lossless round-trip**: `decode(encode(v))` reproduces `v` for every variant
//! - **Three notations**: canonical, nested-list (display only) and node-only
//! - **Tag dispatch**: a fixed table maps each tag to its parsing production
//! - **Document files**: `.ifamily` read/write helpers with an extension guard
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```rust
//! use ifamily::{decode, encode, Node, Notation, Value};
//!
//! let address = Node::new("Address")
//!     .unwrap()
//!     .with_property("City", "Bandung")
//!     .with_property("Code", 40123);
//! let person = Node::new("Person")
//!     .unwrap()
//!     .with_property("Name", "Nazwa")
//!     .with_property("Age", 21)
//!     .with_property("Address", address);
//! let value = Value::from(person);
//!
//! let text = encode(&value, Notation::Canonical).unwrap();
//! assert!(text.starts_with("@node(\"Person\""));
//! assert!(text.contains("@node(\"Address\""));
//!
//! assert_eq!(decode(&text).unwrap(), value);
//! ```
//!
//! ## Escaping
//!
//! Strings, map keys and node labels are double-quoted. Inside them `"` and
//! `\` are written `\"` and `\\`; newlines, tabs and other control
//! characters use backslash escapes (`\n`, `\t`, `\u0001`, ...).
//!
//! ## Set Ordering
//!
//! Sets are written in the order their elements were first inserted. That
//! order is an implementation detail: compare sets as values, never as text.
//!
//! Floating-point `NaN` never equals itself. A set keeps every `NaN` inserted
//! into it, and a value that contains `NaN` anywhere does not compare equal
//! to its own decoded copy, even though the canonical text round-trips.
//!
//! ## Concurrency
//!
//! Encoding and decoding are pure functions with no shared state; calls on
//! independent inputs can run on any number of threads.

pub mod atom;
pub mod de;
pub mod document;
pub mod error;
pub mod graph;
pub mod macros;
pub mod map;
pub mod node;
pub mod options;
pub mod ser;
pub mod set;
pub mod value;

pub use atom::{Binary, Date, DateTime, Identifier};
pub use de::Decoder;
pub use document::{read_document, read_document_with_options, write_document, EXTENSION};
pub use error::{Error, Result};
pub use graph::{Graph, GraphEdge, GraphNode};
pub use map::ValueMap;
pub use node::Node;
pub use options::{DecodeOptions, Notation};
pub use ser::{Encoder, ValueSerializer};
pub use set::ValueSet;
pub use value::{Number, Tag, Value};

use serde::Serialize;
use std::io;

/// Renders `value` in the given notation.
///
/// # Examples
///
/// ```rust
/// use ifamily::{encode, Binary, Notation, Value};
///
/// let value = Value::from(Binary::new(vec![0x00u8, 0x01, 0xff]));
/// assert_eq!(encode(&value, Notation::Canonical).unwrap(), "@binary(\"AAH/\")");
/// assert_eq!(encode(&value, Notation::NestedList).unwrap(), "AAH/");
/// ```
///
/// # Errors
///
/// Returns [`Error::FormatMismatch`] when [`Notation::NodeOnly`] is applied to
/// anything other than a node.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value, notation: Notation) -> Result<String> {
    let mut encoder = Encoder::new(notation);
    encoder.encode(value)?;
    Ok(encoder.into_inner())
}

/// Renders `value` in the notation named `notation`.
///
/// Accepted names are `canonical`, `nested-list` and `node-only`.
///
/// # Examples
///
/// ```rust
/// use ifamily::{encode_str, Error, Value};
///
/// let value = Value::from("x");
/// assert_eq!(encode_str(&value, "canonical").unwrap(), "\"x\"");
/// assert!(matches!(
///     encode_str(&value, "json"),
///     Err(Error::UnsupportedNotation(_))
/// ));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedNotation`] for unknown names, otherwise as [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_str(value: &Value, notation: &str) -> Result<String> {
    encode(value, notation.parse()?)
}

/// Decodes canonical text into a value.
///
/// Text that does not start with a `@tag` is read as a plain literal when it
/// is one and otherwise returned unchanged as a string.
///
/// # Examples
///
/// ```rust
/// use ifamily::{decode, Value};
///
/// let value = decode("@uuid(\"67e55044-10b1-426f-9247-bb680e5fe0c8\")").unwrap();
/// assert_eq!(value.to_string(), "@uuid(\"67e55044-10b1-426f-9247-bb680e5fe0c8\")");
///
/// assert_eq!(decode("hello").unwrap(), Value::from("hello"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] for unknown tags, truncated payloads, unbalanced
/// quotes or parentheses, and atom payloads that fail validation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(text: &str) -> Result<Value> {
    decode_with_options(text, &DecodeOptions::default())
}

/// Decodes canonical text with custom decoder options.
///
/// # Errors
///
/// As [`decode`], plus [`Error::Parse`] when nesting exceeds
/// [`DecodeOptions::max_depth`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_with_options(text: &str, options: &DecodeOptions) -> Result<Value> {
    de::decode(text, options)
}

/// Converts any `T: Serialize` into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use ifamily::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.to_string(), r#"@map({"x": 1, "y": 2})"#);
///
/// let pair = to_value(&("a", 1)).unwrap();
/// assert_eq!(pair.to_string(), r#"@tuple("a", 1)"#);
/// ```
///
/// # Errors
///
/// Returns an error if a map key is not a string, number or boolean.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Renders `value` in the given notation to a writer.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, value: &Value, notation: Notation) -> Result<()>
where
    W: io::Write,
{
    let text = encode(value, notation)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io("<writer>", &e.to_string()))?;
    Ok(())
}

/// Reads all of `reader` and decodes it.
///
/// # Examples
///
/// ```rust
/// use ifamily::{from_reader, Value};
/// use std::io::Cursor;
///
/// let value = from_reader(Cursor::new(b"@tuple(1, 2)\n")).unwrap();
/// assert_eq!(value, Value::tuple([Value::from(1), Value::from(2)]));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not UTF-8, or decoding fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Value>
where
    R: io::Read,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io("<reader>", &e.to_string()))?;
    decode(text.trim())
}
