//! The value model.
//!
//! This module provides the [`Value`] enum, the closed set of representable
//! types. Variants fall into three groups:
//!
//! - **Untyped scalars**: `Null`, `Bool`, `Number`, `String` and the plain
//!   sequence `List`, written as bare literals
//! - **Atoms**: `Date`, `DateTime`, `Binary`, `Uuid`, written `@tag("...")`
//! - **Structural types**: `Set`, `Map`, `Tuple`, `Graph`, `Node`, which own
//!   their children exclusively
//!
//! ## Creating Values
//!
//! ```rust
//! use ifamily::{Binary, Date, Value};
//!
//! let text = Value::from("hello");
//! let number = Value::from(42);
//! let date = Value::from(Date::parse("2024-01-15").unwrap());
//! let blob = Value::from(Binary::new(vec![0u8, 1, 255]));
//!
//! assert!(text.is_string());
//! assert_eq!(number.as_i64(), Some(42));
//! assert_eq!(date.to_string(), "@date(\"2024-01-15\")");
//! assert_eq!(blob.to_string(), "@binary(\"AAH/\")");
//! ```
//!
//! `Display` renders the canonical notation, so `value.to_string()` is the
//! same text [`crate::encode`] produces for [`crate::Notation::Canonical`].

use crate::{Binary, Date, DateTime, Graph, Identifier, Node, ValueMap, ValueSet};
use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;
use uuid::Uuid;

/// Any value of the data model.
///
/// # Examples
///
/// ```rust
/// use ifamily::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Date(Date),
    DateTime(DateTime),
    Binary(Binary),
    Uuid(Identifier),
    Set(ValueSet),
    Map(ValueMap),
    Tuple(Vec<Value>),
    Graph(Graph),
    Node(Node),
}

/// A numeric scalar.
///
/// # Examples
///
/// ```rust
/// use ifamily::Number;
///
/// assert_eq!(Number::Integer(42).to_string(), "42");
/// assert_eq!(Number::Float(1.0).to_string(), "1.0");
/// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it is an integer or a whole float
    /// within range.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

// Floats always carry a '.' or an exponent so they never read back as integers.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{:?}", fl),
        }
    }
}

/// The type tags of the canonical notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Date,
    DateTime,
    Binary,
    Uuid,
    Set,
    Map,
    Tuple,
    Graph,
    Node,
}

impl Tag {
    pub const ALL: [Tag; 9] = [
        Tag::Date,
        Tag::DateTime,
        Tag::Binary,
        Tag::Uuid,
        Tag::Set,
        Tag::Map,
        Tag::Tuple,
        Tag::Graph,
        Tag::Node,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Tag::Date => "date",
            Tag::DateTime => "datetime",
            Tag::Binary => "binary",
            Tag::Uuid => "uuid",
            Tag::Set => "set",
            Tag::Map => "map",
            Tag::Tuple => "tuple",
            Tag::Graph => "graph",
            Tag::Node => "node",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.as_str() == name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Returns the tag this value is written with, or `None` for untyped scalars.
    #[must_use]
    pub const fn tag(&self) -> Option<Tag> {
        match self {
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::List(_) => None,
            Value::Date(_) => Some(Tag::Date),
            Value::DateTime(_) => Some(Tag::DateTime),
            Value::Binary(_) => Some(Tag::Binary),
            Value::Uuid(_) => Some(Tag::Uuid),
            Value::Set(_) => Some(Tag::Set),
            Value::Map(_) => Some(Tag::Map),
            Value::Tuple(_) => Some(Tag::Tuple),
            Value::Graph(_) => Some(Tag::Graph),
            Value::Node(_) => Some(Tag::Node),
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            other => match other.tag() {
                Some(tag) => tag.as_str(),
                None => "value",
            },
        }
    }

    /// Returns `true` for atoms: date, datetime, binary and uuid.
    #[must_use]
    pub const fn is_atom(&self) -> bool {
        matches!(
            self,
            Value::Date(_) | Value::DateTime(_) | Value::Binary(_) | Value::Uuid(_)
        )
    }

    /// Returns `true` for structural types: set, map, tuple, graph and node.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Value::Set(_) | Value::Map(_) | Value::Tuple(_) | Value::Graph(_) | Value::Node(_)
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_node(&self) -> bool {
        matches!(self, Value::Node(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<&Date> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uuid(&self) -> Option<&Identifier> {
        match self {
            Value::Uuid(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the elements of a `List` or `Tuple`.
    #[must_use]
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_graph(&self) -> Option<&Graph> {
        match self {
            Value::Graph(g) => Some(g),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Builds a `Tuple` from its elements.
    #[must_use]
    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Value {
        Value::Tuple(items.into_iter().collect())
    }

    /// Builds a `Set`; duplicate elements collapse.
    #[must_use]
    pub fn set(items: impl IntoIterator<Item = Value>) -> Value {
        Value::Set(items.into_iter().collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = String::new();
        crate::ser::write_canonical(&mut output, self);
        f.write_str(&output)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) | Value::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for element in items {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Date(d) => serializer.collect_str(d),
            Value::DateTime(dt) => serializer.collect_str(dt),
            Value::Binary(b) => serializer.serialize_bytes(b.as_bytes()),
            Value::Uuid(id) => serializer.collect_str(id),
            Value::Set(set) => set.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
            Value::Graph(graph) => graph.serialize(serializer),
            Value::Node(node) => node.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::Float(value as f64))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

impl From<ValueSet> for Value {
    fn from(value: ValueSet) -> Self {
        Value::Set(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(Date::new(value))
    }
}

impl From<DateTime> for Value {
    fn from(value: DateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<Binary> for Value {
    fn from(value: Binary) -> Self {
        Value::Binary(value)
    }
}

impl From<Identifier> for Value {
    fn from(value: Identifier) -> Self {
        Value::Uuid(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(Identifier::from(value))
    }
}

impl From<Graph> for Value {
    fn from(value: Graph) -> Self {
        Value::Graph(value)
    }
}

impl From<Node> for Value {
    fn from(value: Node) -> Self {
        Value::Node(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_round_trip() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_name(tag.as_str()), Some(tag));
        }
        assert_eq!(Tag::from_name("list"), None);
    }

    #[test]
    fn test_scalars_have_no_tag() {
        assert_eq!(Value::Null.tag(), None);
        assert_eq!(Value::from(vec![Value::from(1)]).tag(), None);
        assert_eq!(Value::tuple([Value::from(1)]).tag(), Some(Tag::Tuple));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::from(1.5).kind(), "number");
        assert_eq!(Value::from(Binary::new(vec![1u8])).kind(), "binary");
        assert_eq!(Value::set(Vec::new()).kind(), "set");
    }

    #[test]
    fn test_float_display_keeps_fraction() {
        assert_eq!(Number::Float(2.0).to_string(), "2.0");
        assert_eq!(Number::Float(-0.25).to_string(), "-0.25");
        assert_eq!(Number::Float(1e300).to_string(), "1e300");
        assert_eq!(Number::Float(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn test_float_to_i64_range() {
        assert_eq!(Number::Float(42.0).as_i64(), Some(42));
        assert_eq!(Number::Float(i64::MIN as f64).as_i64(), Some(i64::MIN));
        // 2^63 is one past i64::MAX
        assert_eq!(Number::Float(9.223372036854776e18).as_i64(), None);
        assert_eq!(Number::Float(0.5).as_i64(), None);
    }

    #[test]
    fn test_set_constructor_collapses_duplicates() {
        let set = Value::set([Value::from(1), Value::from(1), Value::from(2)]);
        assert_eq!(set.as_set().map(ValueSet::len), Some(2));
    }

    #[test]
    fn test_atom_and_structural_groups() {
        assert!(Value::from(Identifier::new()).is_atom());
        assert!(!Value::from("x").is_atom());
        assert!(Value::tuple(Vec::new()).is_structural());
        assert!(!Value::List(Vec::new()).is_structural());
    }

    #[test]
    fn test_serialize_to_json() {
        let node = Node::new("Person")
            .unwrap()
            .with_property("Name", "Nazwa")
            .with_property("Born", Date::parse("2003-04-05").unwrap());
        let json = serde_json::to_value(Value::from(node)).unwrap();
        assert_eq!(json["label"], "Person");
        assert_eq!(json["properties"]["Name"], "Nazwa");
        assert_eq!(json["properties"]["Born"], "2003-04-05");
    }
}
