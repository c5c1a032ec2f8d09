//! Text encoding.
//!
//! This module renders a [`Value`] in one of the three [`Notation`]s:
//!
//! - **Canonical**: every typed value is written `@tag(payload)`; atoms carry a
//!   quoted string, structural types recurse into their children. This is the
//!   notation the decoder reads back.
//! - **Nested list**: a fully parenthesized, untagged rendering. Lossy; meant
//!   for display and export only.
//! - **Node only**: canonical text, restricted to [`Value::Node`].
//!
//! It also provides [`ValueSerializer`], a serde serializer that converts any
//! `T: Serialize` into a [`Value`].
//!
//! ## Usage
//!
//! ```rust
//! use ifamily::{encode, Notation, Value, ValueMap};
//!
//! let mut map = ValueMap::new();
//! map.insert("a", Value::from(1));
//! map.insert("b", Value::tuple([Value::from("x"), Value::from(2.5)]));
//! let value = Value::Map(map);
//!
//! assert_eq!(
//!     encode(&value, Notation::Canonical).unwrap(),
//!     r#"@map({"a": 1, "b": @tuple("x", 2.5)})"#
//! );
//! assert_eq!(
//!     encode(&value, Notation::NestedList).unwrap(),
//!     "((a 1) (b (x 2.5)))"
//! );
//! ```
//!
//! ## Direct Encoder Usage
//!
//! ```rust
//! use ifamily::{Encoder, Notation, Value};
//!
//! let mut encoder = Encoder::new(Notation::Canonical);
//! encoder.encode(&Value::set([Value::from(1), Value::from(1)])).unwrap();
//! assert_eq!(encoder.into_inner(), "@set([1])");
//! ```

use crate::{to_value, Error, Graph, Node, Notation, Number, Result, Tag, Value, ValueMap};
use serde::{ser, Serialize};

/// The text encoder.
///
/// Accumulates rendered values into an output buffer.
pub struct Encoder {
    output: String,
    notation: Notation,
}

impl Encoder {
    pub fn new(notation: Notation) -> Self {
        Encoder {
            output: String::with_capacity(256),
            notation,
        }
    }

    /// Renders `value` onto the end of the buffer.
    ///
    /// Fails with [`Error::FormatMismatch`] when the notation is
    /// [`Notation::NodeOnly`] and `value` is not a node.
    pub fn encode(&mut self, value: &Value) -> Result<()> {
        match self.notation {
            Notation::Canonical => write_canonical(&mut self.output, value),
            Notation::NestedList => write_nested_list(&mut self.output, value),
            Notation::NodeOnly => match value {
                Value::Node(node) => write_node(&mut self.output, node),
                other => {
                    return Err(Error::format_mismatch(
                        Notation::NodeOnly.as_str(),
                        other.kind(),
                    ))
                }
            },
        }
        Ok(())
    }

    pub fn into_inner(self) -> String {
        self.output
    }
}

pub(crate) fn write_canonical(output: &mut String, value: &Value) {
    match value {
        Value::Null => output.push_str("null"),
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => output.push_str(&n.to_string()),
        Value::String(s) => write_quoted(output, s),
        Value::List(items) => {
            output.push('[');
            write_elements(output, items);
            output.push(']');
        }
        Value::Date(d) => write_atom(output, Tag::Date, &d.to_string()),
        Value::DateTime(dt) => write_atom(output, Tag::DateTime, &dt.to_string()),
        Value::Binary(b) => write_atom(output, Tag::Binary, &b.to_base64()),
        Value::Uuid(id) => write_atom(output, Tag::Uuid, &id.to_string()),
        Value::Set(set) => {
            open_tag(output, Tag::Set);
            output.push('[');
            write_elements(output, set.iter());
            output.push_str("])");
        }
        Value::Map(map) => {
            open_tag(output, Tag::Map);
            write_mapping(output, map);
            output.push(')');
        }
        Value::Tuple(items) => {
            open_tag(output, Tag::Tuple);
            write_elements(output, items);
            output.push(')');
        }
        Value::Graph(graph) => write_graph(output, graph),
        Value::Node(node) => write_node(output, node),
    }
}

fn open_tag(output: &mut String, tag: Tag) {
    output.push('@');
    output.push_str(tag.as_str());
    output.push('(');
}

fn write_atom(output: &mut String, tag: Tag, text: &str) {
    open_tag(output, tag);
    write_quoted(output, text);
    output.push(')');
}

fn write_elements<'a>(output: &mut String, items: impl IntoIterator<Item = &'a Value>) {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        write_canonical(output, item);
    }
}

fn write_mapping(output: &mut String, map: &ValueMap) {
    output.push('{');
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        write_quoted(output, key);
        output.push_str(": ");
        write_canonical(output, value);
    }
    output.push('}');
}

fn write_graph(output: &mut String, graph: &Graph) {
    open_tag(output, Tag::Graph);
    output.push_str("directed=");
    output.push_str(if graph.directed { "true" } else { "false" });

    output.push_str(", nodes=[");
    for (i, node) in graph.nodes.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        output.push_str("{\"id\": ");
        write_canonical(output, &node.id);
        output.push_str(", \"label\": ");
        match &node.label {
            Some(label) => write_quoted(output, label),
            None => output.push_str("null"),
        }
        output.push('}');
    }

    output.push_str("], edges=[");
    for (i, edge) in graph.edges.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        output.push_str("{\"from\": ");
        write_canonical(output, &edge.from);
        output.push_str(", \"to\": ");
        write_canonical(output, &edge.to);
        if let Some(weight) = &edge.weight {
            output.push_str(", \"weight\": ");
            write_canonical(output, weight);
        }
        output.push('}');
    }
    output.push_str("])");
}

fn write_node(output: &mut String, node: &Node) {
    open_tag(output, Tag::Node);
    write_quoted(output, node.label());
    output.push_str(", ");
    write_mapping(output, node.properties());
    output.push(')');
}

/// Writes `s` as a double-quoted string literal.
///
/// `"` and `\` are backslash-escaped, common control characters use their
/// short escapes and any other control character is written `\uXXXX`.
pub(crate) fn write_quoted(output: &mut String, s: &str) {
    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\u{0008}' => output.push_str("\\b"),
            '\u{000C}' => output.push_str("\\f"),
            '\0' => output.push_str("\\0"),
            c if c.is_control() => output.push_str(&format!("\\u{:04x}", c as u32)),
            c => output.push(c),
        }
    }
    output.push('"');
}

fn write_nested_list(output: &mut String, value: &Value) {
    match value {
        Value::Null => output.push_str("null"),
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => output.push_str(&n.to_string()),
        Value::String(s) => output.push_str(s),
        Value::Date(d) => output.push_str(&d.to_string()),
        Value::DateTime(dt) => output.push_str(&dt.to_string()),
        Value::Binary(b) => output.push_str(&b.to_base64()),
        Value::Uuid(id) => output.push_str(&id.to_string()),
        Value::List(items) | Value::Tuple(items) => write_nested_seq(output, items),
        Value::Set(set) => write_nested_seq(output, set.iter()),
        Value::Map(map) => {
            output.push('(');
            write_nested_pairs(output, map.iter().map(|(k, v)| (k.as_str(), v)));
            output.push(')');
        }
        Value::Node(node) => {
            output.push('(');
            output.push_str(node.label());
            if !node.properties().is_empty() {
                output.push(' ');
            }
            write_nested_pairs(
                output,
                node.properties().iter().map(|(k, v)| (k.as_str(), v)),
            );
            output.push(')');
        }
        Value::Graph(graph) => {
            output.push_str("((directed ");
            output.push_str(if graph.directed { "true" } else { "false" });
            output.push_str(") (nodes (");
            for (i, node) in graph.nodes.iter().enumerate() {
                if i > 0 {
                    output.push(' ');
                }
                output.push_str("((id ");
                write_nested_list(output, &node.id);
                output.push_str(") (label ");
                output.push_str(node.label.as_deref().unwrap_or("null"));
                output.push_str("))");
            }
            output.push_str(")) (edges (");
            for (i, edge) in graph.edges.iter().enumerate() {
                if i > 0 {
                    output.push(' ');
                }
                output.push_str("((from ");
                write_nested_list(output, &edge.from);
                output.push_str(") (to ");
                write_nested_list(output, &edge.to);
                output.push(')');
                if let Some(weight) = &edge.weight {
                    output.push_str(" (weight ");
                    write_nested_list(output, weight);
                    output.push(')');
                }
                output.push(')');
            }
            output.push_str(")))");
        }
    }
}

fn write_nested_seq<'a>(output: &mut String, items: impl IntoIterator<Item = &'a Value>) {
    output.push('(');
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        write_nested_list(output, item);
    }
    output.push(')');
}

fn write_nested_pairs<'a>(output: &mut String, pairs: impl Iterator<Item = (&'a str, &'a Value)>) {
    for (i, (key, value)) in pairs.enumerate() {
        if i > 0 {
            output.push(' ');
        }
        output.push('(');
        output.push_str(key);
        output.push(' ');
        write_nested_list(output, value);
        output.push(')');
    }
}

/// Serde serializer producing a [`Value`].
///
/// Serde tuples become [`Value::Tuple`], byte slices [`Value::Binary`],
/// sequences [`Value::List`], and structs and maps [`Value::Map`]. Enum
/// variants carrying data become single-entry maps keyed by variant name.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    tuple: bool,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: ValueMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Number(Number::Integer(i))),
            Err(_) => Ok(Value::Number(Number::Float(v as f64))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Binary(crate::Binary::from(v)))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(wrap_variant(variant, to_value(value)?))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(false, None))
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(true, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(true, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(true, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

impl SerializeVec {
    fn new(tuple: bool, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::new(),
            tuple,
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let value = if self.tuple {
            Value::Tuple(self.vec)
        } else {
            Value::List(self.vec)
        };
        match self.variant {
            Some(variant) => wrap_variant(variant, value),
            None => value,
        }
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: ValueMap::new(),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Value {
        let value = Value::Map(self.map);
        match self.variant {
            Some(variant) => wrap_variant(variant, value),
            None => value,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match to_value(key)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(Error::type_mismatch("string map key", other.kind()));
            }
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

fn wrap_variant(variant: &'static str, value: Value) -> Value {
    let mut map = ValueMap::with_capacity(1);
    map.insert(variant, value);
    Value::Map(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Binary, Date, DateTime, Identifier};

    fn canonical(value: &Value) -> String {
        let mut output = String::new();
        write_canonical(&mut output, value);
        output
    }

    #[test]
    fn test_atoms() {
        let date = Value::from(Date::parse("1999-12-31").unwrap());
        assert_eq!(canonical(&date), "@date(\"1999-12-31\")");

        let dt = Value::from(DateTime::parse("1999-12-31T23:59:59.5+01:00").unwrap());
        assert_eq!(canonical(&dt), "@datetime(\"1999-12-31T23:59:59.500+01:00\")");

        let id = Identifier::parse("123e4567-e89b-12d3-a456-426614174000").unwrap();
        assert_eq!(
            canonical(&Value::from(id)),
            "@uuid(\"123e4567-e89b-12d3-a456-426614174000\")"
        );

        let bin = Value::from(Binary::new(b"hi".to_vec()));
        assert_eq!(canonical(&bin), "@binary(\"aGk=\")");
    }

    #[test]
    fn test_string_escaping() {
        let mut output = String::new();
        write_quoted(&mut output, "say \"hi\"\\\n\u{1}");
        assert_eq!(output, r#""say \"hi\"\\\n\u0001""#);
    }

    #[test]
    fn test_empty_structures() {
        assert_eq!(canonical(&Value::set(Vec::new())), "@set([])");
        assert_eq!(canonical(&Value::Map(ValueMap::new())), "@map({})");
        assert_eq!(canonical(&Value::tuple(Vec::new())), "@tuple()");
        assert_eq!(
            canonical(&Value::Graph(Graph::new(false))),
            "@graph(directed=false, nodes=[], edges=[])"
        );
    }

    #[test]
    fn test_graph_canonical() {
        let mut graph = Graph::new(true);
        graph.add_node(1, Some("a"));
        graph.add_node(2, None::<&str>);
        graph.add_edge(1, 2, Some(Value::from(3)));
        graph.add_edge(2, 1, None);
        assert_eq!(
            canonical(&Value::Graph(graph)),
            "@graph(directed=true, nodes=[{\"id\": 1, \"label\": \"a\"}, {\"id\": 2, \"label\": null}], \
             edges=[{\"from\": 1, \"to\": 2, \"weight\": 3}, {\"from\": 2, \"to\": 1}])"
        );
    }

    #[test]
    fn test_node_only_rejects_other_variants() {
        let mut encoder = Encoder::new(Notation::NodeOnly);
        let err = encoder.encode(&Value::from(1)).unwrap_err();
        assert!(matches!(err, Error::FormatMismatch { .. }));
    }

    #[test]
    fn test_nested_list_node_and_graph() {
        let node = Node::new("Point")
            .unwrap()
            .with_property("x", 1)
            .with_property("y", 2);
        let mut output = String::new();
        write_nested_list(&mut output, &Value::from(node));
        assert_eq!(output, "(Point (x 1) (y 2))");

        let mut graph = Graph::new(false);
        graph.add_node("a", Some("A"));
        graph.add_edge("a", "a", None);
        let mut output = String::new();
        write_nested_list(&mut output, &Value::from(graph));
        assert_eq!(
            output,
            "((directed false) (nodes (((id a) (label A)))) (edges (((from a) (to a)))))"
        );
    }

    #[derive(Serialize)]
    enum Shape {
        Unit,
        Circle(f64),
        Rect { w: u32, h: u32 },
    }

    #[derive(Serialize)]
    struct Record<'a> {
        name: &'a str,
        pair: (i32, bool),
        #[serde(with = "bytes")]
        blob: Vec<u8>,
        shapes: Vec<Shape>,
    }

    mod bytes {
        pub fn serialize<S: serde::Serializer>(v: &[u8], s: S) -> Result<S::Ok, S::Error> {
            s.serialize_bytes(v)
        }
    }

    #[test]
    fn test_value_serializer() {
        let record = Record {
            name: "r",
            pair: (7, true),
            blob: vec![1, 2, 3],
            shapes: vec![Shape::Unit, Shape::Circle(1.5), Shape::Rect { w: 2, h: 3 }],
        };
        let value = to_value(&record).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get("name"), Some(&Value::from("r")));
        assert_eq!(
            map.get("pair"),
            Some(&Value::tuple([Value::from(7), Value::from(true)]))
        );
        assert_eq!(
            map.get("blob"),
            Some(&Value::Binary(Binary::new(vec![1u8, 2, 3])))
        );
        assert_eq!(
            canonical(map.get("shapes").unwrap()),
            r#"["Unit", @map({"Circle": 1.5}), @map({"Rect": @map({"w": 2, "h": 3})})]"#
        );
    }
}
