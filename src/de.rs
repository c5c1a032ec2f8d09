//! Canonical-notation decoding.
//!
//! This module provides the [`Decoder`], a single-pass recursive-descent
//! parser that reads canonical text back into a [`Value`].
//!
//! ## Overview
//!
//! - **Tag dispatch**: the name after `@` selects a production from a fixed
//!   table; adding a type means adding one table entry
//! - **Literals**: `null`, booleans, numbers, quoted strings and `[...]` lists
//!   are read without a tag
//! - **Error reporting**: failures carry byte offset, line and column
//! - **Bounded recursion**: nesting deeper than
//!   [`DecodeOptions::max_depth`](crate::DecodeOptions) is rejected
//!
//! ## Usage
//!
//! ```rust
//! use ifamily::{decode, Value};
//!
//! let value = decode(r#"@tuple(1, "two", @set([3]))"#).unwrap();
//! assert_eq!(value.as_slice().map(|items| items.len()), Some(3));
//!
//! // Untagged text that is not a literal passes through as a string
//! assert_eq!(decode("hello").unwrap(), Value::from("hello"));
//! ```

use crate::{
    Binary, Date, DateTime, DecodeOptions, Error, Graph, GraphEdge, GraphNode, Identifier, Node,
    Number, Result, Tag, Value, ValueMap, ValueSet,
};

type Production = fn(&mut Decoder<'_>) -> Result<Value>;

/// Tag name to production. Every tag the encoder emits has an entry.
static PRODUCTIONS: [(Tag, Production); 9] = [
    (Tag::Date, parse_date),
    (Tag::DateTime, parse_datetime),
    (Tag::Binary, parse_binary),
    (Tag::Uuid, parse_uuid),
    (Tag::Set, parse_set),
    (Tag::Map, parse_map),
    (Tag::Tuple, parse_tuple),
    (Tag::Graph, parse_graph),
    (Tag::Node, parse_node),
];

fn production(name: &str) -> Option<(Tag, Production)> {
    PRODUCTIONS
        .iter()
        .find(|(tag, _)| tag.as_str() == name)
        .copied()
}

/// The canonical-notation decoder.
///
/// Created via [`Decoder::new`]; [`Decoder::parse_document`] reads exactly
/// one value and rejects trailing input.
pub struct Decoder<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    options: DecodeOptions,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a str, options: DecodeOptions) -> Self {
        Decoder {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            options,
        }
    }

    /// Parses one complete value, allowing surrounding whitespace only.
    pub fn parse_document(&mut self) -> Result<Value> {
        let value = self.parse_value()?;
        self.skip_whitespace();
        if !self.at_end() {
            return Err(self.error("unexpected trailing characters"));
        }
        Ok(value)
    }

    /// Returns `true` if the next non-whitespace character opens a tag.
    fn starts_tagged(&mut self) -> bool {
        self.skip_whitespace();
        self.peek_char() == Some('@')
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn error(&self, msg: &str) -> Error {
        Error::parse(self.position, self.line, self.column, msg)
    }

    fn error_at(&self, mark: Mark, msg: &str) -> Error {
        Error::parse(mark.position, mark.line, mark.column, msg)
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.next_char();
                Ok(())
            }
            Some(ch) => Err(self.error(&format!("expected '{}', found '{}'", expected, ch))),
            None => Err(self.error(&format!("expected '{}', found end of input", expected))),
        }
    }

    /// Consumes `c` if it is the next non-whitespace character.
    fn eat_char(&mut self, c: char) -> bool {
        self.skip_whitespace();
        if self.peek_char() == Some(c) {
            self.next_char();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        self.skip_whitespace();
        if self.input[self.position..].starts_with(keyword) {
            for _ in keyword.chars() {
                self.next_char();
            }
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", keyword)))
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(&format!(
                "nesting exceeds maximum depth of {}",
                self.options.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();

        match self.peek_char() {
            Some('@') => self.parse_tagged(),
            Some('"') => Ok(Value::String(self.parse_string()?)),
            Some('[') => {
                self.enter()?;
                self.next_char();
                let items = self.parse_elements(']')?;
                self.expect_char(']')?;
                self.leave();
                Ok(Value::List(items))
            }
            Some('t') | Some('f') => Ok(Value::Bool(self.parse_bool()?)),
            Some('n') => {
                self.expect_keyword("null")?;
                Ok(Value::Null)
            }
            Some('N') => {
                self.expect_keyword("NaN")?;
                Ok(Value::Number(Number::Float(f64::NAN)))
            }
            Some('i') => {
                self.expect_keyword("inf")?;
                Ok(Value::Number(Number::Float(f64::INFINITY)))
            }
            Some(ch) if ch.is_ascii_digit() || ch == '-' => Ok(Value::Number(self.parse_number()?)),
            Some(ch) => Err(self.error(&format!("unexpected character '{}'", ch))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_tagged(&mut self) -> Result<Value> {
        let start = self.mark();
        self.next_char(); // '@'

        let name_start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.next_char();
            } else {
                break;
            }
        }
        let name = &self.input[name_start..self.position];
        if name.is_empty() {
            return Err(self.error_at(start, "expected a tag name after '@'"));
        }
        let (tag, parse) = production(name)
            .ok_or_else(|| self.error_at(start, &format!("unknown tag '@{}'", name)))?;
        tracing::trace!(tag = %tag, offset = start.position, "tag production");

        self.enter()?;
        self.expect_char('(')?;
        let value = parse(self)?;
        self.expect_char(')')?;
        self.leave();
        Ok(value)
    }

    fn parse_string(&mut self) -> Result<String> {
        self.skip_whitespace();
        if self.peek_char() != Some('"') {
            return Err(self.error("expected string"));
        }
        self.next_char(); // consume opening quote

        let mut result = String::new();
        while let Some(ch) = self.next_char() {
            match ch {
                '"' => return Ok(result),
                '\\' => match self.next_char() {
                    Some('\\') => result.push('\\'),
                    Some('"') => result.push('"'),
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('b') => result.push('\u{0008}'),
                    Some('f') => result.push('\u{000C}'),
                    Some('0') => result.push('\0'),
                    Some('u') => result.push(self.parse_unicode_escape()?),
                    Some(other) => {
                        // Unknown escape - preserve literally
                        result.push('\\');
                        result.push(other);
                    }
                    None => return Err(self.error("unexpected end of input in string")),
                },
                other => result.push(other),
            }
        }
        Err(self.error("unterminated string"))
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.next_char() {
                Some(ch) if ch.is_ascii_hexdigit() => hex.push(ch),
                _ => {
                    return Err(
                        self.error("invalid unicode escape sequence (expected 4 hex digits)")
                    )
                }
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error("invalid unicode code point"))
    }

    fn parse_bool(&mut self) -> Result<bool> {
        self.skip_whitespace();
        if self.input[self.position..].starts_with("true") {
            self.expect_keyword("true")?;
            Ok(true)
        } else if self.input[self.position..].starts_with("false") {
            self.expect_keyword("false")?;
            Ok(false)
        } else {
            Err(self.error("expected boolean"))
        }
    }

    fn parse_number(&mut self) -> Result<Number> {
        let start = self.mark();

        if self.peek_char() == Some('-') {
            self.next_char();
            if self.input[self.position..].starts_with("inf") {
                self.expect_keyword("inf")?;
                return Ok(Number::Float(f64::NEG_INFINITY));
            }
        }

        let mut is_float = false;
        self.consume_digits();
        if self.peek_char() == Some('.') {
            is_float = true;
            self.next_char();
            self.consume_digits();
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            is_float = true;
            self.next_char();
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.next_char();
            }
            self.consume_digits();
        }

        let text = &self.input[start.position..self.position];
        if is_float {
            text.parse::<f64>()
                .map(Number::Float)
                .map_err(|_| self.error_at(start, &format!("invalid float '{}'", text)))
        } else {
            text.parse::<i64>()
                .map(Number::Integer)
                .map_err(|_| self.error_at(start, &format!("invalid integer '{}'", text)))
        }
    }

    fn consume_digits(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Parses comma-separated values up to (not including) `close`.
    fn parse_elements(&mut self, close: char) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek_char() == Some(close) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_value()?);
            if !self.eat_char(',') {
                break;
            }
        }
        Ok(items)
    }

    /// Parses a `{"key": value, ...}` mapping literal.
    fn parse_mapping(&mut self) -> Result<ValueMap> {
        self.expect_char('{')?;
        let mut map = ValueMap::new();
        self.skip_whitespace();
        if self.eat_char('}') {
            return Ok(map);
        }
        loop {
            let key_mark = self.mark();
            let key = self.parse_string()?;
            self.expect_char(':')?;
            let value = self.parse_value()?;
            if map.insert(key.clone(), value).is_some() {
                return Err(self.error_at(key_mark, &format!("duplicate key \"{}\"", key)));
            }
            if !self.eat_char(',') {
                break;
            }
        }
        self.expect_char('}')?;
        Ok(map)
    }

    /// Reads a quoted atom payload and hands it to a validating constructor.
    fn parse_atom<T>(&mut self, construct: impl FnOnce(&str) -> Result<T>) -> Result<T> {
        self.skip_whitespace();
        let start = self.mark();
        let text = self.parse_string()?;
        construct(text.as_str()).map_err(|e| self.error_at(start, &e.to_string()))
    }
}

#[derive(Clone, Copy)]
struct Mark {
    position: usize,
    line: usize,
    column: usize,
}

fn parse_date(d: &mut Decoder<'_>) -> Result<Value> {
    d.parse_atom(Date::parse).map(Value::Date)
}

fn parse_datetime(d: &mut Decoder<'_>) -> Result<Value> {
    d.parse_atom(DateTime::parse).map(Value::DateTime)
}

fn parse_binary(d: &mut Decoder<'_>) -> Result<Value> {
    d.parse_atom(Binary::from_base64).map(Value::Binary)
}

fn parse_uuid(d: &mut Decoder<'_>) -> Result<Value> {
    d.parse_atom(Identifier::parse).map(Value::Uuid)
}

fn parse_set(d: &mut Decoder<'_>) -> Result<Value> {
    d.expect_char('[')?;
    let items = d.parse_elements(']')?;
    d.expect_char(']')?;
    Ok(Value::Set(items.into_iter().collect::<ValueSet>()))
}

fn parse_map(d: &mut Decoder<'_>) -> Result<Value> {
    d.parse_mapping().map(Value::Map)
}

fn parse_tuple(d: &mut Decoder<'_>) -> Result<Value> {
    d.parse_elements(')').map(Value::Tuple)
}

fn parse_graph(d: &mut Decoder<'_>) -> Result<Value> {
    d.expect_keyword("directed")?;
    d.expect_char('=')?;
    let mut graph = Graph::new(d.parse_bool()?);

    d.expect_char(',')?;
    d.expect_keyword("nodes")?;
    d.expect_char('=')?;
    d.expect_char('[')?;
    d.skip_whitespace();
    if d.peek_char() != Some(']') {
        loop {
            let mark = d.mark();
            let mut entry = d.parse_mapping()?;
            let id = entry
                .remove("id")
                .ok_or_else(|| d.error_at(mark, "graph node is missing \"id\""))?;
            let label = match entry.remove("label") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s),
                Some(other) => {
                    return Err(d.error_at(
                        mark,
                        &format!("graph node label must be a string, found {}", other.kind()),
                    ))
                }
            };
            reject_extra_keys(d, mark, &entry, "graph node")?;
            graph.nodes.push(GraphNode { id, label });
            if !d.eat_char(',') {
                break;
            }
        }
    }
    d.expect_char(']')?;

    d.expect_char(',')?;
    d.expect_keyword("edges")?;
    d.expect_char('=')?;
    d.expect_char('[')?;
    d.skip_whitespace();
    if d.peek_char() != Some(']') {
        loop {
            let mark = d.mark();
            let mut entry = d.parse_mapping()?;
            let from = entry
                .remove("from")
                .ok_or_else(|| d.error_at(mark, "graph edge is missing \"from\""))?;
            let to = entry
                .remove("to")
                .ok_or_else(|| d.error_at(mark, "graph edge is missing \"to\""))?;
            let weight = entry.remove("weight");
            reject_extra_keys(d, mark, &entry, "graph edge")?;
            graph.edges.push(GraphEdge { from, to, weight });
            if !d.eat_char(',') {
                break;
            }
        }
    }
    d.expect_char(']')?;
    Ok(Value::Graph(graph))
}

fn reject_extra_keys(d: &Decoder<'_>, mark: Mark, entry: &ValueMap, what: &str) -> Result<()> {
    match entry.keys().next() {
        Some(key) => Err(d.error_at(mark, &format!("unexpected key \"{}\" in {}", key, what))),
        None => Ok(()),
    }
}

fn parse_node(d: &mut Decoder<'_>) -> Result<Value> {
    d.skip_whitespace();
    let mark = d.mark();
    let label = d.parse_string()?;
    d.expect_char(',')?;
    let properties = d.parse_mapping()?;
    Node::with_properties(label, properties)
        .map(Value::Node)
        .map_err(|e| d.error_at(mark, &e.to_string()))
}

/// Decodes canonical text.
///
/// Text whose first non-whitespace character is `@` must be one complete
/// tagged expression. Other text is read as a literal when it is one, and is
/// otherwise returned unchanged as [`Value::String`].
pub(crate) fn decode(text: &str, options: &DecodeOptions) -> Result<Value> {
    tracing::debug!(len = text.len(), "decoding document");
    let mut decoder = Decoder::new(text, options.clone());
    if decoder.starts_tagged() {
        return decoder.parse_document();
    }
    match decoder.parse_document() {
        Ok(value) => Ok(value),
        Err(_) => Ok(Value::String(text.to_string())),
    }
}
