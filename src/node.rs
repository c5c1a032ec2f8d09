//! Labeled records.

use crate::{Error, Result, Value, ValueMap};
use serde::Serialize;

/// A labeled record: a non-empty label plus ordered properties.
///
/// Property values may be any [`Value`], including nested nodes.
///
/// # Examples
///
/// ```rust
/// use ifamily::{Node, Value};
///
/// let address = Node::new("Address")
///     .unwrap()
///     .with_property("City", "Bandung")
///     .with_property("Code", 40123);
///
/// let person = Node::new("Person")
///     .unwrap()
///     .with_property("Name", "Nazwa")
///     .with_property("Address", address);
///
/// assert_eq!(person.label(), "Person");
/// assert!(matches!(person.get("Address"), Some(Value::Node(_))));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    label: String,
    properties: ValueMap,
}

impl Node {
    /// Creates a node with no properties.
    ///
    /// Fails with [`Error::TypeMismatch`] if `label` is empty.
    pub fn new(label: impl Into<String>) -> Result<Self> {
        Node::with_properties(label, ValueMap::new())
    }

    pub fn with_properties(label: impl Into<String>, properties: ValueMap) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(Error::type_mismatch("non-empty node label", "\"\""));
        }
        Ok(Node { label, properties })
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(key, value.into())
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn properties(&self) -> &ValueMap {
        &self.properties
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_label_rejected() {
        assert!(matches!(Node::new(""), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_property_replacement_keeps_position() {
        let mut node = Node::new("N")
            .unwrap()
            .with_property("a", 1)
            .with_property("b", 2);
        node.insert("a", 10);
        let keys: Vec<&str> = node.properties().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(node.get("a"), Some(&Value::from(10)));
    }
}
