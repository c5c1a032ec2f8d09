//! Deduplicating collection for Set payloads.
//!
//! Values may hold floats, so they are neither `Eq` nor `Hash`. [`ValueSet`]
//! keeps its elements in a `Vec` and an index from a structural fingerprint
//! to positions; an insert only compares against elements whose fingerprint
//! matches. Fingerprints agree whenever values are equal (`0.0` and `-0.0`,
//! date-times at the same instant, sets in any order). Iteration follows
//! first-insertion order, which is stable for a given set but is not part of
//! its identity: two sets are equal when they hold the same elements in any
//! order.
//!
//! `NaN` never equals itself, so repeated `NaN` elements are all kept.

use crate::{Number, Value, ValueMap};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

/// An unordered collection of distinct values.
///
/// # Examples
///
/// ```rust
/// use ifamily::{Value, ValueSet};
///
/// let mut set = ValueSet::new();
/// assert!(set.insert(Value::from(1)));
/// assert!(!set.insert(Value::from(1)));
/// assert_eq!(set.len(), 1);
///
/// let a: ValueSet = vec![Value::from(1), Value::from(2)].into_iter().collect();
/// let b: ValueSet = vec![Value::from(2), Value::from(1)].into_iter().collect();
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Default)]
pub struct ValueSet {
    items: Vec<Value>,
    index: HashMap<u64, Vec<usize>>,
}

impl ValueSet {
    #[must_use]
    pub fn new() -> Self {
        ValueSet::default()
    }

    /// Adds a value, returning `false` if an equal value was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        let key = fingerprint(&value);
        if self.find(key, &value) {
            return false;
        }
        self.index.entry(key).or_default().push(self.items.len());
        self.items.push(value);
        true
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.find(fingerprint(value), value)
    }

    fn find(&self, key: u64, value: &Value) -> bool {
        self.index
            .get(&key)
            .map_or(false, |slots| slots.iter().any(|&i| self.items[i] == *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

fn fingerprint(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_value(value, &mut hasher);
    hasher.finish()
}

// Must hash equal values identically; see the `PartialEq` impls of the atoms
// and containers.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Bool(b) => b.hash(state),
        Value::Number(Number::Integer(i)) => {
            0u8.hash(state);
            i.hash(state);
        }
        Value::Number(Number::Float(f)) => {
            1u8.hash(state);
            // -0.0 == 0.0
            let f = if *f == 0.0 { 0.0f64 } else { *f };
            f.to_bits().hash(state);
        }
        Value::String(s) => s.hash(state),
        Value::Date(d) => d.as_naive().hash(state),
        Value::DateTime(dt) => dt.equality_key().hash(state),
        Value::Binary(b) => b.as_bytes().hash(state),
        Value::Uuid(id) => id.as_uuid().hash(state),
        Value::List(items) | Value::Tuple(items) => hash_seq(items, state),
        Value::Set(set) => {
            set.len().hash(state);
            set.iter()
                .map(fingerprint)
                .fold(0u64, u64::wrapping_add)
                .hash(state);
        }
        Value::Map(map) => hash_entries(map, state),
        Value::Node(node) => {
            node.label().hash(state);
            hash_entries(node.properties(), state);
        }
        Value::Graph(graph) => {
            graph.directed.hash(state);
            graph.nodes.len().hash(state);
            for node in &graph.nodes {
                hash_value(&node.id, state);
                node.label.hash(state);
            }
            graph.edges.len().hash(state);
            for edge in &graph.edges {
                hash_value(&edge.from, state);
                hash_value(&edge.to, state);
                edge.weight.is_some().hash(state);
                if let Some(weight) = &edge.weight {
                    hash_value(weight, state);
                }
            }
        }
    }
}

fn hash_seq<H: Hasher>(items: &[Value], state: &mut H) {
    items.len().hash(state);
    for item in items {
        hash_value(item, state);
    }
}

fn hash_entries<H: Hasher>(map: &ValueMap, state: &mut H) {
    map.len().hash(state);
    for (key, value) in map.iter() {
        key.hash(state);
        hash_value(value, state);
    }
}

impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl Serialize for ValueSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
