//! Property-based tests for the round-trip guarantees.
//!
//! Values are generated from every variant, nested a few levels deep. NaN is
//! left out: it never compares equal to itself, so no value holding it can
//! equal its own decoded copy.

use chrono::{FixedOffset, NaiveDate};
use ifamily::{
    decode, encode, Binary, Date, DateTime, Graph, Identifier, Node, Notation, Value, ValueMap,
};
use proptest::prelude::*;
use uuid::Uuid;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1000i32..=9999, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_datetime() -> impl Strategy<Value = DateTime> {
    (
        arb_date(),
        0u32..24,
        0u32..60,
        0u32..60,
        0u32..1_000_000_000,
        proptest::option::of(-50_400i32..=50_400),
    )
        .prop_map(|(date, h, m, s, nanos, offset)| {
            let naive = date.and_hms_nano_opt(h, m, s, nanos).unwrap();
            match offset {
                Some(seconds) => {
                    DateTime::with_offset(naive, FixedOffset::east_opt(seconds).unwrap())
                }
                None => DateTime::from_naive(naive),
            }
        })
}

fn arb_label() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _\"\\\\]{0,12}"
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::from),
        any::<String>().prop_map(Value::from),
        arb_date().prop_map(|d| Value::from(Date::new(d))),
        arb_datetime().prop_map(Value::from),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(|b| Value::from(Binary::new(b))),
        any::<u128>().prop_map(|n| Value::from(Identifier::from(Uuid::from_u128(n)))),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::tuple),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::set),
            prop::collection::vec(("\\PC{0,8}", inner.clone()), 0..6)
                .prop_map(|entries| Value::Map(entries.into_iter().collect::<ValueMap>())),
            (arb_label(), prop::collection::vec(("[a-z]{1,6}", inner.clone()), 0..5)).prop_map(
                |(label, entries)| {
                    let properties = entries.into_iter().collect::<ValueMap>();
                    Value::from(Node::with_properties(label, properties).unwrap())
                }
            ),
            (
                any::<bool>(),
                prop::collection::vec(
                    (inner.clone(), proptest::option::of(arb_label())),
                    0..4
                ),
                prop::collection::vec(
                    (inner.clone(), inner.clone(), proptest::option::of(inner)),
                    0..4
                ),
            )
                .prop_map(|(directed, nodes, edges)| {
                    let mut graph = Graph::new(directed);
                    for (id, label) in nodes {
                        graph.add_node(id, label);
                    }
                    for (from, to, weight) in edges {
                        graph.add_edge(from, to, weight);
                    }
                    Value::from(graph)
                }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(value in arb_value()) {
        let text = encode(&value, Notation::Canonical).unwrap();
        let back = decode(&text);
        prop_assert!(back.is_ok(), "failed to decode {}: {:?}", text, back);
        prop_assert_eq!(back.unwrap(), value);
    }

    #[test]
    fn prop_canonical_text_is_fixed_point(value in arb_value()) {
        let text = encode(&value, Notation::Canonical).unwrap();
        let again = encode(&decode(&text).unwrap(), Notation::Canonical).unwrap();
        prop_assert_eq!(again, text);
    }

    #[test]
    fn prop_binary_bytes_survive(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let value = Value::from(Binary::new(bytes.clone()));
        let back = decode(&encode(&value, Notation::Canonical).unwrap()).unwrap();
        prop_assert_eq!(back.as_binary().unwrap().as_bytes(), bytes.as_slice());
    }

    #[test]
    fn prop_nested_list_always_renders(value in arb_value()) {
        prop_assert!(encode(&value, Notation::NestedList).is_ok());
    }

    #[test]
    fn prop_node_only_requires_node(value in arb_value()) {
        let result = encode(&value, Notation::NodeOnly);
        prop_assert_eq!(result.is_ok(), value.is_node());
    }

    #[test]
    fn prop_decode_never_panics(text in "\\PC{0,64}") {
        let _ = decode(&text);
    }

    #[test]
    fn prop_untagged_text_never_fails(text in "[a-z ,()]{1,32}") {
        prop_assert!(decode(&text).is_ok());
    }
}
