use ifamily::{encode, encode_str, Date, Error, Graph, Node, Notation, Value, ValueMap};

fn address() -> Node {
    Node::new("Address")
        .unwrap()
        .with_property("City", "Bandung")
        .with_property("Code", 40123)
}

#[test]
fn test_nested_list_node() {
    let person = Node::new("Person")
        .unwrap()
        .with_property("Name", "Nazwa")
        .with_property("Born", Date::parse("2003-04-05").unwrap())
        .with_property("Address", address());

    let text = encode(&Value::from(person), Notation::NestedList).unwrap();
    println!("Nested list:\n{}", text);
    assert_eq!(
        text,
        "(Person (Name Nazwa) (Born 2003-04-05) (Address (Address (City Bandung) (Code 40123))))"
    );
}

#[test]
fn test_nested_list_node_without_properties() {
    let node = Node::new("Empty").unwrap();
    assert_eq!(
        encode(&Value::from(node), Notation::NestedList).unwrap(),
        "(Empty)"
    );
}

#[test]
fn test_nested_list_collections() {
    let mut map = ValueMap::new();
    map.insert("xs", Value::List(vec![Value::from(1), Value::from(2)]));
    map.insert("pair", Value::tuple([Value::from("a"), Value::Null]));
    map.insert("tags", Value::set([Value::from(true)]));

    assert_eq!(
        encode(&Value::Map(map), Notation::NestedList).unwrap(),
        "((xs (1 2)) (pair (a null)) (tags (true)))"
    );
    assert_eq!(
        encode(&Value::List(Vec::new()), Notation::NestedList).unwrap(),
        "()"
    );
}

#[test]
fn test_nested_list_graph() {
    let mut graph = Graph::new(true);
    graph.add_node("a", Some("A"));
    graph.add_node("b", None::<String>);
    graph.add_edge("a", "b", Some(Value::from(2)));

    assert_eq!(
        encode(&Value::from(graph), Notation::NestedList).unwrap(),
        "((directed true) (nodes (((id a) (label A)) ((id b) (label null)))) \
         (edges (((from a) (to b) (weight 2)))))"
    );
}

#[test]
fn test_nested_list_is_not_tagged() {
    let value = Value::tuple([Value::from(Date::parse("2024-01-01").unwrap())]);
    let text = encode(&value, Notation::NestedList).unwrap();
    assert!(!text.contains('@'));
    assert_eq!(text, "(2024-01-01)");
}

#[test]
fn test_node_only_accepts_nodes() {
    let node = Value::from(address());
    assert_eq!(
        encode(&node, Notation::NodeOnly).unwrap(),
        encode(&node, Notation::Canonical).unwrap()
    );
}

#[test]
fn test_node_only_rejects_everything_else() {
    let values = vec![
        Value::Null,
        Value::from("Person"),
        Value::Map(ValueMap::new()),
        Value::tuple([Value::from(address())]),
        Value::from(Graph::new(false)),
    ];
    for value in values {
        let err = encode(&value, Notation::NodeOnly).unwrap_err();
        assert!(
            matches!(err, Error::FormatMismatch { .. }),
            "unexpected error for {}: {}",
            value,
            err
        );
    }
}

#[test]
fn test_notation_names() {
    let node = Value::from(address());
    assert_eq!(
        encode_str(&node, "nested-list").unwrap(),
        "(Address (City Bandung) (Code 40123))"
    );
    assert!(encode_str(&node, "node-only").is_ok());
    assert!(matches!(
        encode_str(&node, "Canonical"),
        Err(Error::UnsupportedNotation(_))
    ));
}
