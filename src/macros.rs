/// Builds a [`Value`](crate::Value) from a literal-like syntax.
///
/// `null`, `true`, `false`, `[...]` lists and `{"key": value}` maps are
/// written directly; any other token tree is converted with `Value::from`,
/// so atoms, nodes and existing values embed unchanged. Wrap compound
/// expressions in parentheses.
///
/// # Examples
///
/// ```rust
/// use ifamily::{ifamily, Date};
///
/// let value = ifamily!({
///     "name": "Nazwa",
///     "age": 21,
///     "tags": ["a", "b"],
///     "born": (Date::parse("2003-01-01").unwrap())
/// });
/// assert_eq!(value.as_map().map(|m| m.len()), Some(4));
/// ```
#[macro_export]
macro_rules! ifamily {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::ifamily!($elem)),*])
    };

    ({}) => {
        $crate::Value::Map($crate::ValueMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::ValueMap::new();
        $(
            map.insert($key, $crate::ifamily!($value));
        )*
        $crate::Value::Map(map)
    }};

    ($e:expr) => {
        $crate::Value::from($e)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Binary, Date, Number, Value, ValueMap};

    #[test]
    fn test_macro_primitives() {
        assert_eq!(ifamily!(null), Value::Null);
        assert_eq!(ifamily!(true), Value::Bool(true));
        assert_eq!(ifamily!(false), Value::Bool(false));
        assert_eq!(ifamily!(42), Value::Number(Number::Integer(42)));
        assert_eq!(ifamily!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(ifamily!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_macro_lists_and_maps() {
        assert_eq!(ifamily!([]), Value::List(vec![]));
        assert_eq!(ifamily!({}), Value::Map(ValueMap::new()));

        let value = ifamily!({
            "name": "Alice",
            "scores": [1, 2, 3]
        });
        let map = value.as_map().unwrap();
        assert_eq!(map.get("name"), Some(&Value::from("Alice")));
        assert_eq!(
            map.get("scores"),
            Some(&Value::List(vec![
                Value::from(1),
                Value::from(2),
                Value::from(3)
            ]))
        );
    }

    #[test]
    fn test_macro_embeds_values() {
        let blob = Value::from(Binary::new(vec![9u8]));
        let date = Date::parse("2020-02-02").unwrap();
        let value = ifamily!([(blob.clone()), date, (Value::tuple([Value::from(1)]))]);
        assert_eq!(
            value,
            Value::List(vec![
                blob,
                Value::Date(date),
                Value::tuple([Value::from(1)])
            ])
        );
    }
}
