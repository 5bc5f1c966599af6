//! Canonical hashable form of a value.

use crate::value::{float_as_i64, Value};

/// A hashable, canonical form of a [`Value`].
///
/// `Value` cannot implement `Eq` or `Hash` because of floats, so grouping
/// by value goes through this key instead. The mapping is canonical:
/// two values are equal exactly when their keys are equal.
///
/// - Integral floats within `i64` range become [`IndexKey::Integer`]
/// - Other floats are keyed by their bit pattern
/// - Object entries are sorted by field name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexKey {
    /// Null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer, including integral floats.
    Integer(i64),
    /// Non-integral float, as raw bits.
    Float(u64),
    /// Text string.
    Text(String),
    /// Array of keys.
    Array(Vec<IndexKey>),
    /// Object entries sorted by field name.
    Object(Vec<(String, IndexKey)>),
}

impl IndexKey {
    /// Converts the key back into a value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            IndexKey::Null => Value::Null,
            IndexKey::Bool(b) => Value::Bool(*b),
            IndexKey::Integer(i) => Value::Integer(*i),
            IndexKey::Float(bits) => Value::Float(f64::from_bits(*bits)),
            IndexKey::Text(s) => Value::Text(s.clone()),
            IndexKey::Array(items) => Value::Array(items.iter().map(IndexKey::to_value).collect()),
            IndexKey::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for IndexKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => IndexKey::Null,
            Value::Bool(b) => IndexKey::Bool(*b),
            Value::Integer(i) => IndexKey::Integer(*i),
            Value::Float(f) => match float_as_i64(*f) {
                Some(i) => IndexKey::Integer(i),
                None => IndexKey::Float(f.to_bits()),
            },
            Value::Text(s) => IndexKey::Text(s.clone()),
            Value::Array(items) => IndexKey::Array(items.iter().map(IndexKey::from).collect()),
            Value::Object(map) => {
                let mut entries: Vec<_> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), IndexKey::from(v)))
                    .collect();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                IndexKey::Object(entries)
            }
        }
    }
}

impl From<Value> for IndexKey {
    fn from(value: Value) -> Self {
        IndexKey::from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn integral_float_keys_as_integer() {
        assert_eq!(
            IndexKey::from(&Value::Float(5.0)),
            IndexKey::from(&Value::Integer(5))
        );
        assert_eq!(IndexKey::from(&Value::Float(-0.0)), IndexKey::Integer(0));
        assert_ne!(
            IndexKey::from(&Value::Float(5.5)),
            IndexKey::from(&Value::Integer(5))
        );
    }

    #[test]
    fn object_key_ignores_field_order() {
        let a = Value::from(json!({"a": 1, "b": [true, null]}));
        let b = Value::from(json!({"b": [true, null], "a": 1.0}));
        assert_eq!(IndexKey::from(&a), IndexKey::from(&b));
    }

    #[test]
    fn key_to_value_is_equal() {
        let v = Value::from(json!({
            "name": "x",
            "nums": [1, 2.5],
            "nested": {"k": false},
        }));
        assert_eq!(IndexKey::from(&v).to_value(), v);
    }

    #[test]
    fn keys_hash_consistently() {
        use std::collections::HashMap;

        let mut groups: HashMap<IndexKey, usize> = HashMap::new();
        for v in [Value::Integer(3), Value::Float(3.0), Value::Text("3".into())] {
            *groups.entry(IndexKey::from(&v)).or_default() += 1;
        }

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&IndexKey::Integer(3)], 2);
    }

    fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-20i64..20).prop_map(Value::Integer),
            (-20i64..20).prop_map(|i| Value::Float(i as f64)),
            (-20.0f64..20.0).prop_map(Value::Float),
            "[ab]{0,2}".prop_map(Value::Text),
        ]
    }

    proptest! {
        #[test]
        fn key_equality_matches_value_equality(a in arb_scalar(), b in arb_scalar()) {
            prop_assert_eq!(a == b, IndexKey::from(&a) == IndexKey::from(&b));
        }
    }
}
