//! Dynamic document value type.

use indexmap::IndexMap;
use std::fmt;

/// An ordered mapping from field name to value.
///
/// Insertion order is preserved so documents round-trip through the file
/// with their fields in the order they were written.
pub type Map = IndexMap<String, Value>;

/// A dynamic JSON value.
///
/// Numbers are split into [`Value::Integer`] (anything that fits an `i64`)
/// and [`Value::Float`]; the two compare equal when they denote the same
/// number, so `5` and `5.0` are the same value.
///
/// Object equality ignores key order.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Text string.
    Text(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Nested object.
    Object(Map),
}

/// Returns true if `f` is exactly the integer `i`.
pub(crate) fn int_eq_float(i: i64, f: f64) -> bool {
    float_as_i64(f) == Some(i)
}

/// Converts `f` to an `i64` if it is integral and within range.
pub(crate) fn float_as_i64(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; i64::MAX is not.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.fract() == 0.0 && f >= -LIMIT && f < LIMIT {
        #[allow(clippy::cast_possible_truncation)]
        Some(f as i64)
    } else {
        None
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i)) => {
                int_eq_float(*i, *f)
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Returns the JSON kind of this value, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a number of either representation.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer.
    ///
    /// Integral floats within range are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(f) => float_as_i64(*f),
            _ => None,
        }
    }

    /// Get this value as a float, if it is a number.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get this value as a string, if it is a text string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as an object, if it is one.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Consumes the value, returning the object if it is one.
    pub fn into_object(self) -> Result<Map, Value> {
        match self {
            Value::Object(m) => Ok(m),
            other => Err(other),
        }
    }

    /// Look up a key in this object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Float(n as f64),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Object(m)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(a) => Value::Array(a.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(o) => {
                Value::Object(o.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Text(s) => serde_json::Value::String(s),
            Value::Array(a) => {
                serde_json::Value::Array(a.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(m) => serde_json::Value::Object(
                m.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(pairs: &[(&str, Value)]) -> Value {
        Value::Object(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn integer_equals_integral_float() {
        assert_eq!(Value::Integer(5), Value::Float(5.0));
        assert_eq!(Value::Float(5.0), Value::Integer(5));
        assert_ne!(Value::Integer(5), Value::Float(5.5));
        assert_eq!(Value::Integer(-3), Value::Float(-3.0));
    }

    #[test]
    fn large_float_never_equals_out_of_range_integer() {
        assert_ne!(Value::Integer(i64::MAX), Value::Float(9.3e18));
        assert_eq!(
            Value::Integer(i64::MIN),
            Value::Float(-9_223_372_036_854_775_808.0)
        );
    }

    #[test]
    fn kinds_do_not_cross() {
        assert_ne!(Value::Text("5".into()), Value::Integer(5));
        assert_ne!(Value::Bool(false), Value::Null);
        assert_ne!(Value::Integer(0), Value::Null);
        assert_ne!(Value::Array(vec![]), Value::Object(Map::new()));
    }

    #[test]
    fn object_equality_ignores_key_order() {
        let a = object(&[("x", Value::Integer(1)), ("y", Value::Integer(2))]);
        let b = object(&[("y", Value::Integer(2)), ("x", Value::Float(1.0))]);
        assert_eq!(a, b);

        let c = object(&[("x", Value::Integer(1))]);
        assert_ne!(a, c);
    }

    #[test]
    fn array_equality_is_ordered() {
        let a = Value::from(vec![1, 2, 3]);
        let b = Value::from(vec![3, 2, 1]);
        assert_ne!(a, b);
        assert_eq!(a, Value::Array(vec![1.0.into(), 2.0.into(), 3.0.into()]));
    }

    #[test]
    fn nested_equality_is_deep() {
        let a = Value::from(json!({"user": {"tags": ["a", "b"], "age": 30}}));
        let b = Value::from(json!({"user": {"age": 30.0, "tags": ["a", "b"]}}));
        let c = Value::from(json!({"user": {"age": 30, "tags": ["a"]}}));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn value_accessors() {
        assert!(Value::Null.is_null());
        assert!(!Value::Bool(true).is_null());

        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(42).as_bool(), None);

        assert_eq!(Value::Integer(42).as_i64(), Some(42));
        assert_eq!(Value::Float(42.0).as_i64(), Some(42));
        assert_eq!(Value::Float(4.2).as_i64(), None);
        assert_eq!(Value::Integer(2).as_f64(), Some(2.0));

        assert_eq!(Value::Text("hello".into()).as_str(), Some("hello"));
        assert!(Value::from(vec![1]).as_array().is_some());
        assert!(Value::Object(Map::new()).as_object().is_some());
    }

    #[test]
    fn object_get() {
        let v = object(&[("name", "Alice".into()), ("age", 30.into())]);

        assert_eq!(v.get("name"), Some(&Value::Text("Alice".into())));
        assert_eq!(v.get("age"), Some(&Value::Integer(30)));
        assert_eq!(v.get("missing"), None);
        assert_eq!(Value::Integer(1).get("name"), None);
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i64), Value::Integer(42));
        assert_eq!(Value::from(42i32), Value::Integer(42));
        assert_eq!(Value::from(42u32), Value::Integer(42));
        assert!(matches!(Value::from(u64::MAX), Value::Float(_)));
        assert_eq!(Value::from("hello"), Value::Text("hello".into()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
        assert_eq!(Value::from(()), Value::Null);
    }

    #[test]
    fn serde_json_conversion_preserves_order() {
        let v = Value::from(json!({"b": 1, "a": 2.5, "c": [null, true]}));
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["b", "a", "c"]);

        let back = serde_json::Value::from(v);
        assert_eq!(back, json!({"b": 1, "a": 2.5, "c": [null, true]}));
    }

    #[test]
    fn non_finite_float_becomes_json_null() {
        assert_eq!(serde_json::Value::from(Value::Float(f64::NAN)), json!(null));
    }

    #[test]
    fn display_is_json() {
        let v = Value::from(json!({"name": "a", "n": [1, 2]}));
        assert_eq!(v.to_string(), r#"{"name":"a","n":[1,2]}"#);
    }
}
