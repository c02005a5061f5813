use super::{HostArray, Scalar};
use std::collections::BTreeMap;

/// A loosely typed field value received from the host environment.
///
/// The bridge accepts a small closed set of input shapes per field and
/// rejects everything else, so anything the host can send that is not an
/// integer, a float, a list or an array is carried as `Other` with the
/// host's name for its type.  Host booleans arrive as `Int`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    List(Vec<Value>),
    Array(HostArray),
    Other(String),
}

impl Value {
    /// host-side name of the value's type, used in error messages
    pub fn type_name(&self) -> &str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::List(_) => "list",
            Value::Array(_) => "array",
            Value::Other(name) => name,
        }
    }

    /// Interpret a list of numbers as a one-dimensional array.
    ///
    /// All-integer lists become `int64` arrays, lists containing at least
    /// one float become `float64` arrays.  Empty, nested or non-numeric
    /// lists are not arrays.
    pub fn list_as_array(items: &[Value]) -> Option<HostArray> {
        if items.is_empty() {
            return None;
        }
        let mut any_float = false;
        for item in items {
            match item {
                Value::Int(_) => {}
                Value::Float(_) => any_float = true,
                _ => return None,
            }
        }
        if any_float {
            let v = items
                .iter()
                .filter_map(|item| match item {
                    Value::Int(i) => Some(*i as f64),
                    Value::Float(f) => Some(*f),
                    _ => None,
                })
                .collect::<Vec<f64>>();
            Some(HostArray::from_vec(v))
        } else {
            let v = items
                .iter()
                .filter_map(|item| match item {
                    Value::Int(i) => Some(*i),
                    _ => None,
                })
                .collect::<Vec<i64>>();
            Some(HostArray::from_vec(v))
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<HostArray> for Value {
    fn from(v: HostArray) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Bool(b) => Value::Int(b as i64),
            Scalar::Int(i) => Value::Int(i),
            Scalar::UInt(u) => i64::try_from(u)
                .map(Value::Int)
                .unwrap_or(Value::Float(u as f64)),
            Scalar::Float(f) => Value::Float(f),
        }
    }
}

/// A string keyed mapping of host values, e.g. the `cone`, `opts`
/// and `warm` arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostDict(BTreeMap<String, Value>);

impl HostDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// builder style insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for HostDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde_json::Value as JsonValue;

    impl From<&JsonValue> for Value {
        fn from(v: &JsonValue) -> Self {
            match v {
                JsonValue::Number(num) => {
                    if let Some(i) = num.as_i64() {
                        Value::Int(i)
                    } else {
                        Value::Float(num.as_f64().unwrap_or(f64::NAN))
                    }
                }
                JsonValue::Bool(b) => Value::Int(*b as i64),
                JsonValue::Array(items) => Value::List(items.iter().map(Value::from).collect()),
                JsonValue::Null => Value::Other("null".to_string()),
                JsonValue::String(_) => Value::Other("str".to_string()),
                JsonValue::Object(_) => Value::Other("dict".to_string()),
            }
        }
    }

    impl From<&Value> for JsonValue {
        fn from(v: &Value) -> Self {
            match v {
                Value::Int(i) => JsonValue::from(*i),
                // non-finite floats have no json representation and become null
                Value::Float(f) => JsonValue::from(*f),
                Value::List(items) => JsonValue::Array(items.iter().map(JsonValue::from).collect()),
                Value::Array(arr) => {
                    JsonValue::Array(arr.scalars().map(|s| JsonValue::from(&Value::from(s))).collect())
                }
                Value::Other(_) => JsonValue::Null,
            }
        }
    }

    impl From<&serde_json::Map<String, JsonValue>> for HostDict {
        fn from(map: &serde_json::Map<String, JsonValue>) -> Self {
            map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect()
        }
    }

    impl From<&HostDict> for serde_json::Map<String, JsonValue> {
        fn from(dict: &HostDict) -> Self {
            dict.iter()
                .map(|(k, v)| (k.to_string(), JsonValue::from(v)))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DType;

    #[test]
    fn test_list_inference() {
        let ints = vec![Value::Int(1), Value::Int(2)];
        assert_eq!(Value::list_as_array(&ints).unwrap().dtype(), DType::Int64);

        let mixed = vec![Value::Int(1), Value::Float(2.5)];
        let arr = Value::list_as_array(&mixed).unwrap();
        assert_eq!(arr.dtype(), DType::Float64);
        assert_eq!(arr.len(), 2);

        let nested = vec![Value::List(vec![Value::Int(1)])];
        assert!(Value::list_as_array(&nested).is_none());
        assert!(Value::list_as_array(&[]).is_none());
        assert!(Value::list_as_array(&[Value::Other("str".into())]).is_none());
    }

    #[test]
    fn test_dict_building() {
        let d = HostDict::new()
            .with("l", 3)
            .with("q", vec![3, 4])
            .with("EPS", 1e-4)
            .with("flag", true);
        assert_eq!(d.len(), 4);
        assert_eq!(d.get("l"), Some(&Value::Int(3)));
        assert_eq!(d.get("flag"), Some(&Value::Int(1)));
        assert_eq!(
            d.get("q"),
            Some(&Value::List(vec![Value::Int(3), Value::Int(4)]))
        );
        assert!(d.get("s").is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"l": 2, "q": [3, 4.5], "ep": null, "s": "x"}"#).unwrap();
        let d = HostDict::from(json.as_object().unwrap());
        assert_eq!(d.get("l"), Some(&Value::Int(2)));
        assert_eq!(
            d.get("q"),
            Some(&Value::List(vec![Value::Int(3), Value::Float(4.5)]))
        );
        assert_eq!(d.get("ep").unwrap().type_name(), "null");
        assert_eq!(d.get("s").unwrap().type_name(), "str");
    }
}
