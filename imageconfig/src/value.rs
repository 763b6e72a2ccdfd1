//! Dynamically typed arguments handed over by a template context

use std::collections::BTreeMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Coerce a scalar value to a string.
    ///
    /// Nil becomes the empty string. Lists and maps have no string form.
    pub fn to_string_coerced(&self) -> Result<String> {
        match self {
            Value::Nil => Ok(String::new()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Int(i) => Ok(i.to_string()),
            Value::Uint(u) => Ok(u.to_string()),
            Value::Float(f) => Ok(format_float(*f)),
            Value::String(s) => Ok(s.clone()),
            Value::Bytes(bytes) => String::from_utf8(bytes.clone()).map_err(|e| {
                Error::invalid_argument(format!("unable to cast bytes to string: {e}"))
            }),
            Value::List(_) | Value::Map(_) => Err(Error::invalid_argument(format!(
                "unable to cast {self:?} of type {} to string",
                self.type_name()
            ))),
        }
    }
}

// Shortest round-trip digits, never exponent notation.
fn format_float(f: f64) -> String {
    if f.is_infinite() {
        let s = if f.is_sign_positive() { "+Inf" } else { "-Inf" };
        s.to_string()
    } else {
        f.to_string()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint(u.into())
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_coerce() {
        assert_eq!(Value::from(123).to_string_coerced().unwrap(), "123");
        assert_eq!(Value::from(7u64).to_string_coerced().unwrap(), "7");
        assert_eq!(Value::from(true).to_string_coerced().unwrap(), "true");
        assert_eq!(Value::from(1.0).to_string_coerced().unwrap(), "1");
        assert_eq!(Value::from(2.5).to_string_coerced().unwrap(), "2.5");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_string_coerced().unwrap(), "-Inf");
        assert_eq!(Value::from("a.png").to_string_coerced().unwrap(), "a.png");
        assert_eq!(
            Value::from(b"b.gif".to_vec()).to_string_coerced().unwrap(),
            "b.gif"
        );
    }

    #[test]
    fn nil_is_empty() {
        assert_eq!(Value::Nil.to_string_coerced().unwrap(), "");
    }

    #[test]
    fn containers_do_not_coerce() {
        let list = Value::from(vec![Value::from("a.png")]);
        assert!(list.to_string_coerced().unwrap_err().is_invalid_argument());

        let map = Value::Map(BTreeMap::new());
        assert!(map.to_string_coerced().unwrap_err().is_invalid_argument());

        let bad_utf8 = Value::from(vec![0xff, 0xfe]);
        assert!(bad_utf8.to_string_coerced().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn from_json() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": [1, -2, 1.5, null, "x", false]}"#).unwrap();
        let Value::Map(map) = Value::from(json) else {
            panic!("expected map");
        };
        assert_eq!(
            map["a"],
            Value::List(vec![
                Value::Int(1),
                Value::Int(-2),
                Value::Float(1.5),
                Value::Nil,
                Value::String("x".into()),
                Value::Bool(false),
            ])
        );
    }
}
