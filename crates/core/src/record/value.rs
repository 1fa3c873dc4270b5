use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    /// Text coercion used by the derivation rules. `Null` becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            ScalarValue::Null => String::new(),
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Integer(i) => i.to_string(),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::Text(s) => s.clone(),
        }
    }

    /// Canonical text used to compare primary keys across sources.
    ///
    /// Integral floats collapse to their integer form so a spreadsheet `1.0`
    /// matches a stored `1`. `Null` has no key.
    pub fn key_text(&self) -> Option<String> {
        match self {
            ScalarValue::Null => None,
            ScalarValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                Some((*f as i64).to_string())
            }
            other => Some(other.to_text()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Null => Value::Null,
            ScalarValue::Bool(b) => Value::Bool(*b),
            ScalarValue::Integer(i) => Value::from(*i),
            ScalarValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ScalarValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "null"),
            other => write!(f, "{}", other.to_text()),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::Text(s)
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        ScalarValue::Integer(i)
    }
}

impl From<i32> for ScalarValue {
    fn from(i: i32) -> Self {
        ScalarValue::Integer(i64::from(i))
    }
}

impl From<f64> for ScalarValue {
    fn from(f: f64) -> Self {
        if f.is_nan() {
            ScalarValue::Null
        } else {
            ScalarValue::Float(f)
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Bool(b)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ScalarValue::Null)
    }
}

impl From<&Value> for ScalarValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ScalarValue::Null,
            Value::Bool(b) => ScalarValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ScalarValue::Integer(i),
                None => n.as_f64().map(ScalarValue::from).unwrap_or(ScalarValue::Null),
            },
            Value::String(s) => ScalarValue::Text(s.clone()),
            // Nested structures are kept as their JSON text
            other => ScalarValue::Text(other.to_string()),
        }
    }
}
