//! Dynamic field value type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dynamic value stored in a document field.
///
/// This mirrors the value model of a schemaless document store: scalars,
/// arrays and nested maps. Maps use `BTreeMap` so iteration order (and
/// therefore equality and serialization) is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Double-precision float.
    Double(f64),
    /// Text string (UTF-8).
    Text(String),
    /// Array of values.
    Array(Vec<FieldValue>),
    /// Nested map.
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Returns the type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Integer(_) => "integer",
            FieldValue::Double(_) => "double",
            FieldValue::Text(_) => "text",
            FieldValue::Array(_) => "array",
            FieldValue::Map(_) => "map",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Get this value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a number.
    ///
    /// Integers are widened to `f64`; stores that keep whole numbers as
    /// integers still decode into float-typed fields.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Double(d) => Some(*d),
            FieldValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(d: f64) -> Self {
        FieldValue::Double(d)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_widening() {
        assert_eq!(FieldValue::Integer(12).as_number(), Some(12.0));
        assert_eq!(FieldValue::Double(9.5).as_number(), Some(9.5));
        assert_eq!(FieldValue::Text("9.5".into()).as_number(), None);
    }

    #[test]
    fn json_shape_is_untagged() {
        let value = FieldValue::Map(BTreeMap::from([
            ("name".to_string(), FieldValue::from("Shoe")),
            ("price".to_string(), FieldValue::from(49.5)),
        ]));
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"name":"Shoe","price":49.5}"#);

        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn json_integers_stay_integers() {
        let value: FieldValue = serde_json::from_str("42").unwrap();
        assert_eq!(value, FieldValue::Integer(42));
    }
}
