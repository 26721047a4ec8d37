use serde::{Deserialize, Serialize};

/// An argument bound to one positional parameter of a compiled statement.
///
/// The compiler treats values as opaque: it only ever moves them into the
/// output list in marker order. The execution layer maps each variant onto a
/// driver parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    BigInt(i64),
    Double(f64),
    Bool(bool),
    Json(serde_json::Value),
    Null,
}

impl Value {
    /// JSON rendition used when the value lands inside a document or a
    /// containment object rather than binding directly to a column.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::BigInt(i) => serde_json::Value::from(*i),
            Value::Double(f) => serde_json::Value::from(*f),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Json(v) => v.clone(),
            Value::Null => serde_json::Value::Null,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::Text(v.to_owned()) }
}

impl From<String> for Value {
    fn from(v: String) -> Self { Value::Text(v) }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::BigInt(v) }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self { Value::BigInt(v as i64) }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Double(v) }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Bool(v) }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self { Value::Json(v) }
}
