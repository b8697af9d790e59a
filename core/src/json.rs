//! Conversion between Dex values and `serde_json` values.
//!
//! Fixtures arrive as JSON and results are often inspected as JSON.
//! `serde_json` is built with `preserve_order`, so object field order survives
//! the round trip.

use crate::{Document, Value};
use serde_json::{Map, Number};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Document(Document::from(map)),
        }
    }
}

impl From<Map<String, serde_json::Value>> for Document {
    fn from(map: Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

/// Convert a value to JSON. Non-finite floats become `null`.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Document(doc) => serde_json::Value::Object(document_to_json(doc)),
    }
}

/// Convert a document to a JSON object.
pub fn document_to_json(doc: &Document) -> Map<String, serde_json::Value> {
    doc.iter()
        .map(|(k, v)| (k.to_string(), to_json(v)))
        .collect()
}
