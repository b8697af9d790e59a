//! Value types for Dex documents.
//!
//! Values are the atomic data stored in document fields.
//! Dex supports scalar types (Null, Bool, Int, Float, String)
//! and composite types (Array, Document).

use crate::{CoreError, CoreResult, Document};
use std::cmp::Ordering;
use std::fmt;

/// A value that can be stored in a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Nested document.
    Document(Document),
}

impl Value {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is an integer or float value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this is a nested document.
    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    /// Get as boolean if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float if this is a Float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the numeric value of an Int or Float. Strings are never coerced.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string reference if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as slice if this is an Array value.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as document if this is a Document value.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Typed string accessor: fails with `TypeMismatch` instead of coercing.
    pub fn expect_str(&self, field: &str) -> CoreResult<&str> {
        self.as_str()
            .ok_or_else(|| CoreError::type_mismatch(field, "String", self.type_name()))
    }

    /// Typed integer accessor.
    pub fn expect_int(&self, field: &str) -> CoreResult<i64> {
        self.as_int()
            .ok_or_else(|| CoreError::type_mismatch(field, "Int", self.type_name()))
    }

    /// Typed numeric accessor (Int or Float).
    pub fn expect_number(&self, field: &str) -> CoreResult<f64> {
        self.as_number()
            .ok_or_else(|| CoreError::type_mismatch(field, "Number", self.type_name()))
    }

    /// Typed array accessor.
    pub fn expect_array(&self, field: &str) -> CoreResult<&[Value]> {
        self.as_array()
            .ok_or_else(|| CoreError::type_mismatch(field, "Array", self.type_name()))
    }

    /// Typed document accessor.
    pub fn expect_document(&self, field: &str) -> CoreResult<&Document> {
        self.as_document()
            .ok_or_else(|| CoreError::type_mismatch(field, "Document", self.type_name()))
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
            Value::Document(_) => "Document",
        }
    }

    /// Rank of the value's type in the cross-type sort order.
    /// Numbers sort before everything else; Null is handled by the caller.
    fn type_rank(&self) -> u8 {
        match self {
            Value::Int(_) | Value::Float(_) => 0,
            Value::String(_) => 1,
            Value::Document(_) => 2,
            Value::Array(_) => 3,
            Value::Bool(_) => 4,
            Value::Null => 5,
        }
    }

    /// Compare values for sorting.
    ///
    /// Int and Float compare numerically with each other. Values of different
    /// types compare by type rank, so any non-numeric value is greater than any
    /// number. Null is greater than everything.
    pub fn cmp_sortable(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                let a = self.as_number().unwrap_or_default();
                let b = other.as_number().unwrap_or_default();
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.cmp_sortable(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Value::Document(a), Value::Document(b)) => a.cmp_sortable(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    /// Equality used by filters and joins: numbers compare across Int/Float.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.cmp_sortable(other) == Ordering::Equal
            }
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.loosely_equals(y))
            }
            (Value::Document(a), Value::Document(b)) => a.loosely_equals(b),
            _ => self == other,
        }
    }

    /// Canonical key for hashing (grouping, visited sets).
    ///
    /// Integral floats share the key of the equal Int so `3` and `3.0` land in
    /// the same group.
    pub fn canonical_key(&self) -> String {
        match self {
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("n:{}", *f as i64),
            Value::Int(i) => format!("n:{}", i),
            Value::Float(f) => format!("n:{}", f),
            Value::Null => "null".to_string(),
            Value::Bool(b) => format!("b:{}", b),
            Value::String(s) => format!("s:{:?}", s),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(Value::canonical_key).collect();
                format!("[{}]", parts.join(","))
            }
            Value::Document(doc) => {
                let parts: Vec<String> = doc
                    .iter()
                    .map(|(k, v)| format!("{:?}:{}", k, v.canonical_key()))
                    .collect();
                format!("{{{}}}", parts.join(","))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Document(doc) => write!(f, "{}", doc),
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Document(doc)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}
