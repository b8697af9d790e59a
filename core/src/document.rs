//! Schema-less documents.
//!
//! A document is an ordered list of named fields. Field order is preserved
//! as inserted so projected output reads the way the pipeline wrote it.
//! Dotted paths (`participants.winner.pokemon_id`) address nested documents.

use crate::{Value, ID_FIELD};
use std::cmp::Ordering;
use std::fmt;

/// An ordered mapping from field name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Vec<(String, Value)>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over top-level fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Top-level field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Check for a top-level field.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Get a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Get a mutable reference to a top-level field.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert or replace a top-level field. A replaced field keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    /// Remove a top-level field.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(pos).1)
    }

    /// The `_id` of this document, if it is a string.
    pub fn id(&self) -> Option<&str> {
        self.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Resolve a dotted path.
    ///
    /// Returns `None` when the path is absent. When an intermediate value is an
    /// array, the remaining path is resolved against each element and the hits
    /// are collected into an array (possibly empty).
    pub fn get_path(&self, path: &str) -> Option<Value> {
        match path.split_once('.') {
            None => self.get(path).cloned(),
            Some((head, rest)) => resolve_in(self.get(head)?, rest),
        }
    }

    /// The value stored at a dotted path, walking documents only.
    ///
    /// Unlike [`get_path`](Self::get_path) this never fans out: an array or
    /// scalar in an intermediate position yields `None`.
    pub fn get_stored(&self, path: &str) -> Option<&Value> {
        match path.split_once('.') {
            None => self.get(path),
            Some((head, rest)) => match self.get(head)? {
                Value::Document(child) => child.get_stored(rest),
                _ => None,
            },
        }
    }

    /// Resolve a dotted path, treating absence as `Null`.
    pub fn resolve(&self, path: &str) -> Value {
        self.get_path(path).unwrap_or(Value::Null)
    }

    /// Set a dotted path, creating intermediate documents as needed.
    /// A non-document intermediate value is replaced by a document.
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) {
        let value = value.into();
        match path.split_once('.') {
            None => {
                self.insert(path, value);
            }
            Some((head, rest)) => {
                if !matches!(self.get(head), Some(Value::Document(_))) {
                    self.insert(head, Document::new());
                }
                if let Some(Value::Document(child)) = self.get_mut(head) {
                    child.set_path(rest, value);
                }
            }
        }
    }

    /// Remove a dotted path. Returns the removed value.
    pub fn remove_path(&mut self, path: &str) -> Option<Value> {
        match path.split_once('.') {
            None => self.remove(path),
            Some((head, rest)) => match self.get_mut(head) {
                Some(Value::Document(child)) => child.remove_path(rest),
                _ => None,
            },
        }
    }

    /// Field-wise ordering used when documents are sort keys.
    pub fn cmp_sortable(&self, other: &Document) -> Ordering {
        for ((ka, va), (kb, vb)) in self.fields.iter().zip(other.fields.iter()) {
            let ord = ka.cmp(kb).then_with(|| va.cmp_sortable(vb));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.len().cmp(&other.len())
    }

    /// Order-sensitive equality with numeric Int/Float equivalence.
    pub fn loosely_equals(&self, other: &Document) -> bool {
        self.len() == other.len()
            && self
                .fields
                .iter()
                .zip(other.fields.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va.loosely_equals(vb))
    }
}

fn resolve_in(value: &Value, path: &str) -> Option<Value> {
    match value {
        Value::Document(doc) => doc.get_path(path),
        Value::Array(items) => {
            let hits: Vec<Value> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Document(doc) => doc.get_path(path),
                    _ => None,
                })
                .collect();
            Some(Value::Array(hits))
        }
        _ => None,
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, "}}")
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

/// Helper macro to create documents.
#[macro_export]
macro_rules! doc {
    () => {
        $crate::Document::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut doc = $crate::Document::new();
            $(
                doc.insert($key, $crate::Value::from($value));
            )+
            doc
        }
    };
}
