//! A named, ordered sequence of documents with a key index.

use dex_core::Document;

use crate::index::KeyIndex;

/// One collection of the dataset. Documents keep their insertion order.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    documents: Vec<Document>,
    keys: KeyIndex,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
            keys: KeyIndex::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.keys.get(key).and_then(|pos| self.documents.get(pos))
    }

    /// Position of the document stored under `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.keys.get(key)
    }

    /// Append a document under `key`. The caller has checked uniqueness.
    pub(crate) fn push(&mut self, key: &str, document: Document) {
        self.keys.insert(key, self.documents.len());
        self.documents.push(document);
    }

    /// Replace the document stored under `key`, keeping its position.
    pub(crate) fn replace(&mut self, key: &str, document: Document) -> Option<&Document> {
        let pos = self.keys.get(key)?;
        let slot = self.documents.get_mut(pos)?;
        *slot = document;
        Some(slot)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Document> {
        let pos = self.keys.remove(key)?;
        Some(self.documents.remove(pos))
    }

    pub(crate) fn clear(&mut self) {
        self.documents.clear();
        self.keys.clear();
    }
}
