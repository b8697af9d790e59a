//! The dataset: named collections of documents.
//!
//! Single-threaded, in-memory, no persistence. Every document entering the
//! dataset passes through its [`Normalizer`].

use std::collections::HashMap;

use dex_core::{Document, ALL_COLLECTIONS};
use tracing::debug;

use crate::collection::Collection;
use crate::normalize::Normalizer;
use crate::{StoreError, StoreResult};

/// In-memory table set keyed by collection name.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    collections: HashMap<String, Collection>,
    normalizer: Normalizer,
}

impl Dataset {
    /// Create an empty dataset with no collections and no normalization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dataset that normalizes documents with `normalizer`.
    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        Self {
            collections: HashMap::new(),
            normalizer,
        }
    }

    /// A dataset with the five Pokémon collections registered and the
    /// Pokémon normalization rules installed.
    pub fn pokemon() -> Self {
        let mut dataset = Self::with_normalizer(Normalizer::pokemon_dataset());
        for name in ALL_COLLECTIONS {
            dataset.register(name);
        }
        dataset
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Register a collection. Registering an existing name is a no-op.
    pub fn register(&mut self, name: &str) {
        self.collections
            .entry(name.to_string())
            .or_insert_with(|| Collection::new(name));
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Registered collection names, sorted.
    pub fn collection_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.collections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn collection(&self, name: &str) -> StoreResult<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| StoreError::unknown_collection(name))
    }

    fn collection_mut(&mut self, name: &str) -> StoreResult<&mut Collection> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| StoreError::unknown_collection(name))
    }

    /// All documents of a collection, in insertion order.
    pub fn get_collection(&self, name: &str) -> StoreResult<&[Document]> {
        Ok(self.collection(name)?.documents())
    }

    /// Find a document by `_id`.
    pub fn find_by_key(&self, collection: &str, key: &str) -> StoreResult<Option<&Document>> {
        Ok(self.collection(collection)?.get(key))
    }

    /// Insert a new document. Fails with `DuplicateKey` if the `_id` exists.
    pub fn insert(&mut self, collection: &str, mut document: Document) -> StoreResult<()> {
        self.normalizer.normalize(collection, &mut document)?;
        let key = document
            .id()
            .ok_or_else(|| StoreError::missing_key(collection))?
            .to_string();

        let target = self.collection_mut(collection)?;
        if target.contains_key(&key) {
            return Err(StoreError::duplicate_key(collection, key));
        }
        target.push(&key, document);
        debug!(collection, key = %key, "inserted document");
        Ok(())
    }

    /// Delete a document by `_id`. Returns `None` if it was not there.
    pub fn delete_by_key(&mut self, collection: &str, key: &str) -> StoreResult<Option<Document>> {
        let removed = self.collection_mut(collection)?.remove(key);
        debug!(collection, key, found = removed.is_some(), "delete by key");
        Ok(removed)
    }

    /// Apply `mutation` to the document stored under `key` and return the
    /// updated document.
    ///
    /// The mutation runs against a copy; the stored document is replaced only
    /// after the copy has been normalized, so a failed update changes nothing.
    /// The `_id` cannot be changed.
    pub fn update_by_key<F>(&mut self, collection: &str, key: &str, mutation: F) -> StoreResult<&Document>
    where
        F: FnOnce(&mut Document),
    {
        let mut updated = self
            .collection(collection)?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(collection, key))?;

        mutation(&mut updated);
        if updated.id() != Some(key) {
            return Err(StoreError::immutable_key(collection, key));
        }
        self.normalizer.normalize(collection, &mut updated)?;

        debug!(collection, key, "updated document");
        self.collection_mut(collection)?
            .replace(key, updated)
            .ok_or_else(|| StoreError::not_found(collection, key))
    }

    /// Remove every document of a collection, keeping it registered.
    pub fn clear_collection(&mut self, name: &str) -> StoreResult<()> {
        self.collection_mut(name)?.clear();
        Ok(())
    }
}
