//! Mutation operation implementations.
//!
//! Each operation (insert, delete, reassign, relink) is implemented
//! in its own module. Updates go through a [`WriteSet`] so that every
//! document is planned and validated before the first write.

mod delete;
mod insert;
mod reassign;
mod relink;

pub use delete::execute_delete;
pub use insert::execute_insert;
pub use reassign::{execute_reassign, execute_transfer};
pub use relink::{execute_bypass, execute_relink};

use dex_core::Document;
use dex_store::{Dataset, StoreError};

use crate::error::MutationResult;
use crate::result::UpdatedDocuments;
use crate::validation::SchemaSet;

/// Documents of one collection staged for rewrite.
pub(crate) struct WriteSet {
    collection: String,
    staged: Vec<(String, Document)>,
}

impl WriteSet {
    pub(crate) fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            staged: Vec::new(),
        }
    }

    /// The planned state of `key`: the staged copy if there is one, the stored
    /// document otherwise.
    pub(crate) fn current(&self, dataset: &Dataset, key: &str) -> MutationResult<Document> {
        if let Some((_, doc)) = self.staged.iter().find(|(k, _)| k == key) {
            return Ok(doc.clone());
        }
        dataset
            .find_by_key(&self.collection, key)?
            .cloned()
            .ok_or_else(|| StoreError::not_found(&self.collection, key).into())
    }

    pub(crate) fn stage(&mut self, key: &str, doc: Document) {
        match self.staged.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = doc,
            None => self.staged.push((key.to_string(), doc)),
        }
    }

    /// Normalize and validate every staged document, then write the ones that
    /// differ from what is stored.
    pub(crate) fn commit(
        self,
        dataset: &mut Dataset,
        schemas: &SchemaSet,
    ) -> MutationResult<UpdatedDocuments> {
        let mut writes = Vec::with_capacity(self.staged.len());
        for (key, mut doc) in self.staged {
            dataset.normalizer().normalize(&self.collection, &mut doc)?;
            schemas.validate(&self.collection, &doc)?;
            if dataset.find_by_key(&self.collection, &key)? != Some(&doc) {
                writes.push((key, doc));
            }
        }

        let mut keys = Vec::with_capacity(writes.len());
        for (key, doc) in writes {
            dataset.update_by_key(&self.collection, &key, |stored| *stored = doc)?;
            keys.push(key);
        }

        Ok(UpdatedDocuments {
            collection: self.collection,
            keys,
        })
    }
}
