//! Mutation result types.

use dex_core::Document;

/// Outcome of a mutation operation.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// Inserted a document.
    Inserted(InsertedDocument),
    /// Deleted a document.
    Deleted(DeletedDocument),
    /// Updated documents.
    Updated(UpdatedDocuments),
    /// Nothing needed to change.
    Unchanged,
}

impl MutationOutcome {
    /// Key of the inserted document if this is an Inserted result.
    pub fn inserted_key(&self) -> Option<&str> {
        match self {
            MutationOutcome::Inserted(i) => Some(&i.key),
            _ => None,
        }
    }

    /// Keys of updated documents, empty for other outcomes.
    pub fn updated_keys(&self) -> &[String] {
        match self {
            MutationOutcome::Updated(u) => &u.keys,
            _ => &[],
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, MutationOutcome::Unchanged)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertedDocument {
    pub collection: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeletedDocument {
    pub collection: String,
    /// The removed document.
    pub document: Document,
}

/// Documents of one collection that were rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatedDocuments {
    pub collection: String,
    /// Keys in the order they were written.
    pub keys: Vec<String>,
}

impl UpdatedDocuments {
    /// `Updated` for a non-empty key list, `Unchanged` otherwise.
    pub fn into_outcome(self) -> MutationOutcome {
        if self.keys.is_empty() {
            MutationOutcome::Unchanged
        } else {
            MutationOutcome::Updated(self)
        }
    }
}
