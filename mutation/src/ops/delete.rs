//! Delete a record by key.

use dex_store::{Dataset, StoreError};
use tracing::info;

use crate::error::MutationResult;
use crate::result::{DeletedDocument, MutationOutcome};

/// Remove the document stored under `key`. Fails with `NotFound` if absent.
pub fn execute_delete(
    dataset: &mut Dataset,
    collection: &str,
    key: &str,
) -> MutationResult<MutationOutcome> {
    let document = dataset
        .delete_by_key(collection, key)?
        .ok_or_else(|| StoreError::not_found(collection, key))?;

    info!(collection, key, "deleted record");
    Ok(MutationOutcome::Deleted(DeletedDocument {
        collection: collection.to_string(),
        document,
    }))
}
