//! Insert and validate a new record.

use dex_core::{Document, ID_FIELD};
use dex_store::Dataset;
use tracing::info;

use crate::error::{MutationError, MutationResult};
use crate::result::{InsertedDocument, MutationOutcome};
use crate::validation::SchemaSet;

/// Validate `document` against the collection's schema and insert it.
///
/// The document is normalized first so schema checks see real numbers.
pub fn execute_insert(
    dataset: &mut Dataset,
    schemas: &SchemaSet,
    collection: &str,
    mut document: Document,
) -> MutationResult<MutationOutcome> {
    dataset.collection(collection)?;
    dataset.normalizer().normalize(collection, &mut document)?;
    schemas.validate(collection, &document)?;

    let Some(key) = document.id().map(String::from) else {
        return Err(MutationError::validation(collection, vec![ID_FIELD.to_string()]));
    };

    dataset.insert(collection, document)?;
    info!(collection, key = %key, "inserted record");

    Ok(MutationOutcome::Inserted(InsertedDocument {
        collection: collection.to_string(),
        key,
    }))
}
