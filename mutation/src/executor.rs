//! Mutation applier - coordinates mutation operations.
//!
//! The applier delegates to specialized operation modules in `ops/`:
//! - `ops/insert.rs` - validated record insertion
//! - `ops/delete.rs` - record deletion
//! - `ops/reassign.rs` - trainer ownership changes
//! - `ops/relink.rs` - evolution link updates

use dex_core::Document;
use dex_store::Dataset;

use crate::error::MutationResult;
use crate::ops;
use crate::result::MutationOutcome;
use crate::validation::SchemaSet;

/// Applies single-record mutations to a dataset.
pub struct MutationApplier<'d> {
    dataset: &'d mut Dataset,
    schemas: SchemaSet,
}

impl<'d> MutationApplier<'d> {
    /// Create an applier that only requires a string `_id` on inserts.
    pub fn new(dataset: &'d mut Dataset) -> Self {
        Self::with_schemas(dataset, SchemaSet::new())
    }

    pub fn with_schemas(dataset: &'d mut Dataset, schemas: SchemaSet) -> Self {
        Self { dataset, schemas }
    }

    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }

    /// Validate and insert a new record.
    pub fn insert_record(
        &mut self,
        collection: &str,
        document: Document,
    ) -> MutationResult<MutationOutcome> {
        ops::execute_insert(self.dataset, &self.schemas, collection, document)
    }

    /// Delete a record by key.
    pub fn delete_record(&mut self, collection: &str, key: &str) -> MutationResult<MutationOutcome> {
        ops::execute_delete(self.dataset, collection, key)
    }

    /// Move a Pokémon from one trainer's `owns` set to another's.
    pub fn reassign_ownership(
        &mut self,
        from: &str,
        to: &str,
        pokemon_id: &str,
    ) -> MutationResult<MutationOutcome> {
        ops::execute_reassign(self.dataset, &self.schemas, from, to, pokemon_id)
    }

    /// Make `to` the only trainer owning a Pokémon.
    pub fn transfer_pokemon(&mut self, to: &str, pokemon_id: &str) -> MutationResult<MutationOutcome> {
        ops::execute_transfer(self.dataset, &self.schemas, to, pokemon_id)
    }

    /// Set a Pokémon's `evolves_to`; `None` marks a final evolution.
    pub fn relink_evolution(
        &mut self,
        pokemon_id: &str,
        new_next: Option<&str>,
    ) -> MutationResult<MutationOutcome> {
        ops::execute_relink(self.dataset, &self.schemas, pokemon_id, new_next)
    }

    /// Skip an evolution stage, relinking its predecessors to its successor.
    pub fn bypass_evolution(&mut self, middle_id: &str) -> MutationResult<MutationOutcome> {
        ops::execute_bypass(self.dataset, &self.schemas, middle_id)
    }
}
