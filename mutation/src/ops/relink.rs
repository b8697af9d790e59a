//! Evolution link updates.
//!
//! Targets are not checked for existence: a Pokémon may point at an id that
//! is not (yet) in the dataset. The id `"null"` is the dataset's spelling of
//! "no successor", so relinking to it is the same as relinking to `None`.

use dex_core::{Value, EVOLVES_TO_FIELD, POKEMON};
use dex_store::Dataset;
use tracing::info;

use super::WriteSet;
use crate::error::{MutationError, MutationResult};
use crate::result::MutationOutcome;
use crate::validation::SchemaSet;

/// Point `pokemon_id` at `new_next`, or mark it final with `None`.
///
/// The stored value is normalized, so `Some("null")` is stored as `Null`.
pub fn execute_relink(
    dataset: &mut Dataset,
    schemas: &SchemaSet,
    pokemon_id: &str,
    new_next: Option<&str>,
) -> MutationResult<MutationOutcome> {
    let mut writes = WriteSet::new(POKEMON);
    let mut pokemon = writes.current(dataset, pokemon_id)?;
    pokemon.insert(EVOLVES_TO_FIELD, Value::from(new_next));
    writes.stage(pokemon_id, pokemon);

    let updated = writes.commit(dataset, schemas)?;
    info!(pokemon = pokemon_id, evolves_to = ?new_next, "relinked evolution");
    Ok(updated.into_outcome())
}

/// Remove `middle_id` from every evolution line passing through it: each
/// Pokémon evolving into it evolves into its successor instead.
pub fn execute_bypass(
    dataset: &mut Dataset,
    schemas: &SchemaSet,
    middle_id: &str,
) -> MutationResult<MutationOutcome> {
    let mut writes = WriteSet::new(POKEMON);
    let middle = writes.current(dataset, middle_id)?;

    let successor = match middle.get(EVOLVES_TO_FIELD) {
        None | Some(Value::Null) => Value::Null,
        Some(Value::String(next)) => Value::from(next.as_str()),
        Some(other) => {
            return Err(MutationError::invalid_field_type(
                EVOLVES_TO_FIELD,
                "String",
                other.type_name(),
            ));
        }
    };

    let predecessors: Vec<String> = dataset
        .get_collection(POKEMON)?
        .iter()
        .filter(|p| p.get(EVOLVES_TO_FIELD).and_then(Value::as_str) == Some(middle_id))
        .filter_map(|p| p.id().map(String::from))
        .filter(|key| key != middle_id)
        .collect();

    for key in &predecessors {
        let mut pokemon = writes.current(dataset, key)?;
        pokemon.insert(EVOLVES_TO_FIELD, successor.clone());
        writes.stage(key, pokemon);
    }

    let updated = writes.commit(dataset, schemas)?;
    info!(middle = middle_id, relinked = updated.keys.len(), "bypassed evolution stage");
    Ok(updated.into_outcome())
}
