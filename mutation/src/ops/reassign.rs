//! Trainer ownership changes.
//!
//! `owns` is treated as a set of Pokémon ids: removal is a no-op when the id
//! is absent and insertion never duplicates. A missing or null `owns` is an
//! empty set. The Pokémon itself must exist.

use dex_core::{Document, Value, OWNS_FIELD, POKEMON, TRAINER};
use dex_store::{Dataset, StoreError};
use tracing::info;

use super::WriteSet;
use crate::error::MutationResult;
use crate::result::MutationOutcome;
use crate::validation::SchemaSet;

/// Move `pokemon_id` from one trainer's `owns` to another's.
pub fn execute_reassign(
    dataset: &mut Dataset,
    schemas: &SchemaSet,
    from: &str,
    to: &str,
    pokemon_id: &str,
) -> MutationResult<MutationOutcome> {
    require_pokemon(dataset, pokemon_id)?;
    let mut writes = WriteSet::new(TRAINER);

    let mut source = writes.current(dataset, from)?;
    writes.current(dataset, to)?;

    if remove_owned(&mut source, pokemon_id)? {
        writes.stage(from, source);
    }

    // Re-read so a self-transfer sees the removal above.
    let mut target = writes.current(dataset, to)?;
    if add_owned(&mut target, pokemon_id)? {
        writes.stage(to, target);
    }

    let updated = writes.commit(dataset, schemas)?;
    info!(from, to, pokemon = pokemon_id, updated = updated.keys.len(), "reassigned ownership");
    Ok(updated.into_outcome())
}

/// Give `pokemon_id` to `to`, taking it away from every other trainer.
pub fn execute_transfer(
    dataset: &mut Dataset,
    schemas: &SchemaSet,
    to: &str,
    pokemon_id: &str,
) -> MutationResult<MutationOutcome> {
    require_pokemon(dataset, pokemon_id)?;
    let mut writes = WriteSet::new(TRAINER);
    let mut target = writes.current(dataset, to)?;

    let owners: Vec<String> = dataset
        .get_collection(TRAINER)?
        .iter()
        .filter(|trainer| owns(trainer, pokemon_id))
        .filter_map(|trainer| trainer.id().map(String::from))
        .filter(|key| key != to)
        .collect();

    for owner in &owners {
        let mut doc = writes.current(dataset, owner)?;
        if remove_owned(&mut doc, pokemon_id)? {
            writes.stage(owner, doc);
        }
    }

    if add_owned(&mut target, pokemon_id)? {
        writes.stage(to, target);
    }

    let updated = writes.commit(dataset, schemas)?;
    info!(to, pokemon = pokemon_id, previous_owners = owners.len(), "transferred pokemon");
    Ok(updated.into_outcome())
}

fn require_pokemon(dataset: &Dataset, pokemon_id: &str) -> MutationResult<()> {
    match dataset.find_by_key(POKEMON, pokemon_id)? {
        Some(_) => Ok(()),
        None => Err(StoreError::not_found(POKEMON, pokemon_id).into()),
    }
}

fn owns(trainer: &Document, pokemon_id: &str) -> bool {
    matches!(
        trainer.get(OWNS_FIELD),
        Some(Value::Array(items)) if items.iter().any(|v| v.as_str() == Some(pokemon_id))
    )
}

fn owned(trainer: &Document) -> MutationResult<Vec<Value>> {
    match trainer.get(OWNS_FIELD) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Ok(value.expect_array(OWNS_FIELD)?.to_vec()),
    }
}

/// Pull `pokemon_id` from `owns`. Returns whether anything was removed.
fn remove_owned(trainer: &mut Document, pokemon_id: &str) -> MutationResult<bool> {
    let items = owned(trainer)?;
    let before = items.len();
    let kept: Vec<Value> = items
        .into_iter()
        .filter(|v| v.as_str() != Some(pokemon_id))
        .collect();

    if kept.len() == before {
        return Ok(false);
    }
    trainer.insert(OWNS_FIELD, Value::Array(kept));
    Ok(true)
}

/// Add `pokemon_id` to `owns` unless present. Returns whether it was added.
fn add_owned(trainer: &mut Document, pokemon_id: &str) -> MutationResult<bool> {
    let mut items = owned(trainer)?;
    if items.iter().any(|v| v.as_str() == Some(pokemon_id)) {
        return Ok(false);
    }
    items.push(Value::from(pokemon_id));
    trainer.insert(OWNS_FIELD, Value::Array(items));
    Ok(true)
}
