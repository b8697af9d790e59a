//! Well-known collection and field names of the Pokémon dataset.
//!
//! These constants keep the store, the query catalog and the mutation
//! applier agreeing on the same spelling.

/// Identifier field present on every stored document.
pub const ID_FIELD: &str = "_id";

/// Pokémon collection.
pub const POKEMON: &str = "Pokemon";

/// Trainer collection.
pub const TRAINER: &str = "Trainer";

/// Type collection.
pub const TYPE: &str = "Type";

/// Gym collection.
pub const GYM: &str = "Gym";

/// Battle collection (append-only contest records).
pub const BATTLE: &str = "Battle";

/// All collections of the Pokémon dataset, in dependency order.
pub const ALL_COLLECTIONS: [&str; 5] = [TYPE, POKEMON, TRAINER, GYM, BATTLE];

/// Trainer field holding the set of owned Pokémon ids.
pub const OWNS_FIELD: &str = "owns";

/// Pokémon field linking to the next evolution stage (nullable).
pub const EVOLVES_TO_FIELD: &str = "evolves_to";

/// Pokémon field linking to an alternate form (nullable).
pub const HAS_FORM_FIELD: &str = "has_form";
