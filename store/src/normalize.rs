//! Ingestion normalization.
//!
//! The source exports encode numbers as strings (`"tot": "318"`) and absent
//! references as the literal string `"null"`. Declared fields are rewritten to
//! real numbers and real nulls once, when a document enters the store, so the
//! evaluator can compare values without guessing.

use std::collections::HashMap;

use dex_core::{Document, Value, EVOLVES_TO_FIELD, HAS_FORM_FIELD, POKEMON};

use crate::{StoreError, StoreResult};

/// Per-collection normalization rules.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    /// Dotted paths whose string values must parse as numbers.
    pub numeric: Vec<String>,
    /// Dotted paths where the string `"null"` means an absent reference.
    pub nullable: Vec<String>,
}

/// Normalizer applied by the dataset on every insert and update.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: HashMap<String, FieldRules>,
}

impl Normalizer {
    /// A normalizer with no rules; documents pass through unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a numeric field.
    pub fn numeric(mut self, collection: &str, path: &str) -> Self {
        self.rules
            .entry(collection.to_string())
            .or_default()
            .numeric
            .push(path.to_string());
        self
    }

    /// Declare a nullable reference field.
    pub fn nullable(mut self, collection: &str, path: &str) -> Self {
        self.rules
            .entry(collection.to_string())
            .or_default()
            .nullable
            .push(path.to_string());
        self
    }

    /// Rules for the Pokémon dataset export.
    pub fn pokemon_dataset() -> Self {
        ["hp", "atk", "def", "sp_atk", "sp_def", "tot"]
            .iter()
            .fold(Self::new(), |n, stat| {
                n.numeric(POKEMON, &format!("stats.{}", stat))
            })
            .nullable(POKEMON, EVOLVES_TO_FIELD)
            .nullable(POKEMON, HAS_FORM_FIELD)
    }

    pub fn rules_for(&self, collection: &str) -> Option<&FieldRules> {
        self.rules.get(collection)
    }

    /// Normalize a document in place.
    pub fn normalize(&self, collection: &str, document: &mut Document) -> StoreResult<()> {
        let Some(rules) = self.rules.get(collection) else {
            return Ok(());
        };

        for path in &rules.numeric {
            if let Some(Value::String(raw)) = document.get_path(path) {
                let parsed = parse_number(&raw)
                    .ok_or_else(|| StoreError::invalid_numeric(collection, path, raw.as_str()))?;
                document.set_path(path, parsed);
            }
        }

        for path in &rules.nullable {
            if let Some(Value::String(raw)) = document.get_path(path) {
                if raw.trim().eq_ignore_ascii_case("null") {
                    document.set_path(path, Value::Null);
                }
            }
        }

        Ok(())
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::Int(i));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}
