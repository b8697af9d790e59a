//! Record schemas checked before a mutation writes.
//!
//! A schema is deliberately small: which fields must be present and non-null,
//! what kind of value a field holds when present, and optional format patterns
//! for string fields. Unlisted fields are never rejected.

use std::collections::HashMap;

use dex_core::{Document, Value, BATTLE, GYM, ID_FIELD, POKEMON, TRAINER, TYPE};
use regex_lite::Regex;

use crate::error::{MutationError, MutationResult};

/// Kind of value a field may hold. Null is accepted for every kind; use
/// [`RecordSchema::require`] to forbid it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Bool,
    Array,
    Document,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Number => "Number",
            FieldKind::Bool => "Bool",
            FieldKind::Array => "Array",
            FieldKind::Document => "Document",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Bool => matches!(value, Value::Bool(_)),
            FieldKind::Array => value.is_array(),
            FieldKind::Document => value.is_document(),
        }
    }
}

/// Schema for one collection.
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    required: Vec<String>,
    kinds: Vec<(String, FieldKind)>,
    patterns: Vec<(String, Regex)>,
}

impl RecordSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a field to be present and non-null.
    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required.push(field.into());
        self
    }

    /// Constrain the kind of a field's value when it is present.
    pub fn kind(mut self, field: impl Into<String>, kind: FieldKind) -> Self {
        self.kinds.push((field.into(), kind));
        self
    }

    /// Constrain a string field to a `regex-lite` pattern.
    pub fn pattern(mut self, field: impl Into<String>, pattern: &str) -> MutationResult<Self> {
        let re = Regex::new(pattern)
            .map_err(|e| MutationError::invalid_pattern(pattern, e.to_string()))?;
        self.patterns.push((field.into(), re));
        Ok(self)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.required.iter().map(String::as_str)
    }

    /// Check a document against this schema.
    ///
    /// All missing required fields are reported together; kind and pattern
    /// checks then fail on the first offending field.
    pub fn validate(&self, collection: &str, doc: &Document) -> MutationResult<()> {
        let mut missing: Vec<String> = Vec::new();
        if doc.id().is_none() {
            missing.push(ID_FIELD.to_string());
        }
        for field in &self.required {
            if doc.resolve(field).is_null() && !missing.contains(field) {
                missing.push(field.clone());
            }
        }
        if !missing.is_empty() {
            return Err(MutationError::validation(collection, missing));
        }

        for (field, kind) in &self.kinds {
            match doc.get_path(field) {
                None | Some(Value::Null) => {}
                Some(value) if kind.accepts(&value) => {}
                Some(value) => {
                    return Err(MutationError::invalid_field_type(
                        field.as_str(),
                        kind.name(),
                        value.type_name(),
                    ));
                }
            }
        }

        for (field, re) in &self.patterns {
            if let Some(Value::String(s)) = doc.get_path(field) {
                if !re.is_match(&s) {
                    return Err(MutationError::pattern_violation(field.as_str(), re.as_str(), s));
                }
            }
        }

        Ok(())
    }
}

/// Schemas keyed by collection name.
///
/// Collections without a schema still require a string `_id`.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    schemas: HashMap<String, RecordSchema>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, collection: impl Into<String>, schema: RecordSchema) -> Self {
        self.schemas.insert(collection.into(), schema);
        self
    }

    pub fn get(&self, collection: &str) -> Option<&RecordSchema> {
        self.schemas.get(collection)
    }

    /// Validate a document bound for `collection`.
    pub fn validate(&self, collection: &str, doc: &Document) -> MutationResult<()> {
        match self.schemas.get(collection) {
            Some(schema) => schema.validate(collection, doc),
            None => RecordSchema::new().validate(collection, doc),
        }
    }

    /// Schemas for the five Pokémon dataset collections.
    pub fn pokemon_dataset() -> MutationResult<Self> {
        let pokemon = RecordSchema::new()
            .require("name")
            .require("stats")
            .require("types")
            .kind("name", FieldKind::String)
            .kind("stats", FieldKind::Document)
            .kind("stats.tot", FieldKind::Number)
            .kind("types", FieldKind::Array)
            .kind("evolves_to", FieldKind::String)
            .kind("has_form", FieldKind::String)
            .pattern("pokedex", r"^[0-9]+$")?;

        let trainer = RecordSchema::new()
            .require("name")
            .kind("name", FieldKind::String)
            .kind("owns", FieldKind::Array);

        let named = RecordSchema::new()
            .require("name")
            .kind("name", FieldKind::String);

        let battle = RecordSchema::new()
            .require("gym_id")
            .require("participants.winner.pokemon_id")
            .require("participants.loser.pokemon_id")
            .kind("participants", FieldKind::Document)
            .pattern("date", r"^\d{4}-\d{2}-\d{2}")?;

        Ok(Self::new()
            .with(POKEMON, pokemon)
            .with(TRAINER, trainer)
            .with(TYPE, named.clone())
            .with(GYM, named)
            .with(BATTLE, battle))
    }
}
