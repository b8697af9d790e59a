//! Record builders and fixture folders.
//!
//! Builders produce documents the way the JSON export encodes them: stats are
//! strings and a missing evolution is the string `"null"`. Inserting them into
//! a [`Dataset::pokemon`] store exercises normalization.

use std::fs;

use dex_core::json::document_to_json;
use dex_core::{doc, Document, Value, BATTLE, GYM, POKEMON, TRAINER, TYPE};
use dex_store::Dataset;
use tempfile::TempDir;

use crate::error::{ScenarioError, ScenarioResult};

/// Builder for a `Pokemon` record.
#[derive(Debug, Clone)]
pub struct PokemonRecord {
    id: String,
    name: String,
    tot: String,
    types: Vec<String>,
    evolves_to: Option<String>,
    has_form: Option<String>,
}

impl PokemonRecord {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tot: "300".to_string(),
            types: Vec::new(),
            evolves_to: None,
            has_form: None,
        }
    }

    pub fn tot(mut self, tot: i64) -> Self {
        self.tot = tot.to_string();
        self
    }

    /// Set the raw `stats.tot` string, e.g. `" 318 "` or `"n/a"`.
    pub fn raw_tot(mut self, tot: &str) -> Self {
        self.tot = tot.to_string();
        self
    }

    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn evolves_to(mut self, next: &str) -> Self {
        self.evolves_to = Some(next.to_string());
        self
    }

    pub fn has_form(mut self, form: &str) -> Self {
        self.has_form = Some(form.to_string());
        self
    }

    pub fn build(self) -> Document {
        let pokedex = match self.id.parse::<u32>() {
            Ok(n) => format!("{:04}", n),
            Err(_) => "0000".to_string(),
        };
        doc! {
            "_id" => self.id,
            "pokedex" => pokedex,
            "name" => self.name,
            "stats" => doc! {
                "hp" => "45",
                "atk" => "49",
                "def" => "49",
                "tot" => self.tot,
            },
            "types" => self.types,
            "evolves_to" => self.evolves_to.unwrap_or_else(|| "null".to_string()),
            "has_form" => self.has_form.unwrap_or_else(|| "null".to_string()),
        }
    }
}

pub fn pokemon(id: &str, name: &str) -> PokemonRecord {
    PokemonRecord::new(id, name)
}

pub fn trainer(id: &str, name: &str, owns: &[&str]) -> Document {
    doc! { "_id" => id, "name" => name, "owns" => owns.to_vec() }
}

pub fn type_record(id: &str, name: &str) -> Document {
    doc! { "_id" => id, "name" => name }
}

pub fn gym(id: &str, name: &str) -> Document {
    doc! { "_id" => id, "name" => name, "city" => format!("{} City", name) }
}

/// One side of a battle.
pub fn side(trainer_id: &str, pokemon_id: &str) -> Document {
    doc! { "trainer_id" => trainer_id, "pokemon_id" => pokemon_id }
}

pub fn battle(id: &str, gym_id: &str, winner: Document, loser: Document) -> Document {
    doc! {
        "_id" => id,
        "gym_id" => gym_id,
        "date" => "2024-05-01",
        "participants" => doc! { "winner" => winner, "loser" => loser },
    }
}

/// Documents grouped by collection, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    collections: Vec<(String, Vec<Document>)>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, collection: &str, document: Document) -> Self {
        match self.collections.iter_mut().find(|(name, _)| name == collection) {
            Some((_, docs)) => docs.push(document),
            None => self.collections.push((collection.to_string(), vec![document])),
        }
        self
    }

    pub fn with_all<I>(self, collection: &str, documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        documents
            .into_iter()
            .fold(self, |fixture, document| fixture.with(collection, document))
    }

    pub fn collections(&self) -> impl Iterator<Item = (&str, &[Document])> {
        self.collections
            .iter()
            .map(|(name, docs)| (name.as_str(), docs.as_slice()))
    }

    /// Insert every document into `dataset`, registering unknown collections.
    pub fn seed(&self, dataset: &mut Dataset) -> ScenarioResult<()> {
        for (collection, docs) in self.collections() {
            if !dataset.has_collection(collection) {
                dataset.register(collection);
            }
            for document in docs {
                dataset
                    .insert(collection, document.clone())
                    .map_err(|e| ScenarioError::seed(collection, e.to_string()))?;
            }
        }
        Ok(())
    }

    /// A Pokémon store holding this fixture.
    pub fn dataset(&self) -> ScenarioResult<Dataset> {
        let mut dataset = Dataset::pokemon();
        self.seed(&mut dataset)?;
        Ok(dataset)
    }

    /// Write one `<Collection>.json` array file per collection.
    pub fn write_dir(&self) -> ScenarioResult<TempDir> {
        let dir = tempfile::tempdir().map_err(|e| ScenarioError::fixture_write("<tempdir>", e))?;
        for (collection, docs) in self.collections() {
            let json = serde_json::Value::Array(
                docs.iter()
                    .map(|d| serde_json::Value::Object(document_to_json(d)))
                    .collect(),
            );
            let path = dir.path().join(format!("{}.json", collection));
            fs::write(&path, json.to_string()).map_err(|e| ScenarioError::fixture_write(&path, e))?;
        }
        Ok(dir)
    }
}

/// A small league: the Bulbasaur line, Charmander, and a Squirtle that points
/// at an evolution missing from the dataset.
///
/// Bulbasaur wins two battles, Charmander one.
pub fn league() -> Fixture {
    Fixture::new()
        .with_all(
            TYPE,
            [
                type_record("10", "Fire"),
                type_record("11", "Water"),
                type_record("12", "Grass"),
                type_record("4", "Poison"),
            ],
        )
        .with_all(
            POKEMON,
            [
                pokemon("1", "Bulbasaur").tot(318).types(["12", "4"]).evolves_to("2").build(),
                pokemon("2", "Ivysaur").tot(405).types(["12", "4"]).evolves_to("3").build(),
                pokemon("3", "Venusaur").tot(525).types(["12", "4"]).build(),
                pokemon("4", "Charmander").tot(309).types(["10"]).evolves_to("5").build(),
                pokemon("7", "Squirtle").tot(314).types(["11"]).evolves_to("8").build(),
            ],
        )
        .with_all(
            TRAINER,
            [
                trainer("1", "Ash", &["1", "4"]),
                trainer("2", "Misty", &["7"]),
                trainer("3", "Brock", &[]),
            ],
        )
        .with_all(GYM, [gym("1", "Pewter"), gym("2", "Cerulean")])
        .with_all(
            BATTLE,
            [
                battle("1", "1", side("1", "1"), side("2", "7")),
                battle("2", "1", side("1", "1"), side("3", "4")),
                battle("3", "2", side("2", "4"), side("1", "7")),
            ],
        )
}

/// Shorthand for an expected string value.
pub fn s(value: &str) -> Value {
    Value::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pokemon_builder_uses_export_encoding() {
        let bulbasaur = pokemon("1", "Bulbasaur").tot(318).build();

        assert_eq!(bulbasaur.get("pokedex"), Some(&s("0001")));
        assert_eq!(bulbasaur.get_path("stats.tot"), Some(s("318")));
        assert_eq!(bulbasaur.get("evolves_to"), Some(&s("null")));
    }

    #[test]
    fn test_league_normalizes_on_seed() {
        let dataset = league().dataset().unwrap();

        let venusaur = dataset.find_by_key(POKEMON, "3").unwrap().unwrap();
        assert_eq!(venusaur.get_path("stats.tot"), Some(Value::Int(525)));
        assert_eq!(venusaur.get("evolves_to"), Some(&Value::Null));
        assert_eq!(dataset.get_collection(BATTLE).unwrap().len(), 3);
    }
}
