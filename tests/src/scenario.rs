//! Scenario definition.
//!
//! A scenario seeds a store from a [`Fixture`], then runs named steps in
//! order. Each step is a pipeline, a catalog query or a mutation, paired with
//! an [`Assertion`] on its result.

use dex_mutation::{MutationApplier, MutationOutcome, MutationResult, SchemaSet};
use dex_query::{CatalogQuery, ExecutorConfig, Pipeline};
use dex_store::Dataset;

use crate::assertion::Assertion;
use crate::error::ScenarioResult;
use crate::fixtures::Fixture;
use crate::runner::Runner;

/// A mutation step body.
pub type MutationFn = Box<dyn Fn(&mut MutationApplier<'_>) -> MutationResult<MutationOutcome>>;

pub enum Action {
    Aggregate { collection: String, pipeline: Pipeline },
    Catalog(CatalogQuery),
    Mutate(MutationFn),
}

pub struct Step {
    pub name: String,
    pub action: Action,
    pub assertion: Assertion,
}

/// A named sequence of steps over one seeded store.
pub struct Scenario {
    name: String,
    fixture: Fixture,
    from_files: bool,
    config: ExecutorConfig,
    schemas: SchemaSet,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fixture: Fixture::new(),
            from_files: false,
            config: ExecutorConfig::default(),
            schemas: SchemaSet::new(),
            steps: Vec::new(),
        }
    }

    pub fn fixture(mut self, fixture: Fixture) -> Self {
        self.fixture = fixture;
        self
    }

    /// Seed through JSON files and the folder importer instead of direct inserts.
    pub fn from_files(mut self) -> Self {
        self.from_files = true;
        self
    }

    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn schemas(mut self, schemas: SchemaSet) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn aggregate<F>(mut self, name: &str, collection: &str, pipeline: Pipeline, assert: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        self.steps.push(Step {
            name: name.to_string(),
            action: Action::Aggregate {
                collection: collection.to_string(),
                pipeline,
            },
            assertion: assert(Assertion::new()),
        });
        self
    }

    pub fn catalog<F>(mut self, name: &str, query: CatalogQuery, assert: F) -> Self
    where
        F: FnOnce(Assertion) -> Assertion,
    {
        self.steps.push(Step {
            name: name.to_string(),
            action: Action::Catalog(query),
            assertion: assert(Assertion::new()),
        });
        self
    }

    pub fn mutate<M, F>(mut self, name: &str, mutation: M, assert: F) -> Self
    where
        M: Fn(&mut MutationApplier<'_>) -> MutationResult<MutationOutcome> + 'static,
        F: FnOnce(Assertion) -> Assertion,
    {
        self.steps.push(Step {
            name: name.to_string(),
            action: Action::Mutate(Box::new(mutation)),
            assertion: assert(Assertion::new()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fixture_data(&self) -> &Fixture {
        &self.fixture
    }

    pub fn seeds_from_files(&self) -> bool {
        self.from_files
    }

    pub fn executor_config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn schema_set(&self) -> &SchemaSet {
        &self.schemas
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step and return the store as the last step left it.
    pub fn run(&self) -> ScenarioResult<Dataset> {
        Runner::new(self).run()
    }
}
