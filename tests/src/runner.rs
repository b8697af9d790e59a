//! Scenario runner.

use dex_mutation::MutationApplier;
use dex_query::PipelineExecutor;
use dex_store::{load_dir, Dataset, LoaderConfig};
use tracing_subscriber::EnvFilter;

use crate::assertion::StepOutput;
use crate::error::{ScenarioError, ScenarioResult};
use crate::scenario::{Action, Scenario};

/// Runs a scenario against a fresh store.
pub struct Runner<'s> {
    scenario: &'s Scenario,
}

impl<'s> Runner<'s> {
    pub fn new(scenario: &'s Scenario) -> Self {
        Self { scenario }
    }

    pub fn run(&self) -> ScenarioResult<Dataset> {
        init_tracing();

        // 1. Seed the store
        let mut dataset = self.seed()?;

        // 2. Execute each step and verify its assertion
        for step in self.scenario.steps() {
            let result = match &step.action {
                Action::Aggregate { collection, pipeline } => {
                    let executor =
                        PipelineExecutor::with_config(&dataset, self.scenario.executor_config().clone());
                    executor
                        .aggregate(collection, pipeline)
                        .map(StepOutput::Documents)
                        .map_err(|e| e.to_string())
                }
                Action::Catalog(query) => {
                    let executor =
                        PipelineExecutor::with_config(&dataset, self.scenario.executor_config().clone());
                    query
                        .run(&executor)
                        .map(StepOutput::Documents)
                        .map_err(|e| e.to_string())
                }
                Action::Mutate(mutation) => {
                    let mut applier =
                        MutationApplier::with_schemas(&mut dataset, self.scenario.schema_set().clone());
                    mutation(&mut applier)
                        .map(StepOutput::Mutation)
                        .map_err(|e| e.to_string())
                }
            };

            step.assertion
                .verify(&step.name, &result)
                .map_err(|e| match e {
                    ScenarioError::AssertionFailed { step, message } => ScenarioError::assertion_failed(
                        format!("{}:{}", self.scenario.name(), step),
                        message,
                    ),
                    other => other,
                })?;
        }

        Ok(dataset)
    }

    fn seed(&self) -> ScenarioResult<Dataset> {
        let fixture = self.scenario.fixture_data();
        if !self.scenario.seeds_from_files() {
            return fixture.dataset();
        }

        let dir = fixture.write_dir()?;
        let mut dataset = Dataset::pokemon();
        let summary = load_dir(&mut dataset, &LoaderConfig::new().with_data_folder(dir.path()))?;
        if !summary.is_clean() {
            let errors: Vec<String> = summary
                .files
                .iter()
                .flat_map(|f| f.errors.iter().cloned())
                .collect();
            return Err(ScenarioError::seed("<files>", errors.join("; ")));
        }
        Ok(dataset)
    }
}

/// Install a test subscriber once. Filter with `RUST_LOG`, e.g.
/// `RUST_LOG=dex_query=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use crate::fixtures::league;
    use crate::scenario::Scenario;
    use dex_core::POKEMON;
    use dex_query::{Pipeline, Stage};

    #[test]
    fn test_failed_step_names_scenario() {
        let scenario = Scenario::new("names")
            .fixture(league())
            .aggregate("count", POKEMON, Pipeline::new(vec![Stage::count("n")]), |a| a.rows(2));

        let err = scenario.run().unwrap_err();

        assert!(err.to_string().contains("names:count"));
    }
}
