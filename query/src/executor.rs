//! Pipeline execution.

use dex_core::Document;
use dex_store::Dataset;
use tracing::debug;

use crate::config::ExecutorConfig;
use crate::operators::OperatorContext;
use crate::stage::{Pipeline, Stage};
use crate::{QueryError, QueryResult};

/// Runs pipelines against a dataset. Read-only.
pub struct PipelineExecutor<'d> {
    dataset: &'d Dataset,
    config: ExecutorConfig,
}

impl<'d> PipelineExecutor<'d> {
    /// Create an executor with the default configuration.
    pub fn new(dataset: &'d Dataset) -> Self {
        Self::with_config(dataset, ExecutorConfig::default())
    }

    pub fn with_config(dataset: &'d Dataset, config: ExecutorConfig) -> Self {
        Self { dataset, config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Evaluate `pipeline` over the documents of `collection`.
    ///
    /// The pipeline is validated before any stage runs. The first failing
    /// stage aborts evaluation.
    pub fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> QueryResult<Vec<Document>> {
        self.validate(pipeline)?;

        let input = self.dataset.get_collection(collection)?.to_vec();
        debug!(
            collection,
            stages = pipeline.len(),
            input = input.len(),
            "running pipeline"
        );

        let ctx = OperatorContext::new(self.dataset, &self.config);
        let output = ctx.execute_stages(input, pipeline.stages())?;

        debug!(collection, output = output.len(), "pipeline finished");
        Ok(output)
    }

    /// Check static preconditions: non-negative limits and, when configured,
    /// that every `$first`/`$last` consumes a sorted stream.
    pub fn validate(&self, pipeline: &Pipeline) -> QueryResult<()> {
        let mut ordered = false;

        for (index, stage) in pipeline.stages().iter().enumerate() {
            match stage {
                Stage::Limit(n) if *n < 0 => return Err(QueryError::invalid_limit("$limit", *n)),
                Stage::Skip(n) if *n < 0 => return Err(QueryError::invalid_limit("$skip", *n)),
                Stage::Sort(_) => ordered = true,
                Stage::Group(spec) => {
                    if self.config.require_ordered_first && !ordered {
                        if let Some(acc) = spec
                            .accumulators
                            .iter()
                            .find(|a| a.accumulator.is_order_sensitive())
                        {
                            return Err(QueryError::unordered_accumulator(
                                acc.accumulator.name(),
                                index,
                            ));
                        }
                    }
                    ordered = false;
                }
                Stage::UnionWith { pipeline, .. } => {
                    self.validate(pipeline)?;
                    ordered = false;
                }
                _ => {}
            }
        }

        Ok(())
    }
}
