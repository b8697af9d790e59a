//! Executor configuration.

/// Knobs for [`crate::PipelineExecutor`].
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Reject `$first`/`$last` accumulators unless a `$sort` precedes the
    /// `$group` (with no other `$group` in between).
    pub require_ordered_first: bool,
    /// Upper bound on `$graphLookup` recursion, applied on top of each
    /// stage's own `max_depth`.
    pub max_graph_depth: Option<usize>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            require_ordered_first: true,
            max_graph_depth: None,
        }
    }
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_require_ordered_first(mut self, require: bool) -> Self {
        self.require_ordered_first = require;
        self
    }

    pub fn with_max_graph_depth(mut self, depth: usize) -> Self {
        self.max_graph_depth = Some(depth);
        self
    }

    /// Effective recursion limit for a stage declaring `stage_limit`.
    pub fn graph_depth_limit(&self, stage_limit: Option<usize>) -> Option<usize> {
        match (stage_limit, self.max_graph_depth) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
