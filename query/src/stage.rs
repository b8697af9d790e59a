//! Pipeline stage descriptors.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s evaluated against one
//! collection. Stages are plain data; [`crate::OperatorContext`] runs them.

use crate::aggregates::Accumulator;
use crate::expr::{Expr, Predicate};

/// An ordered list of stages.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Append a stage.
    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl From<Vec<Stage>> for Pipeline {
    fn from(stages: Vec<Stage>) -> Self {
        Self::new(stages)
    }
}

/// One step of a pipeline.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Keep documents satisfying the predicate.
    Match(Predicate),

    /// Reshape documents.
    Project(Vec<ProjectField>),

    /// Add or overwrite computed fields, keeping everything else.
    AddFields(Vec<(String, Expr)>),

    /// Emit one document per element of an array field.
    Unwind(UnwindSpec),

    /// Partition by key and reduce each partition.
    Group(GroupSpec),

    /// Stable multi-key sort.
    Sort(Vec<SortKey>),

    /// Drop the first N documents.
    Skip(i64),

    /// Keep the first N documents.
    Limit(i64),

    /// Left outer equality join against another collection.
    Lookup(LookupSpec),

    /// Recursive join (transitive closure) against another collection.
    GraphLookup(GraphLookupSpec),

    /// Append the output of a sub-pipeline run over another collection.
    UnionWith {
        collection: String,
        pipeline: Pipeline,
    },

    /// Replace the stream with a single `{field: count}` document.
    Count { field: String },
}

impl Stage {
    /// Stage name as it appears in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Match(_) => "$match",
            Stage::Project(_) => "$project",
            Stage::AddFields(_) => "$addFields",
            Stage::Unwind(_) => "$unwind",
            Stage::Group(_) => "$group",
            Stage::Sort(_) => "$sort",
            Stage::Skip(_) => "$skip",
            Stage::Limit(_) => "$limit",
            Stage::Lookup(_) => "$lookup",
            Stage::GraphLookup(_) => "$graphLookup",
            Stage::UnionWith { .. } => "$unionWith",
            Stage::Count { .. } => "$count",
        }
    }

    pub fn matching(predicate: Predicate) -> Self {
        Stage::Match(predicate)
    }

    pub fn project(fields: impl IntoIterator<Item = ProjectField>) -> Self {
        Stage::Project(fields.into_iter().collect())
    }

    pub fn add_fields<K: Into<String>>(fields: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Stage::AddFields(fields.into_iter().map(|(k, e)| (k.into(), e)).collect())
    }

    /// Unwind that drops documents whose array is missing, null or empty.
    pub fn unwind(path: impl Into<String>) -> Self {
        Stage::Unwind(UnwindSpec {
            path: path.into(),
            preserve_null_and_empty: false,
        })
    }

    /// Unwind that keeps documents whose array is missing, null or empty.
    pub fn unwind_preserving(path: impl Into<String>) -> Self {
        Stage::Unwind(UnwindSpec {
            path: path.into(),
            preserve_null_and_empty: true,
        })
    }

    pub fn group(key: Expr, accumulators: impl IntoIterator<Item = AccumulatorSpec>) -> Self {
        Stage::Group(GroupSpec {
            key,
            accumulators: accumulators.into_iter().collect(),
        })
    }

    pub fn sort(keys: impl IntoIterator<Item = SortKey>) -> Self {
        Stage::Sort(keys.into_iter().collect())
    }

    pub fn skip(n: i64) -> Self {
        Stage::Skip(n)
    }

    pub fn limit(n: i64) -> Self {
        Stage::Limit(n)
    }

    pub fn lookup(
        from: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Self {
        Stage::Lookup(LookupSpec {
            from: from.into(),
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            as_field: as_field.into(),
        })
    }

    pub fn graph_lookup(spec: GraphLookupSpec) -> Self {
        Stage::GraphLookup(spec)
    }

    pub fn union_with(collection: impl Into<String>, pipeline: impl Into<Pipeline>) -> Self {
        Stage::UnionWith {
            collection: collection.into(),
            pipeline: pipeline.into(),
        }
    }

    pub fn count(field: impl Into<String>) -> Self {
        Stage::Count {
            field: field.into(),
        }
    }
}

/// How a projected field is produced.
#[derive(Debug, Clone)]
pub enum Projection {
    /// Copy the field from the input document.
    Include,
    /// Drop the field.
    Exclude,
    /// Evaluate an expression against the input document.
    Computed(Expr),
}

/// One entry of a `$project` stage.
#[derive(Debug, Clone)]
pub struct ProjectField {
    pub name: String,
    pub projection: Projection,
}

impl ProjectField {
    pub fn include(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            projection: Projection::Include,
        }
    }

    pub fn exclude(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            projection: Projection::Exclude,
        }
    }

    pub fn computed(name: impl Into<String>, expr: Expr) -> Self {
        Self {
            name: name.into(),
            projection: Projection::Computed(expr),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnwindSpec {
    pub path: String,
    pub preserve_null_and_empty: bool,
}

/// Group key plus the named accumulators producing the output fields.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    /// Key expression; an [`Expr::Object`] gives a composite key and a null
    /// literal puts every document in one group.
    pub key: Expr,
    pub accumulators: Vec<AccumulatorSpec>,
}

/// A named accumulator in a `$group` stage.
#[derive(Debug, Clone)]
pub struct AccumulatorSpec {
    pub name: String,
    pub accumulator: Accumulator,
}

impl AccumulatorSpec {
    pub fn new(name: impl Into<String>, accumulator: Accumulator) -> Self {
        Self {
            name: name.into(),
            accumulator,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct SortKey {
    pub path: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LookupSpec {
    pub from: String,
    pub local_field: String,
    pub foreign_field: String,
    pub as_field: String,
}

/// Parameters of a recursive join.
///
/// Starting from `start_with` evaluated on the input document, repeatedly find
/// documents of `from` whose `connect_to_field` equals a value in the
/// frontier, then continue from their `connect_from_field`.
#[derive(Debug, Clone)]
pub struct GraphLookupSpec {
    pub from: String,
    pub start_with: Expr,
    pub connect_from_field: String,
    pub connect_to_field: String,
    pub as_field: String,
    /// Deepest recursion level to follow; `Some(0)` keeps direct matches only.
    pub max_depth: Option<usize>,
    /// Annotate each match with its recursion depth under this field.
    pub depth_field: Option<String>,
}

impl GraphLookupSpec {
    pub fn new(
        from: impl Into<String>,
        start_with: Expr,
        connect_from_field: impl Into<String>,
        connect_to_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            start_with,
            connect_from_field: connect_from_field.into(),
            connect_to_field: connect_to_field.into(),
            as_field: as_field.into(),
            max_depth: None,
            depth_field: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_depth_field(mut self, field: impl Into<String>) -> Self {
        self.depth_field = Some(field.into());
        self
    }
}
