//! Stage execution.
//!
//! Each stage consumes the whole document stream and produces a new one.
//! Stages never touch the dataset except to read the collections they join
//! against.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};

use dex_core::{Document, Value, ID_FIELD};
use dex_store::Dataset;
use tracing::debug;

use crate::aggregates::compute_aggregate;
use crate::config::ExecutorConfig;
use crate::expr::{Expr, Predicate};
use crate::stage::{
    GraphLookupSpec, GroupSpec, LookupSpec, ProjectField, Projection, SortDirection, SortKey,
    Stage, UnwindSpec,
};
use crate::{QueryError, QueryResult};

/// Operator executor context.
///
/// Holds references needed during stage execution.
pub struct OperatorContext<'d> {
    pub dataset: &'d Dataset,
    pub config: &'d ExecutorConfig,
}

impl<'d> OperatorContext<'d> {
    /// Create a new operator context.
    pub fn new(dataset: &'d Dataset, config: &'d ExecutorConfig) -> Self {
        Self { dataset, config }
    }

    /// Run stages in order, feeding each stage the previous stage's output.
    pub fn execute_stages(
        &self,
        mut docs: Vec<Document>,
        stages: &[Stage],
    ) -> QueryResult<Vec<Document>> {
        for (index, stage) in stages.iter().enumerate() {
            let input = docs.len();
            docs = self.execute_stage(stage, docs)?;
            debug!(
                stage = stage.name(),
                index,
                input,
                output = docs.len(),
                "stage evaluated"
            );
        }
        Ok(docs)
    }

    /// Execute a single stage.
    pub fn execute_stage(&self, stage: &Stage, input: Vec<Document>) -> QueryResult<Vec<Document>> {
        match stage {
            Stage::Match(predicate) => self.execute_match(input, predicate),
            Stage::Project(fields) => self.execute_project(input, fields),
            Stage::AddFields(fields) => self.execute_add_fields(input, fields),
            Stage::Unwind(spec) => self.execute_unwind(input, spec),
            Stage::Group(spec) => self.execute_group(input, spec),
            Stage::Sort(keys) => self.execute_sort(input, keys),
            Stage::Skip(n) => {
                let n = usize::try_from(*n).map_err(|_| QueryError::invalid_limit("$skip", *n))?;
                Ok(input.into_iter().skip(n).collect())
            }
            Stage::Limit(n) => {
                let n = usize::try_from(*n).map_err(|_| QueryError::invalid_limit("$limit", *n))?;
                let mut input = input;
                input.truncate(n);
                Ok(input)
            }
            Stage::Lookup(spec) => self.execute_lookup(input, spec),
            Stage::GraphLookup(spec) => self.execute_graph_lookup(input, spec),
            Stage::UnionWith {
                collection,
                pipeline,
            } => {
                let other = self.dataset.get_collection(collection)?.to_vec();
                let mut output = input;
                output.extend(self.execute_stages(other, pipeline.stages())?);
                Ok(output)
            }
            Stage::Count { field } => {
                let count = Value::Int(input.len() as i64);
                Ok(vec![Document::new().with(field.as_str(), count)])
            }
        }
    }

    fn execute_match(
        &self,
        input: Vec<Document>,
        predicate: &Predicate,
    ) -> QueryResult<Vec<Document>> {
        let mut results = Vec::new();
        for doc in input {
            if predicate.evaluate(&doc)? {
                results.push(doc);
            }
        }
        Ok(results)
    }

    fn execute_project(
        &self,
        input: Vec<Document>,
        fields: &[ProjectField],
    ) -> QueryResult<Vec<Document>> {
        let inclusion = fields
            .iter()
            .any(|f| !matches!(f.projection, Projection::Exclude));

        input
            .iter()
            .map(|doc| project_document(doc, fields, inclusion))
            .collect()
    }

    fn execute_add_fields(
        &self,
        input: Vec<Document>,
        fields: &[(String, Expr)],
    ) -> QueryResult<Vec<Document>> {
        let mut results = Vec::with_capacity(input.len());
        for mut doc in input {
            let mut computed = Vec::with_capacity(fields.len());
            for (name, expr) in fields {
                computed.push((name, expr.eval(&doc)?));
            }
            for (name, value) in computed {
                doc.set_path(name, value);
            }
            results.push(doc);
        }
        Ok(results)
    }

    fn execute_unwind(&self, input: Vec<Document>, spec: &UnwindSpec) -> QueryResult<Vec<Document>> {
        let mut results = Vec::new();

        for mut doc in input {
            let target = match doc.get_stored(&spec.path) {
                Some(value) => Some(value.clone()),
                // Only an array on the way down makes the fanned-out path resolve.
                None if doc.get_path(&spec.path).is_some() => {
                    return Err(QueryError::invalid_unwind_target(
                        &spec.path,
                        "Array before the last segment",
                    ));
                }
                None => None,
            };
            match target {
                Some(Value::Array(items)) if !items.is_empty() => {
                    for item in items {
                        let mut copy = doc.clone();
                        copy.set_path(&spec.path, item);
                        results.push(copy);
                    }
                }
                Some(Value::Array(_)) => {
                    if spec.preserve_null_and_empty {
                        doc.remove_path(&spec.path);
                        results.push(doc);
                    }
                }
                None | Some(Value::Null) => {
                    if spec.preserve_null_and_empty {
                        results.push(doc);
                    }
                }
                Some(other) => {
                    return Err(QueryError::invalid_unwind_target(
                        &spec.path,
                        other.type_name(),
                    ));
                }
            }
        }

        Ok(results)
    }

    fn execute_group(&self, input: Vec<Document>, spec: &GroupSpec) -> QueryResult<Vec<Document>> {
        // Groups are emitted in order of first appearance.
        let mut keys: Vec<Value> = Vec::new();
        let mut groups: Vec<Vec<Document>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for doc in input {
            let key = spec.key.eval(&doc)?;
            let slot = *index.entry(key.canonical_key()).or_insert_with(|| {
                keys.push(key);
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(doc);
        }

        let mut output = Vec::with_capacity(groups.len());
        for (key, group) in keys.into_iter().zip(groups) {
            let mut row = Document::new().with(ID_FIELD, key);
            for acc in &spec.accumulators {
                row.insert(acc.name.as_str(), compute_aggregate(acc, &group)?);
            }
            output.push(row);
        }

        Ok(output)
    }

    fn execute_sort(&self, input: Vec<Document>, keys: &[SortKey]) -> QueryResult<Vec<Document>> {
        let mut decorated: Vec<(Vec<Value>, Document)> = input
            .into_iter()
            .map(|doc| {
                let values = keys.iter().map(|k| doc.resolve(&k.path)).collect();
                (values, doc)
            })
            .collect();

        // `sort_by` is stable: ties keep their input order.
        decorated.sort_by(|(a, _), (b, _)| {
            for (key, (a_val, b_val)) in keys.iter().zip(a.iter().zip(b.iter())) {
                let cmp = compare_sort_values(a_val, b_val, key.direction);
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            Ordering::Equal
        });

        Ok(decorated.into_iter().map(|(_, doc)| doc).collect())
    }

    fn execute_lookup(&self, input: Vec<Document>, spec: &LookupSpec) -> QueryResult<Vec<Document>> {
        let foreign = self.dataset.get_collection(&spec.from)?;
        let mut results = Vec::with_capacity(input.len());

        for mut doc in input {
            let locals = match doc.get_path(&spec.local_field) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Document(_)) => {
                    return Err(QueryError::invalid_lookup_field(&spec.local_field, "Document"));
                }
                Some(Value::Array(values)) => values,
                Some(value) => vec![value],
            };

            let matched = if spec.foreign_field == ID_FIELD {
                self.lookup_by_key(&spec.from, &locals)?
            } else {
                lookup_by_scan(foreign, &spec.foreign_field, &locals)
            };

            doc.set_path(&spec.as_field, Value::Array(matched));
            results.push(doc);
        }

        Ok(results)
    }

    /// Join on `_id` through the key index.
    ///
    /// Matches come back in collection order, as [`lookup_by_scan`] returns them.
    fn lookup_by_key(&self, from: &str, locals: &[Value]) -> QueryResult<Vec<Value>> {
        let collection = self.dataset.collection(from)?;
        let mut positions: Vec<usize> = locals
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|key| collection.position(key))
            .collect();
        positions.sort_unstable();
        positions.dedup();

        let documents = collection.documents();
        Ok(positions
            .into_iter()
            .filter_map(|pos| documents.get(pos))
            .cloned()
            .map(Value::Document)
            .collect())
    }

    fn execute_graph_lookup(
        &self,
        input: Vec<Document>,
        spec: &GraphLookupSpec,
    ) -> QueryResult<Vec<Document>> {
        let foreign = self.dataset.get_collection(&spec.from)?;
        let max_depth = self.config.graph_depth_limit(spec.max_depth);
        let mut results = Vec::with_capacity(input.len());

        for mut doc in input {
            let start = spec.start_with.eval(&doc)?;
            let found = traverse(foreign, spec, start, max_depth)?;
            doc.set_path(&spec.as_field, Value::Array(found));
            results.push(doc);
        }

        Ok(results)
    }
}

fn project_document(doc: &Document, fields: &[ProjectField], inclusion: bool) -> QueryResult<Document> {
    if !inclusion {
        let mut out = doc.clone();
        for field in fields {
            out.remove_path(&field.name);
        }
        return Ok(out);
    }

    let mut out = Document::new();
    if !fields.iter().any(|f| f.name == ID_FIELD) {
        if let Some(id) = doc.get(ID_FIELD) {
            out.insert(ID_FIELD, id.clone());
        }
    }

    for field in fields {
        match &field.projection {
            Projection::Include => {
                if let Some(value) = doc.get_path(&field.name) {
                    out.set_path(&field.name, value);
                }
            }
            Projection::Exclude => {}
            Projection::Computed(Expr::Field(path)) => {
                if let Some(value) = doc.get_path(path) {
                    out.set_path(&field.name, value);
                }
            }
            Projection::Computed(expr) => out.set_path(&field.name, expr.eval(doc)?),
        }
    }

    Ok(out)
}

fn lookup_by_scan(foreign: &[Document], foreign_field: &str, locals: &[Value]) -> Vec<Value> {
    let locals: Vec<&Value> = locals.iter().filter(|v| !v.is_null()).collect();
    if locals.is_empty() {
        return Vec::new();
    }

    foreign
        .iter()
        .filter(|candidate| match candidate.get_path(foreign_field) {
            Some(target) => locals.iter().any(|local| connects(&target, local)),
            None => false,
        })
        .cloned()
        .map(Value::Document)
        .collect()
}

/// Breadth-first walk of `connect_from_field -> connect_to_field` edges.
///
/// Each foreign document is emitted at most once and each frontier value is
/// expanded at most once, so cycles terminate.
fn traverse(
    foreign: &[Document],
    spec: &GraphLookupSpec,
    start: Value,
    max_depth: Option<usize>,
) -> QueryResult<Vec<Value>> {
    let mut results = Vec::new();
    let mut matched: HashSet<usize> = HashSet::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut frontier: VecDeque<(Value, usize)> = VecDeque::new();

    for value in graph_values(start, "startWith")? {
        frontier.push_back((value, 0));
    }

    while let Some((value, depth)) = frontier.pop_front() {
        if max_depth.is_some_and(|max| depth > max) {
            continue;
        }
        if !visited.insert(value.canonical_key()) {
            continue;
        }

        for (position, candidate) in foreign.iter().enumerate() {
            let Some(target) = candidate.get_path(&spec.connect_to_field) else {
                continue;
            };
            if target.is_document() {
                return Err(QueryError::invalid_graph_field(
                    &spec.connect_to_field,
                    "Document",
                ));
            }
            if !connects(&target, &value) || !matched.insert(position) {
                continue;
            }

            let mut hit = candidate.clone();
            if let Some(field) = &spec.depth_field {
                hit.set_path(field, Value::Int(depth as i64));
            }
            results.push(Value::Document(hit));

            if let Some(next) = candidate.get_path(&spec.connect_from_field) {
                for next_value in graph_values(next, &spec.connect_from_field)? {
                    frontier.push_back((next_value, depth + 1));
                }
            }
        }
    }

    Ok(results)
}

/// Flatten a start or connect-from value into the values to follow.
fn graph_values(value: Value, field: &str) -> QueryResult<Vec<Value>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Document(_) => Err(QueryError::invalid_graph_field(field, "Document")),
        Value::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.extend(graph_values(item, field)?);
            }
            Ok(values)
        }
        other => Ok(vec![other]),
    }
}

/// Join equality: an array target matches when any element equals the value.
fn connects(target: &Value, value: &Value) -> bool {
    match target {
        Value::Array(items) => items.iter().any(|item| item.loosely_equals(value)),
        other => other.loosely_equals(value),
    }
}

/// Compare two sort values.
///
/// Numbers come first, then every other non-null value, then null and missing
/// values. The rank holds in both directions; only values of the same rank are
/// compared with [`Value::cmp_sortable`], reversed for descending keys.
pub fn compare_sort_values(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    let rank = sort_rank(a).cmp(&sort_rank(b));
    if rank != Ordering::Equal || a.is_null() {
        return rank;
    }
    let ord = a.cmp_sortable(b);
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

fn sort_rank(value: &Value) -> u8 {
    if value.is_number() {
        0
    } else if value.is_null() {
        2
    } else {
        1
    }
}
