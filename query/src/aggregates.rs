//! Accumulator computation for `$group`.
//!
//! Each group is the ordered slice of documents that share a key; an
//! accumulator reduces it to one output value.

use std::collections::HashSet;

use dex_core::{Document, Value};

use crate::expr::Expr;
use crate::stage::AccumulatorSpec;
use crate::QueryResult;

/// A group reducer.
#[derive(Debug, Clone)]
pub enum Accumulator {
    /// Numeric sum; non-numeric values are ignored.
    Sum(Expr),
    /// Number of documents in the group.
    Count,
    /// Value of the first document in stream order.
    First(Expr),
    /// Value of the last document in stream order.
    Last(Expr),
    /// Mean of the numeric values, null when there are none.
    Avg(Expr),
    Min(Expr),
    Max(Expr),
    /// All non-null values in stream order.
    Push(Expr),
    /// Distinct non-null values in first-seen order.
    AddToSet(Expr),
}

impl Accumulator {
    /// Operator name, for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Accumulator::Sum(_) => "$sum",
            Accumulator::Count => "$count",
            Accumulator::First(_) => "$first",
            Accumulator::Last(_) => "$last",
            Accumulator::Avg(_) => "$avg",
            Accumulator::Min(_) => "$min",
            Accumulator::Max(_) => "$max",
            Accumulator::Push(_) => "$push",
            Accumulator::AddToSet(_) => "$addToSet",
        }
    }

    /// Whether the result depends on the order documents arrive in.
    pub fn is_order_sensitive(&self) -> bool {
        matches!(self, Accumulator::First(_) | Accumulator::Last(_))
    }
}

/// Compute an accumulator over a group of documents.
pub fn compute_aggregate(spec: &AccumulatorSpec, group: &[Document]) -> QueryResult<Value> {
    match &spec.accumulator {
        Accumulator::Count => Ok(Value::Int(group.len() as i64)),
        Accumulator::Sum(expr) => compute_sum(expr, group),
        Accumulator::First(expr) => compute_edge(expr, group.first()),
        Accumulator::Last(expr) => compute_edge(expr, group.last()),
        Accumulator::Avg(expr) => compute_avg(expr, group),
        Accumulator::Min(expr) => compute_min_max(expr, group, std::cmp::Ordering::Less),
        Accumulator::Max(expr) => compute_min_max(expr, group, std::cmp::Ordering::Greater),
        Accumulator::Push(expr) => compute_push(expr, group, false),
        Accumulator::AddToSet(expr) => compute_push(expr, group, true),
    }
}

fn compute_sum(expr: &Expr, group: &[Document]) -> QueryResult<Value> {
    let mut int_sum = 0i64;
    let mut float_sum = 0.0f64;
    let mut has_float = false;

    for doc in group {
        match expr.eval(doc)? {
            Value::Int(i) => {
                if has_float {
                    float_sum += i as f64;
                } else {
                    match int_sum.checked_add(i) {
                        Some(sum) => int_sum = sum,
                        None => {
                            float_sum = int_sum as f64 + i as f64;
                            has_float = true;
                        }
                    }
                }
            }
            Value::Float(f) => {
                if !has_float {
                    float_sum = int_sum as f64;
                    has_float = true;
                }
                float_sum += f;
            }
            _ => {}
        }
    }

    if has_float {
        Ok(Value::Float(float_sum))
    } else {
        Ok(Value::Int(int_sum))
    }
}

fn compute_edge(expr: &Expr, doc: Option<&Document>) -> QueryResult<Value> {
    match doc {
        Some(doc) => expr.eval(doc),
        None => Ok(Value::Null),
    }
}

fn compute_avg(expr: &Expr, group: &[Document]) -> QueryResult<Value> {
    let mut sum = 0.0f64;
    let mut count = 0usize;

    for doc in group {
        if let Some(n) = expr.eval(doc)?.as_number() {
            sum += n;
            count += 1;
        }
    }

    if count == 0 {
        Ok(Value::Null)
    } else {
        Ok(Value::Float(sum / count as f64))
    }
}

fn compute_min_max(
    expr: &Expr,
    group: &[Document],
    keep: std::cmp::Ordering,
) -> QueryResult<Value> {
    let mut result: Option<Value> = None;

    for doc in group {
        let val = expr.eval(doc)?;
        if val.is_null() {
            continue;
        }
        result = match result {
            Some(current) if val.cmp_sortable(&current) != keep => Some(current),
            _ => Some(val),
        };
    }

    Ok(result.unwrap_or(Value::Null))
}

fn compute_push(expr: &Expr, group: &[Document], distinct: bool) -> QueryResult<Value> {
    let mut values = Vec::new();
    let mut seen = HashSet::new();

    for doc in group {
        let val = expr.eval(doc)?;
        if val.is_null() {
            continue;
        }
        if distinct && !seen.insert(val.canonical_key()) {
            continue;
        }
        values.push(val);
    }

    Ok(Value::Array(values))
}
