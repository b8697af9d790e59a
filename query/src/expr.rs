//! Expressions and predicates.
//!
//! [`Expr`] computes a value from a document (`"$stats.tot"`, `$add`, `$cond`
//! and friends). [`Predicate`] decides whether a document passes a `$match`.
//! Arithmetic over a null or missing operand yields null; arithmetic over a
//! non-numeric operand is a type error.

use std::cmp::Ordering;

use dex_core::{Document, Value};

use crate::{QueryError, QueryResult};

/// A value-producing expression evaluated against one document.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Dotted field path; missing resolves to null.
    Field(String),
    Literal(Value),
    Add(Vec<Expr>),
    Subtract(Box<Expr>, Box<Expr>),
    Multiply(Vec<Expr>),
    Divide(Box<Expr>, Box<Expr>),
    /// Round to a number of decimal places.
    Round(Box<Expr>, u32),
    Cond {
        condition: Box<Predicate>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Length of an array.
    Size(Box<Expr>),
    /// Array element by index; negative indexes count from the end.
    ArrayElemAt(Box<Expr>, i64),
    /// Build a document from named sub-expressions.
    Object(Vec<(String, Expr)>),
}

impl Expr {
    pub fn field(path: impl Into<String>) -> Self {
        Expr::Field(path.into())
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn null() -> Self {
        Expr::Literal(Value::Null)
    }

    pub fn add(operands: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Add(operands.into_iter().collect())
    }

    pub fn subtract(left: Expr, right: Expr) -> Self {
        Expr::Subtract(Box::new(left), Box::new(right))
    }

    pub fn multiply(operands: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Multiply(operands.into_iter().collect())
    }

    pub fn divide(dividend: Expr, divisor: Expr) -> Self {
        Expr::Divide(Box::new(dividend), Box::new(divisor))
    }

    pub fn round(expr: Expr, places: u32) -> Self {
        Expr::Round(Box::new(expr), places)
    }

    pub fn cond(condition: Predicate, then: Expr, otherwise: Expr) -> Self {
        Expr::Cond {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn size(expr: Expr) -> Self {
        Expr::Size(Box::new(expr))
    }

    pub fn array_elem_at(expr: Expr, index: i64) -> Self {
        Expr::ArrayElemAt(Box::new(expr), index)
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Expr::Object(fields.into_iter().map(|(k, e)| (k.into(), e)).collect())
    }

    /// Evaluate against a document.
    pub fn eval(&self, doc: &Document) -> QueryResult<Value> {
        match self {
            Expr::Field(path) => Ok(doc.resolve(path)),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Add(operands) => {
                let Some(values) = numeric_operands("$add", operands.iter(), doc)? else {
                    return Ok(Value::Null);
                };
                Ok(values.iter().fold(Value::Int(0), |acc, v| {
                    combine(&acc, v, i64::checked_add, |a, b| a + b)
                }))
            }
            Expr::Multiply(operands) => {
                let Some(values) = numeric_operands("$multiply", operands.iter(), doc)? else {
                    return Ok(Value::Null);
                };
                Ok(values.iter().fold(Value::Int(1), |acc, v| {
                    combine(&acc, v, i64::checked_mul, |a, b| a * b)
                }))
            }
            Expr::Subtract(left, right) => {
                let operands = [left.as_ref(), right.as_ref()];
                let Some(values) = numeric_operands("$subtract", operands, doc)? else {
                    return Ok(Value::Null);
                };
                Ok(combine(&values[0], &values[1], i64::checked_sub, |a, b| a - b))
            }
            Expr::Divide(dividend, divisor) => {
                let operands = [dividend.as_ref(), divisor.as_ref()];
                let Some(values) = numeric_operands("$divide", operands, doc)? else {
                    return Ok(Value::Null);
                };
                let a = values[0].as_number().unwrap_or_default();
                let b = values[1].as_number().unwrap_or_default();
                if b == 0.0 {
                    return Err(QueryError::type_error("$divide by zero"));
                }
                Ok(Value::Float(a / b))
            }
            Expr::Round(expr, places) => match expr.eval(doc)? {
                Value::Null => Ok(Value::Null),
                Value::Int(i) => Ok(Value::Int(i)),
                Value::Float(f) => {
                    let factor = 10f64.powi(*places as i32);
                    Ok(Value::Float((f * factor).round() / factor))
                }
                other => Err(not_numeric("$round", &other)),
            },
            Expr::Cond {
                condition,
                then,
                otherwise,
            } => {
                if condition.evaluate(doc)? {
                    then.eval(doc)
                } else {
                    otherwise.eval(doc)
                }
            }
            Expr::Size(expr) => match expr.eval(doc)? {
                Value::Array(items) => Ok(Value::Int(items.len() as i64)),
                Value::Null => Ok(Value::Null),
                other => Err(QueryError::type_error(format!(
                    "$size requires an array, not {}",
                    other.type_name()
                ))),
            },
            Expr::ArrayElemAt(expr, index) => match expr.eval(doc)? {
                Value::Array(items) => {
                    let len = items.len() as i64;
                    let pos = if *index < 0 { len + index } else { *index };
                    if pos < 0 || pos >= len {
                        return Ok(Value::Null);
                    }
                    Ok(items.into_iter().nth(pos as usize).unwrap_or(Value::Null))
                }
                Value::Null => Ok(Value::Null),
                other => Err(QueryError::type_error(format!(
                    "$arrayElemAt requires an array, not {}",
                    other.type_name()
                ))),
            },
            Expr::Object(fields) => {
                let mut out = Document::new();
                for (name, expr) in fields {
                    out.insert(name.as_str(), expr.eval(doc)?);
                }
                Ok(Value::Document(out))
            }
        }
    }
}

/// Evaluate arithmetic operands. `None` means at least one was null.
fn numeric_operands<'a>(
    op: &str,
    operands: impl IntoIterator<Item = &'a Expr>,
    doc: &Document,
) -> QueryResult<Option<Vec<Value>>> {
    let mut values = Vec::new();
    for operand in operands {
        values.push(operand.eval(doc)?);
    }
    if values.iter().any(Value::is_null) {
        return Ok(None);
    }
    if let Some(bad) = values.iter().find(|v| !v.is_number()) {
        return Err(not_numeric(op, bad));
    }
    Ok(Some(values))
}

fn not_numeric(op: &str, value: &Value) -> QueryError {
    QueryError::type_error(format!(
        "{} only supports numeric types, not {}",
        op,
        value.type_name()
    ))
}

/// Integer arithmetic while both sides are Int and nothing overflows,
/// float arithmetic otherwise.
fn combine(
    a: &Value,
    b: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Value {
    let as_float = || {
        Value::Float(float_op(
            a.as_number().unwrap_or_default(),
            b.as_number().unwrap_or_default(),
        ))
    };
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => int_op(*x, *y).map(Value::Int).unwrap_or_else(as_float),
        _ => as_float(),
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CmpOp {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Gte => ord != Ordering::Less,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Lte => ord != Ordering::Greater,
        }
    }
}

/// A document filter.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Compare a field against a constant.
    Compare {
        path: String,
        op: CmpOp,
        value: Value,
    },
    /// Field equals any of the listed values.
    In { path: String, values: Vec<Value> },
    /// Field presence (a present null counts as present).
    Exists { path: String, exists: bool },
    /// Field is missing or null.
    IsNull(String),
    /// Compare two expressions of the same document.
    ExprCompare { left: Expr, op: CmpOp, right: Expr },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    fn compare(path: impl Into<String>, op: CmpOp, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            path: path.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CmpOp::Eq, value)
    }

    pub fn ne(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CmpOp::Ne, value)
    }

    pub fn gt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CmpOp::Gt, value)
    }

    pub fn gte(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CmpOp::Gte, value)
    }

    pub fn lt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CmpOp::Lt, value)
    }

    pub fn lte(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, CmpOp::Lte, value)
    }

    pub fn is_in<V: Into<Value>>(path: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::In {
            path: path.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn exists(path: impl Into<String>, exists: bool) -> Self {
        Predicate::Exists {
            path: path.into(),
            exists,
        }
    }

    pub fn is_null(path: impl Into<String>) -> Self {
        Predicate::IsNull(path.into())
    }

    pub fn expr(left: Expr, op: CmpOp, right: Expr) -> Self {
        Predicate::ExprCompare { left, op, right }
    }

    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::And(predicates.into_iter().collect())
    }

    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Or(predicates.into_iter().collect())
    }

    pub fn not(predicate: Predicate) -> Self {
        Predicate::Not(Box::new(predicate))
    }

    /// Decide whether `doc` passes.
    pub fn evaluate(&self, doc: &Document) -> QueryResult<bool> {
        match self {
            Predicate::Compare { path, op, value } => {
                Ok(field_matches(doc.get_path(path).as_ref(), *op, value))
            }
            Predicate::In { path, values } => {
                let found = doc.get_path(path);
                Ok(values
                    .iter()
                    .any(|v| field_matches(found.as_ref(), CmpOp::Eq, v)))
            }
            Predicate::Exists { path, exists } => Ok(doc.get_path(path).is_some() == *exists),
            Predicate::IsNull(path) => Ok(doc.resolve(path).is_null()),
            Predicate::ExprCompare { left, op, right } => {
                let l = left.eval(doc)?;
                let r = right.eval(doc)?;
                Ok(match op {
                    CmpOp::Eq => l.loosely_equals(&r),
                    CmpOp::Ne => !l.loosely_equals(&r),
                    _ => ordered_compare(&l, *op, &r),
                })
            }
            Predicate::And(predicates) => {
                for p in predicates {
                    if !p.evaluate(doc)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Predicate::Or(predicates) => {
                for p in predicates {
                    if p.evaluate(doc)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Predicate::Not(inner) => Ok(!inner.evaluate(doc)?),
        }
    }
}

/// Match a resolved field against a constant. Array fields match when any
/// element does; equality with null also matches a missing field.
fn field_matches(found: Option<&Value>, op: CmpOp, target: &Value) -> bool {
    match op {
        CmpOp::Eq => field_equals(found, target),
        CmpOp::Ne => !field_equals(found, target),
        _ => match found {
            None | Some(Value::Null) => false,
            Some(Value::Array(items)) => items.iter().any(|v| ordered_compare(v, op, target)),
            Some(v) => ordered_compare(v, op, target),
        },
    }
}

fn field_equals(found: Option<&Value>, target: &Value) -> bool {
    match found {
        None => target.is_null(),
        Some(Value::Array(items)) => {
            items.iter().any(|v| v.loosely_equals(target))
                || Value::Array(items.clone()).loosely_equals(target)
        }
        Some(v) => v.loosely_equals(target),
    }
}

/// Ordering comparisons only hold between values of the same kind.
fn ordered_compare(a: &Value, op: CmpOp, b: &Value) -> bool {
    let comparable = match (a, b) {
        (Value::Null, _) | (_, Value::Null) => false,
        _ if a.is_number() && b.is_number() => true,
        _ => a.type_name() == b.type_name(),
    };
    comparable && op.holds(a.cmp_sortable(b))
}
