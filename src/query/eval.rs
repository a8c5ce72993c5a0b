use bson::{Bson, Document as BsonDocument};
use std::time::Instant;

use super::registry::{self, Operator, Registry};
use super::telemetry;
use crate::errors::{MatchError, Side};

/// The implicit operator wrapped around every query document.
pub const ROOT_OPERATOR: &str = super::operators::AND;

/// Match `object` against `query` using the process-wide registry.
///
/// The query root is a conjunction, so an empty query matches every object.
///
/// # Errors
/// `UnknownOperator` when a key in operator position is not registered,
/// `TypeMismatch` when a leaf predicate rejects a field value or operand.
pub fn matches(query: &BsonDocument, object: &BsonDocument) -> Result<bool, MatchError> {
    let registry = registry::global();
    matches_with(&registry, query, object)
}

/// Same as [`matches`] with an explicit registry.
///
/// # Errors
/// See [`matches`].
pub fn matches_with(
    registry: &Registry,
    query: &BsonDocument,
    object: &BsonDocument,
) -> Result<bool, MatchError> {
    let started = Instant::now();
    let result = lookup(registry, ROOT_OPERATOR)
        .and_then(|op| evaluate_clauses(registry, ROOT_OPERATOR, op, query, object));
    telemetry::record_match(&result, started.elapsed());
    match &result {
        Ok(b) => log::trace!(target: "docmatch::eval", "match => {b}"),
        Err(e) => log::debug!(target: "docmatch::eval", "match failed: {e}"),
    }
    result
}

/// Evaluate one operator over its body.
///
/// The operator is resolved before any clause is visited. Each `(key, value)`
/// clause of `body` is handed to it, and the outcomes are folded with the
/// operator's own [`Fold`](super::registry::Fold).
///
/// # Errors
/// See [`matches`]. A body that is not a document is a `TypeMismatch` on the
/// definition side.
pub fn evaluate(
    registry: &Registry,
    operator: &str,
    body: &Bson,
    object: &BsonDocument,
) -> Result<bool, MatchError> {
    let op = lookup(registry, operator)?;
    let Bson::Document(clauses) = body else {
        return Err(MatchError::type_mismatch(operator, Side::Definition, "not a document", Some(body)));
    };
    evaluate_clauses(registry, operator, op, clauses, object)
}

fn lookup<'r>(registry: &'r Registry, operator: &str) -> Result<&'r Operator, MatchError> {
    registry.get(operator).ok_or_else(|| MatchError::UnknownOperator(operator.to_owned()))
}

// Every clause runs even once the fold is decided, so a malformed clause
// never hides behind an earlier result.
fn evaluate_clauses(
    registry: &Registry,
    operator: &str,
    op: &Operator,
    clauses: &BsonDocument,
    object: &BsonDocument,
) -> Result<bool, MatchError> {
    let recurse = |key: &str, value: &Bson, object: &BsonDocument| -> Result<bool, MatchError> {
        evaluate(registry, key, value, object)
    };
    let mut outcomes = Vec::with_capacity(clauses.len());
    for (key, value) in clauses {
        let key = key.as_str();
        let outcome = match op {
            Operator::Predicate(func) => func(key, value, object)?,
            Operator::Combinator { func, .. } => func(key, value, object, &recurse)?,
        };
        telemetry::record_clause();
        crate::eval_trace!("{operator} {key} => {outcome}");
        outcomes.push(outcome);
    }
    Ok(op.fold().combine(outcomes))
}
