//! Built-in operators.
//!
//! Combinators recurse through the `evaluate` capability they are handed, using
//! the clause key as the next operator name. Leaf predicates test one field of
//! the target object and never recurse.

use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::registry::{Evaluate, Fold, Operator};
use super::values::{compare_numbers, compile_regex, deep_equal, field_equals, is_number};
use crate::errors::{MatchError, Side};

pub const AND: &str = "$and";
pub const OR: &str = "$or";
pub const NOT: &str = "$not";
pub const EQUAL: &str = "$equal";
pub const CONTAIN: &str = "$contain";
pub const MATCH: &str = "$match";
pub const GT: &str = "$gt";
pub const LT: &str = "$lt";

pub(crate) fn builtin() -> Vec<(&'static str, Operator)> {
    vec![
        (AND, Operator::combinator(Fold::All, and)),
        (OR, Operator::combinator(Fold::Any, or)),
        (NOT, Operator::combinator(Fold::All, not)),
        (EQUAL, Operator::predicate(equal)),
        (CONTAIN, Operator::predicate(contain)),
        (MATCH, Operator::predicate(regex_match)),
        (GT, Operator::predicate(gt)),
        (LT, Operator::predicate(lt)),
    ]
}

fn and(key: &str, value: &Bson, object: &BsonDocument, evaluate: &Evaluate<'_>) -> Result<bool, MatchError> {
    evaluate(key, value, object)
}

// Same pass-through as `$and`; the disjunction comes from `Fold::Any`.
fn or(key: &str, value: &Bson, object: &BsonDocument, evaluate: &Evaluate<'_>) -> Result<bool, MatchError> {
    evaluate(key, value, object)
}

fn not(key: &str, value: &Bson, object: &BsonDocument, evaluate: &Evaluate<'_>) -> Result<bool, MatchError> {
    evaluate(key, value, object).map(|b| !b)
}

fn equal(field: &str, expected: &Bson, object: &BsonDocument) -> Result<bool, MatchError> {
    Ok(field_equals(object.get(field), expected))
}

fn contain(field: &str, item: &Bson, object: &BsonDocument) -> Result<bool, MatchError> {
    match object.get(field) {
        Some(Bson::String(haystack)) => {
            Ok(matches!(item, Bson::String(needle) if haystack.contains(needle.as_str())))
        }
        Some(Bson::Array(items)) => Ok(items.iter().any(|x| deep_equal(x, item))),
        other => Err(MatchError::type_mismatch(CONTAIN, Side::Object, "not a string or array", other)),
    }
}

/// `$match`: the field must be a string and the operand a BSON regular expression.
///
/// Patterns go through the `regex` crate, which has no look-around or
/// backreferences; such patterns fail as a definition-side `TypeMismatch`
/// with reason `not a valid regex`.
fn regex_match(field: &str, pattern: &Bson, object: &BsonDocument) -> Result<bool, MatchError> {
    let text = match object.get(field) {
        Some(Bson::String(s)) => s,
        other => return Err(MatchError::type_mismatch(MATCH, Side::Object, "not a string", other)),
    };
    let Bson::RegularExpression(re) = pattern else {
        return Err(MatchError::type_mismatch(MATCH, Side::Definition, "not a regex", Some(pattern)));
    };
    let compiled = compile_regex(re).map_err(|e| {
        log::debug!(target: "docmatch::eval", "$match: rejected pattern: {e}");
        MatchError::type_mismatch(MATCH, Side::Definition, "not a valid regex", Some(pattern))
    })?;
    Ok(compiled.is_match(text))
}

fn gt(field: &str, threshold: &Bson, object: &BsonDocument) -> Result<bool, MatchError> {
    numeric(GT, field, threshold, object).map(|ord| ord == Some(Ordering::Greater))
}

fn lt(field: &str, threshold: &Bson, object: &BsonDocument) -> Result<bool, MatchError> {
    numeric(LT, field, threshold, object).map(|ord| ord == Some(Ordering::Less))
}

// Object side is checked before the operand; `None` only for NaN.
fn numeric(
    operator: &str,
    field: &str,
    threshold: &Bson,
    object: &BsonDocument,
) -> Result<Option<Ordering>, MatchError> {
    let actual = object.get(field);
    let Some(actual) = actual.filter(|v| is_number(v)) else {
        return Err(MatchError::type_mismatch(operator, Side::Object, "not a number", actual));
    };
    if !is_number(threshold) {
        return Err(MatchError::type_mismatch(
            operator,
            Side::Definition,
            "not a number",
            Some(threshold),
        ));
    }
    Ok(compare_numbers(actual, threshold))
}
