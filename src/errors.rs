use bson::Bson;
use std::fmt;
use thiserror::Error;

/// Which side of a leaf predicate failed its shape check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The target object's field value.
    Object,
    /// The operand supplied by the query.
    Definition,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => f.write_str("object"),
            Self::Definition => f.write_str("definition"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("{operator}: {side}: {reason}: {value}")]
    TypeMismatch { operator: String, side: Side, reason: String, value: String },
}

impl MatchError {
    /// Build a `TypeMismatch` for `operator`, rendering the offending value.
    /// `None` stands for a field missing from the object.
    pub fn type_mismatch(
        operator: &str,
        side: Side,
        reason: impl Into<String>,
        value: Option<&Bson>,
    ) -> Self {
        Self::TypeMismatch {
            operator: operator.to_owned(),
            side,
            reason: reason.into(),
            value: describe(value),
        }
    }

    /// The operator name the error is about.
    #[must_use]
    pub fn operator(&self) -> &str {
        match self {
            Self::UnknownOperator(name) => name,
            Self::TypeMismatch { operator, .. } => operator,
        }
    }

    /// The failing side for type mismatches; `None` for unknown operators.
    #[must_use]
    pub const fn side(&self) -> Option<Side> {
        match self {
            Self::UnknownOperator(_) => None,
            Self::TypeMismatch { side, .. } => Some(*side),
        }
    }
}

/// Errors raised while turning JSON text into query or object documents.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BSON: {0}")]
    Bson(String),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Plain-text rendering used in error messages: strings unquoted, absent as `undefined`.
pub(crate) fn describe(value: Option<&Bson>) -> String {
    match value {
        None | Some(Bson::Undefined) => "undefined".to_owned(),
        Some(Bson::String(s)) => s.clone(),
        Some(Bson::RegularExpression(re)) => {
            format!("/{}/{}", re.pattern.as_str(), re.options.as_str())
        }
        Some(other) => other.to_string(),
    }
}
