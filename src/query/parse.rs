use bson::{Bson, Document as BsonDocument};

use crate::errors::QueryError;

fn kind_of(val: &serde_json::Value) -> &'static str {
    match val {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Convert a `serde_json::Value` that must be an object into a `bson::Document`.
///
/// Extended JSON wrappers are honoured, so `{"$regularExpression": {...}}` becomes a
/// pattern object and `{"$undefined": true}` the absent sentinel.
///
/// # Errors
/// Returns [`QueryError::NotAnObject`] for non-object input and [`QueryError::Bson`]
/// when an extended JSON wrapper is malformed.
pub fn json_value_to_document(val: &serde_json::Value) -> Result<BsonDocument, QueryError> {
    if !val.is_object() {
        return Err(QueryError::NotAnObject(kind_of(val)));
    }
    match Bson::try_from(val.clone()) {
        Ok(Bson::Document(d)) => Ok(d),
        Ok(other) => Err(QueryError::Bson(format!("expected a document, got {other}"))),
        Err(e) => Err(QueryError::Bson(e.to_string())),
    }
}

/// Parse a JSON query document.
///
/// # Errors
/// Returns an error if the text is not JSON or not a top-level object.
pub fn parse_query_json(json: &str) -> Result<BsonDocument, QueryError> {
    let val: serde_json::Value = serde_json::from_str(json)?;
    json_value_to_document(&val)
}

/// Parse a JSON target object.
///
/// # Errors
/// Returns an error if the text is not JSON or not a top-level object.
pub fn parse_object_json(json: &str) -> Result<BsonDocument, QueryError> {
    let val: serde_json::Value = serde_json::from_str(json)?;
    json_value_to_document(&val)
}
