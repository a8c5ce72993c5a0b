use bson::Bson;
use docmatch::errors::{MatchError, QueryError, Side};

#[test]
fn test_unknown_operator_display() {
    let e = MatchError::UnknownOperator("$foo".to_string());
    assert_eq!(format!("{e}"), "Unknown operator: $foo");
}

#[test]
fn test_type_mismatch_display() {
    let e = MatchError::type_mismatch("$contain", Side::Object, "not a string or array", Some(&Bson::Int32(5)));
    assert_eq!(format!("{e}"), "$contain: object: not a string or array: 5");
}

#[test]
fn test_side_display() {
    assert_eq!(Side::Object.to_string(), "object");
    assert_eq!(Side::Definition.to_string(), "definition");
}

#[test]
fn test_query_error_display() {
    let e = QueryError::NotAnObject("array");
    assert_eq!(format!("{e}"), "expected a JSON object, found array");
}
