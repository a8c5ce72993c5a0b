use docmatch::query::{parse_object_json, parse_query_json};
use docmatch::{QueryError, matches};

#[test]
fn json_query_with_pattern_and_sentinel() {
    let q = parse_query_json(
        r#"{
            "$and": {
                "$match": {"name": {"$regularExpression": {"pattern": "^al", "options": "i"}}},
                "$equal": {"deleted": {"$undefined": true}}
            }
        }"#,
    )
    .unwrap();
    let alice = parse_object_json(r#"{"name": "Alice", "age": 30}"#).unwrap();
    let bob = parse_object_json(r#"{"name": "Bob"}"#).unwrap();
    let gone = parse_object_json(r#"{"name": "Alan", "deleted": true}"#).unwrap();
    assert!(matches(&q, &alice).unwrap());
    assert!(!matches(&q, &bob).unwrap());
    assert!(!matches(&q, &gone).unwrap());
}

#[test]
fn json_numbers_compare_by_value() {
    let q = parse_query_json(r#"{"$gt": {"score": 2.5}, "$equal": {"rank": 3.0}}"#).unwrap();
    let obj = parse_object_json(r#"{"score": 3, "rank": 3}"#).unwrap();
    assert!(matches(&q, &obj).unwrap());
}

#[test]
fn top_level_must_be_an_object() {
    assert!(matches!(parse_object_json("\"x\""), Err(QueryError::NotAnObject("string"))));
    assert!(matches!(parse_query_json("not json"), Err(QueryError::Json(_))));
}
