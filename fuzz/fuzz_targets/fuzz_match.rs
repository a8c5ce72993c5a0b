#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(query) = docmatch::query::parse_query_json(s) {
            // A few objects with mixed shapes to exercise every predicate
            let objects = [
                bson::doc!{"a": 1, "b": 2, "name": "x"},
                bson::doc!{"a": 10.5, "b": -5, "name": "y", "tags": ["x", "y"], "nested": {"z": 3}},
                bson::doc!{}
            ];
            for o in &objects {
                let _ = docmatch::matches(&query, o);
            }
        }
    }
});
