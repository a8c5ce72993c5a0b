use bson::{Document, doc};
use fake::{Fake, faker::name::en::Name};
use rand::Rng;
use std::time::Instant;

fn synthetic_objects(total: usize) -> Vec<Document> {
    let mut rng = rand::rng();
    (0..total)
        .map(|i| {
            let name: String = Name().fake();
            let value: f64 = rng.random_range(0.0..10_000.0);
            let flag: bool = rng.random();
            let second_tag = if flag { "beta" } else { "gamma" };
            doc! {
                "id": i64::try_from(i).unwrap_or(i64::MAX),
                "name": name,
                "value": value,
                "flag": flag,
                "tags": ["alpha", second_tag],
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let total = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let objects = synthetic_objects(total);
    let query = docmatch::query::parse_query_json(
        r#"{
            "$or": {
                "$and": {"$gt": {"value": 5000}, "$contain": {"tags": "beta"}},
                "$not": {"$match": {"name": {"$regularExpression": {"pattern": "^[A-M]", "options": ""}}}}
            }
        }"#,
    )?;

    let started = Instant::now();
    let mut hits = 0usize;
    for o in &objects {
        if docmatch::matches(&query, o)? {
            hits += 1;
        }
    }
    let elapsed = started.elapsed();
    println!(
        "{}",
        serde_json::json!({
            "bench": "match",
            "objects": total,
            "hits": hits,
            "elapsed_ms": u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        })
    );
    println!("{}", docmatch::query::telemetry::metrics_text());
    Ok(())
}
