use bson::{Bson, Document, doc};
use docmatch::errors::Side;
use docmatch::query::{Fold, registry};
use docmatch::{MatchError, Operator, Registry, matches};

#[test]
fn custom_predicate_in_injected_registry() {
    let reg = Registry::builtin().with(
        "$exists",
        Operator::predicate(|field, wanted, object| match wanted {
            Bson::Boolean(b) => Ok(object.contains_key(field) == *b),
            other => Err(MatchError::type_mismatch("$exists", Side::Definition, "not a boolean", Some(other))),
        }),
    );
    let q = doc! {"$or": {"$exists": {"foo": true}, "$equal": {"bar": 1}}};
    assert!(reg.matches(&q, &doc! {"foo": 0}).unwrap());
    assert!(!reg.matches(&q, &doc! {"bar": 2}).unwrap());
    let err = reg.matches(&doc! {"$exists": {"foo": 1}}, &doc! {}).unwrap_err();
    assert_eq!(err.to_string(), "$exists: definition: not a boolean: 1");
    // The process-wide registry is untouched.
    assert!(matches(&doc! {"$exists": {"foo": true}}, &doc! {"foo": 0}).is_err());
}

#[test]
fn override_builtin_in_injected_registry() {
    let reg = Registry::builtin().with("$equal", Operator::predicate(|_, _, _| Ok(true)));
    assert!(reg.matches(&doc! {"$equal": {"foo": "x"}}, &doc! {"foo": "y"}).unwrap());
}

#[test]
fn custom_any_combinator() {
    // `$some` behaves like `$or` without touching evaluator code
    let reg = Registry::builtin().with(
        "$some",
        Operator::combinator(Fold::Any, |key, value, object, evaluate| evaluate(key, value, object)),
    );
    let q = doc! {"$some": {"$equal": {"a": 1}, "$lt": {"b": 0}}};
    assert!(reg.matches(&q, &doc! {"a": 1, "b": 5}).unwrap());
    assert!(!reg.matches(&q, &doc! {"a": 2, "b": 5}).unwrap());
}

#[test]
fn empty_registry_knows_nothing() {
    let reg = Registry::empty();
    assert_eq!(
        reg.matches(&doc! {}, &doc! {}).unwrap_err(),
        MatchError::UnknownOperator("$and".into())
    );
}

#[test]
fn global_registration_is_visible_to_matches() {
    let name = "$it_global_always";
    let mut q = Document::new();
    q.insert(name, doc! {"anything": 1});
    registry::register(name, Operator::predicate(|_, _, _| Ok(true)));
    assert!(registry::list().contains(&name.to_string()));
    assert!(matches(&q, &doc! {}).unwrap());
    assert!(registry::unregister(name).is_some());
    let err = matches(&q, &doc! {}).unwrap_err();
    assert_eq!(err, MatchError::UnknownOperator(name.into()));
}

#[test]
fn concurrent_matches_share_the_registry() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let q = doc! {"$gt": {"n": 3}};
                matches(&q, &doc! {"n": i}).unwrap()
            })
        })
        .collect();
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![false, false, false, false, true, true, true, true]);
}
