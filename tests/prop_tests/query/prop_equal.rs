use bson::{Bson, Document};
use docmatch::matches;
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Bson> {
    prop_oneof![
        any::<i32>().prop_map(Bson::Int32),
        any::<i64>().prop_map(Bson::Int64),
        (-1.0e6f64..1.0e6f64).prop_map(Bson::Double),
        Just(Bson::Double(f64::NAN)),
        "[a-z]{0,8}".prop_map(Bson::String),
        any::<bool>().prop_map(Bson::Boolean),
        Just(Bson::Null),
    ]
}

fn composite() -> impl Strategy<Value = Bson> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 1..4).prop_map(Bson::Array),
            proptest::collection::btree_map("[a-z]{1,4}", inner, 1..4).prop_map(|m| {
                Bson::Document(m.into_iter().collect::<Document>())
            }),
        ]
    })
}

fn single(field: &str, value: Bson) -> Document {
    let mut d = Document::new();
    d.insert(field, value);
    d
}

fn equal_query(value: Bson) -> Document {
    single("$equal", Bson::Document(single("foo", value)))
}

// Replace the first leaf found depth-first with a value that cannot equal it.
fn mutate_first_leaf(v: &mut Bson) -> bool {
    match v {
        Bson::Array(items) => items.iter_mut().any(mutate_first_leaf),
        Bson::Document(d) => {
            let keys: Vec<String> = d.keys().cloned().collect();
            keys.iter().any(|k| d.get_mut(k).is_some_and(mutate_first_leaf))
        }
        leaf => {
            *leaf = Bson::String("\u{0}mutated".into());
            true
        }
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        failure_persistence: Some(Box::new(proptest::test_runner::FileFailurePersistence::WithSource("proptest-regressions"))),
        cases: 64,
        .. proptest::test_runner::Config::default()
    })]
    #[test]
    fn prop_equal_is_reflexive_for_composites(v in composite()) {
        let obj = single("foo", v.clone());
        prop_assert!(matches(&equal_query(v), &obj).unwrap());
    }

    #[test]
    fn prop_mutated_copy_is_not_equal(v in composite()) {
        let obj = single("foo", v.clone());
        let mut changed = v;
        prop_assume!(mutate_first_leaf(&mut changed));
        prop_assert!(!matches(&equal_query(changed), &obj).unwrap());
    }

    #[test]
    fn prop_empty_query_matches_everything(v in composite()) {
        prop_assert!(matches(&Document::new(), &single("foo", v)).unwrap());
    }
}
