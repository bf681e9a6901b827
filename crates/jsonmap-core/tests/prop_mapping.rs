//! Property-based tests for the mapping engine
//!
//! These tests verify invariants that should hold for every JSON document.

use jsonmap_core::engine::leaves;
use jsonmap_core::{all_rule, KeyPath, MapFn, MapFunction, Mapping, ValueMaps};
use proptest::prelude::*;
use serde_json::{Map, Value};

/// Strategy for generating scalar leaves
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

/// Strategy for generating nested documents with object roots
fn document_strategy() -> impl Strategy<Value = Value> {
    let tree = scalar_strategy().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            proptest::collection::vec(("[a-z]{1,6}", inner), 0..5)
                .prop_map(|members| Value::Object(members.into_iter().collect::<Map<_, _>>())),
        ]
    });
    proptest::collection::vec(("[a-z]{1,6}", tree), 0..6)
        .prop_map(|members| Value::Object(members.into_iter().collect()))
}

proptest! {
    #[test]
    fn prop_identity_map_copies_document(source in document_strategy()) {
        let result = MapFn::new(all_rule(), ValueMaps::none()).map(&source).unwrap();
        prop_assert_eq!(result, source);
    }

    #[test]
    fn prop_identity_transform_preserves_document(source in document_strategy()) {
        let mapping = Mapping::transform(all_rule(), ValueMaps::none());
        let result = mapping.apply(source.clone()).unwrap();
        prop_assert_eq!(result, source);
    }

    #[test]
    fn prop_map_never_mutates_source(source in document_strategy()) {
        let before = source.clone();
        let rename = |path: &KeyPath| path.child("moved");
        let _ = MapFn::new(rename, ValueMaps::none()).map(&source);
        prop_assert_eq!(source, before);
    }

    #[test]
    fn prop_flatten_then_unflatten_round_trips(source in document_strategy()) {
        let flatten = Mapping::map(|path: &KeyPath| KeyPath::from(vec![path.to_string()]), ValueMaps::none());
        let unflatten = Mapping::map(|path: &KeyPath| path.keys()[0].parse::<KeyPath>().ok(), ValueMaps::none());

        let flat = flatten.apply(source.clone()).unwrap();
        prop_assert_eq!(leaves(&flat).len(), leaves(&source).len());
        prop_assert_eq!(unflatten.apply(flat).unwrap(), source);
    }

    #[test]
    fn prop_skipping_every_value_yields_empty_tree(source in document_strategy()) {
        let mapping = Mapping::map(all_rule(), ValueMaps::one(|_: Value| None::<Value>));
        prop_assert_eq!(mapping.apply(source).unwrap(), Value::Object(Map::new()));
    }
}
