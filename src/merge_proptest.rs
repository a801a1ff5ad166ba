//! Property-based tests for the deep merge engine.
//!
//! These tests use proptest to generate arbitrary JSON trees and verify that
//! the merge laws hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::merge::deep_merge;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-e]{1,3}", inner, 0..4)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    fn arb_object() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-e]{1,3}", arb_json(), 0..5)
            .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>()))
    }

    proptest! {
        /// Property: merging an object with a clone of itself leaves it unchanged
        #[test]
        fn self_merge_is_idempotent(x in arb_object()) {
            let mut target = x.clone();
            deep_merge(&mut target, &x.clone());
            prop_assert_eq!(target, x);
        }

        /// Property: an array in the source always replaces the target value
        #[test]
        fn arrays_replace_wholesale(
            base in arb_object(),
            items in prop::collection::vec(arb_json(), 0..5),
        ) {
            let mut target = base;
            let source = json!({"list": items.clone()});
            deep_merge(&mut target, &source);
            prop_assert_eq!(&target["list"], &Value::Array(items));
        }

        /// Property: keys absent from the source keep their target value
        #[test]
        fn untouched_keys_are_preserved(base in arb_object(), source in arb_object()) {
            let mut target = base.clone();
            deep_merge(&mut target, &source);

            let base_map = base.as_object().unwrap();
            let source_map = source.as_object().unwrap();
            for (key, value) in base_map {
                if !source_map.contains_key(key) {
                    prop_assert_eq!(&target[key], value);
                }
            }
        }

        /// Property: after a merge every scalar or array of the source is present verbatim
        #[test]
        fn source_leaves_win(base in arb_object(), source in arb_object()) {
            let mut target = base;
            deep_merge(&mut target, &source);

            for (key, value) in source.as_object().unwrap() {
                if !value.is_object() {
                    prop_assert_eq!(&target[key], value);
                } else {
                    prop_assert!(target[key].is_object());
                }
            }
        }

        /// Property: merging is deterministic
        #[test]
        fn merge_is_deterministic(base in arb_object(), source in arb_object()) {
            let mut first = base.clone();
            let mut second = base;
            deep_merge(&mut first, &source);
            deep_merge(&mut second, &source);
            prop_assert_eq!(first, second);
        }
    }
}
