//! Property-based tests for the model engine invariants.
//!
//! - Enforcement atomicity: a mismatched assignment never changes state.
//! - Merge shadowing: derived entries always win, non-shadowed base entries
//!   always remain visible, and the inputs are never mutated.

use std::collections::BTreeMap;

use proptest::prelude::*;
use replica_model::{Context, Definition, PropertySpec, merge_entries};
use serde_json::json;

fn non_string_value() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(|b| json!(b)),
        prop::collection::vec(any::<i64>(), 0..4).prop_map(|v| json!(v)),
    ]
}

fn non_number_value() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        "[a-z]{0,12}".prop_map(|s| json!(s)),
        any::<bool>().prop_map(|b| json!(b)),
    ]
}

fn key_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,6}", 0..8)
        .prop_map(|keys| keys.into_iter().collect())
}

mod enforcement_properties {
    use super::*;

    proptest! {
        /// A mismatched write fails and leaves the stored value untouched.
        #[test]
        fn string_property_rejects_non_strings(initial in "[a-z]{1,12}", bad in non_string_value()) {
            let context = Context::new();
            let def = Definition::builder("probe")
                .property("field", PropertySpec::string())
                .build();
            let instance = def.create(&context, json!({"field": initial})).unwrap();

            prop_assert!(instance.set("field", bad).is_err());
            prop_assert_eq!(instance.get_str("field"), Some(initial));
            prop_assert_eq!(instance.revisions("field"), 1);
        }

        #[test]
        fn number_property_rejects_non_numbers(initial in any::<i64>(), bad in non_number_value()) {
            let context = Context::new();
            let def = Definition::builder("probe")
                .property("field", PropertySpec::number())
                .build();
            let instance = def.create(&context, json!({"field": initial})).unwrap();

            prop_assert!(instance.set("field", bad).is_err());
            prop_assert_eq!(instance.get_f64("field"), Some(initial as f64));
        }

        /// Matching writes always land, whatever the starting state.
        #[test]
        fn string_property_accepts_strings(values in prop::collection::vec("[a-z]{0,12}", 1..5)) {
            let context = Context::new();
            let def = Definition::builder("probe")
                .property("field", PropertySpec::string())
                .build();
            let instance = def.create(&context, json!({})).unwrap();

            for value in &values {
                prop_assert!(instance.set("field", value.as_str()).is_ok());
            }
            prop_assert_eq!(instance.get_str("field"), values.last().cloned());
            prop_assert_eq!(instance.revisions("field"), values.len());
        }
    }
}

mod merge_properties {
    use super::*;

    proptest! {
        /// Derived keys always win; base-only keys always survive.
        #[test]
        fn shadowing_holds_for_arbitrary_dictionaries(
            base_keys in key_set(),
            derived_keys in key_set(),
        ) {
            let base: BTreeMap<String, &str> =
                base_keys.iter().map(|k| (k.clone(), "base")).collect();
            let derived: BTreeMap<String, &str> =
                derived_keys.iter().map(|k| (k.clone(), "derived")).collect();

            let merged = merge_entries(&derived, &base);

            for key in &derived_keys {
                prop_assert_eq!(merged.get(key), Some(&"derived"));
            }
            for key in &base_keys {
                if !derived.contains_key(key) {
                    prop_assert_eq!(merged.get(key), Some(&"base"));
                }
            }
            prop_assert_eq!(
                merged.len(),
                base.keys().filter(|k| !derived.contains_key(*k)).count()
                    + derived.len()
            );
        }

        /// Merging is idempotent over the derived side.
        #[test]
        fn remerging_the_result_changes_nothing(
            base_keys in key_set(),
            derived_keys in key_set(),
        ) {
            let base: BTreeMap<String, u8> =
                base_keys.iter().map(|k| (k.clone(), 0)).collect();
            let derived: BTreeMap<String, u8> =
                derived_keys.iter().map(|k| (k.clone(), 1)).collect();

            let once = merge_entries(&derived, &base);
            let twice = merge_entries(&derived, &once);
            prop_assert_eq!(once, twice);
        }
    }
}
