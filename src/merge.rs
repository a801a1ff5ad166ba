//! JSON deep merge
//!
//! Merges override data into a target object over untyped `serde_json`
//! values, independent of any schema.
//!
//! ## Semantics
//!
//! For every key of the source object:
//!
//! - Arrays replace the target value outright. They are never merged by
//!   position, concatenated or deduplicated.
//! - Objects are merged recursively. If the target has no value at that key,
//!   or holds something other than an object, it is first replaced by an
//!   empty object (discarding a scalar or array previously there).
//! - Anything else (strings, numbers, booleans, `null`) overwrites the target.
//!
//! Inputs come from parsed files and therefore cannot be cyclic.
//!
//! ## Example
//!
//! ```
//! use cv_forge::merge::deep_merge;
//! use serde_json::json;
//!
//! let mut target = json!({"a": [1, 2, 3], "b": 1});
//! deep_merge(&mut target, &json!({"a": [1, 2]}));
//! assert_eq!(target, json!({"a": [1, 2], "b": 1}));
//! ```

use serde_json::{Map, Value as JsonValue};

/// Recursively merge `source` into `target`, returning `target`.
///
/// When `source` is not an object there is nothing to merge key by key and
/// `target` is left untouched. A non-object `target` receiving an object
/// source is replaced by an empty object first.
pub fn deep_merge<'a>(target: &'a mut JsonValue, source: &JsonValue) -> &'a mut JsonValue {
    let JsonValue::Object(source_map) = source else {
        return target;
    };

    if !target.is_object() {
        *target = JsonValue::Object(Map::new());
    }
    if let JsonValue::Object(target_map) = target {
        merge_maps(target_map, source_map);
    }
    target
}

/// Merge the keys of `source` into `target` following the module semantics.
pub fn merge_maps(target: &mut Map<String, JsonValue>, source: &Map<String, JsonValue>) {
    for (key, value) in source {
        match value {
            JsonValue::Object(source_child) => {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| JsonValue::Object(Map::new()));
                if !slot.is_object() {
                    *slot = JsonValue::Object(Map::new());
                }
                if let JsonValue::Object(target_child) = slot {
                    merge_maps(target_child, source_child);
                }
            }
            // Arrays and scalars both replace wholesale.
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
