//! Key-order normalization for JSON values.
//!
//! Two profiles that differ only in object field order canonicalize to the
//! same value, so their serialized snapshots diff cleanly. Array order is
//! meaningful and is never touched.

use serde_json::{Map, Value};

/// Return a copy of `value` with every object's keys sorted lexicographically.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
