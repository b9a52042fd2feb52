//! Rebuild nested values without sharing any container with the input.
//!
//! Arrays are turned into objects keyed by their stringified indices. This
//! mirrors the long-standing behavior callers depend on and is kept as is.

use serde_json::{Map, Value};

/// Extract a reference-independent copy of `value`.
///
/// - arrays become objects keyed `"0"`, `"1"`, ... in element order;
/// - objects are rebuilt with the same keys;
/// - every other value is copied through unchanged.
///
/// The result is always an object: a top-level value that is neither an array
/// nor an object yields an empty object.
///
/// Traversal is recursive and unbounded in depth. `serde_json::Value` owns its
/// children, so cyclic input cannot be constructed; only extremely deep input
/// can exhaust the stack.
pub fn extract_data(value: &Value) -> Map<String, Value> {
    let mut result = Map::new();
    if let Value::Object(extracted) = recursive_extract(value) {
        result.extend(extracted);
    }
    result
}

fn recursive_extract(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Object(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), recursive_extract(item)))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, item)| (key.clone(), recursive_extract(item)))
                .collect(),
        ),
        leaf => leaf.clone(),
    }
}
