//! Recursive structural body matching.
//!
//! Walks expected against actual JSON depth-first with an explicit path
//! accumulator and returns a flat error list; a single call surfaces every
//! violation in one pass. Expected arrays use containment semantics: every
//! expected element must have some matching actual element, while extra
//! actual elements are never an error.

use crate::classify::is_array_selector;
use crate::selector::get_array_value;
use crate::value::{render, validate_value};
use serde_json::Value;

/// Validate an actual body against an expected body tree.
///
/// `path` labels errors; the empty path renders as `body`. Never panics and
/// never short-circuits.
pub fn validate_body(actual: Option<&Value>, expected: &Value, path: &str) -> Vec<String> {
    match expected {
        Value::Object(expected_map) => {
            let mut errors = Vec::new();
            for (key, expected_value) in expected_map {
                let resolved = resolve_key(actual, key);
                let child_path = extend_path(path, key);
                if expected_value.is_object() || expected_value.is_array() {
                    errors.extend(validate_body(resolved.as_ref(), expected_value, &child_path));
                } else if let Some(error) =
                    validate_value(resolved.as_ref(), expected_value, &child_path).error
                {
                    errors.push(error);
                }
            }
            errors
        }
        Value::Array(expected_items) => match actual {
            Some(Value::Array(actual_items)) => {
                validate_containment(actual_items, expected_items, path)
            }
            // A scalar (or absent) actual against an expected array falls
            // back to "one of" semantics.
            _ => validate_value(actual, expected, label(path))
                .error
                .into_iter()
                .collect(),
        },
        _ => validate_value(actual, expected, label(path))
            .error
            .into_iter()
            .collect(),
    }
}

/// Containment check: each expected element must be satisfied by at least
/// one actual element. Order and extra actual elements are irrelevant.
fn validate_containment(
    actual_items: &[Value],
    expected_items: &[Value],
    path: &str,
) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, expected_item) in expected_items.iter().enumerate() {
        let item_path = format!("{}[{index}]", label(path));
        let found = actual_items.iter().any(|actual_item| {
            if expected_item.is_object() || expected_item.is_array() {
                validate_body(Some(actual_item), expected_item, &item_path).is_empty()
            } else {
                validate_value(Some(actual_item), expected_item, &item_path).is_valid
            }
        });
        if !found {
            errors.push(format!(
                "Expected {} to contain item matching {}, but no match found",
                label(path),
                render(expected_item)
            ));
        }
    }
    errors
}

/// Resolve one expected key against the actual value: array selectors
/// address into arrays, any other key indexes an object property. Absent
/// keys and unindexable actuals yield `None`.
fn resolve_key(actual: Option<&Value>, key: &str) -> Option<Value> {
    match actual {
        Some(Value::Array(items)) if is_array_selector(key) => get_array_value(items, key),
        Some(Value::Object(map)) => map.get(key).cloned(),
        _ => None,
    }
}

fn label(path: &str) -> &str {
    if path.is_empty() {
        "body"
    } else {
        path
    }
}

/// Bracket selectors append directly (`body[0]`), other keys join with a
/// dot (`body.name`, `body.*`).
fn extend_path(path: &str, key: &str) -> String {
    let base = label(path);
    if key.starts_with('[') {
        format!("{base}{key}")
    } else {
        format!("{base}.{key}")
    }
}
