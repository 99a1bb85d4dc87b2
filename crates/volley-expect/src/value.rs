//! Scalar value matching.
//!
//! Resolves one actual value against one expected value (or an acceptable
//! set), choosing the comparison strategy via the classifier predicates.
//! Branch order is fixed: wildcard, acceptable set, regex, range, null,
//! exact equality. Only the first applicable interpretation is used.

use crate::classify::{is_range_pattern, is_regex_pattern};
use crate::range::validate_range;
use crate::types::ValueValidationResult;
use regex::Regex;
use serde_json::Value;

/// Render a value for error messages as compact JSON, so nested structures
/// and types stay distinguishable (`"5"` vs `5`).
pub(crate) fn render(value: &Value) -> String {
    value.to_string()
}

/// Render a possibly-absent actual value; missing fields show as `undefined`.
pub(crate) fn render_actual(actual: Option<&Value>) -> String {
    match actual {
        Some(value) => render(value),
        None => "undefined".to_string(),
    }
}

/// Validate a single actual value against a single expected value or set.
///
/// `actual` is `None` when the addressed field is absent; only the wildcard
/// accepts an absent value.
pub fn validate_value(
    actual: Option<&Value>,
    expected: &Value,
    path: &str,
) -> ValueValidationResult {
    // Wildcard accepts anything, including null and absent values.
    if expected.as_str() == Some("*") {
        return ValueValidationResult::valid();
    }

    if let Value::Array(set) = expected {
        if set.iter().any(|candidate| matches_candidate(actual, candidate)) {
            return ValueValidationResult::valid();
        }
        return ValueValidationResult::invalid(format!(
            "Expected {path} to be one of {}, got {}",
            render(expected),
            render_actual(actual)
        ));
    }

    if let Value::String(pattern) = expected {
        if is_regex_pattern(pattern) {
            if regex_matches(actual, pattern) {
                return ValueValidationResult::valid();
            }
            return ValueValidationResult::invalid(format!(
                "Expected {path} to match {}, got {}",
                render(expected),
                render_actual(actual)
            ));
        }
        if is_range_pattern(pattern) {
            if actual.is_some_and(|a| validate_range(a, pattern)) {
                return ValueValidationResult::valid();
            }
            return ValueValidationResult::invalid(format!(
                "Expected {path} to be in range {}, got {}",
                render(expected),
                render_actual(actual)
            ));
        }
    }

    if expected.as_str() == Some("null") || expected.is_null() {
        if actual.is_some_and(Value::is_null) {
            return ValueValidationResult::valid();
        }
        return ValueValidationResult::invalid(format!(
            "Expected {path} to be null, got {}",
            render_actual(actual)
        ));
    }

    if actual.is_some_and(|a| deep_equals(a, expected)) {
        return ValueValidationResult::valid();
    }
    ValueValidationResult::invalid(format!(
        "Expected {path} to be {}, got {}",
        render(expected),
        render_actual(actual)
    ))
}

/// One element of an acceptable set: wildcard, pattern, or deep equality.
fn matches_candidate(actual: Option<&Value>, candidate: &Value) -> bool {
    if candidate.as_str() == Some("*") {
        return true;
    }
    if let Value::String(s) = candidate {
        if is_regex_pattern(s) {
            return regex_matches(actual, s);
        }
        if is_range_pattern(s) {
            return actual.is_some_and(|a| validate_range(a, s));
        }
    }
    actual.is_some_and(|a| deep_equals(a, candidate))
}

/// Test an actual value against a regex pattern string.
///
/// Non-string actuals are stringified as compact JSON before matching; an
/// absent actual never matches. A pattern that fails to compile is treated
/// as a non-match, never as an engine failure (fail-closed).
fn regex_matches(actual: Option<&Value>, pattern: &str) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let Ok(regex) = Regex::new(pattern) else {
        return false;
    };
    let haystack = match actual {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    regex.is_match(&haystack)
}

/// Deep structural equality.
///
/// Numbers compare numerically across integer/float variants (`1` equals
/// `1.0`); arrays compare positionally; objects require the same key set.
pub fn deep_equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => {
            a == b || matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y)
        }
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| deep_equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && b.iter()
                    .all(|(key, bv)| a.get(key).is_some_and(|av| deep_equals(av, bv)))
        }
        _ => false,
    }
}
