//! Numeric range matching.
//!
//! Two pattern forms are understood: a two-number hyphen range (`"10-20"`)
//! and one or more comma-separated comparator conditions (`">= 0, <= 100"`)
//! that are ANDed together. Numbers may carry a sign and decimals.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static HYPHEN_RANGE: OnceLock<Regex> = OnceLock::new();
static CONDITION: OnceLock<Regex> = OnceLock::new();

fn hyphen_range() -> &'static Regex {
    HYPHEN_RANGE.get_or_init(|| {
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*-\s*(-?\d+(?:\.\d+)?)\s*$")
            .expect("hyphen range regex is valid")
    })
}

fn condition() -> &'static Regex {
    CONDITION.get_or_init(|| {
        Regex::new(r"^(>=|<=|>|<)\s*(-?\d+(?:\.\d+)?)$").expect("condition regex is valid")
    })
}

/// Match a number against a range pattern.
///
/// `"MIN-MAX"` is inclusive on both ends; comparator conditions are each
/// evaluated independently and all must hold. A malformed pattern never
/// matches.
pub fn validate_range_number(actual: f64, pattern: &str) -> bool {
    if !actual.is_finite() {
        return false;
    }

    if let Some(caps) = hyphen_range().captures(pattern) {
        let min: f64 = caps[1].parse().unwrap_or(f64::NAN);
        let max: f64 = caps[2].parse().unwrap_or(f64::NAN);
        return actual >= min && actual <= max;
    }

    let mut saw_condition = false;
    for part in pattern.split(',') {
        let Some(caps) = condition().captures(part.trim()) else {
            return false;
        };
        let bound: f64 = match caps[2].parse() {
            Ok(n) => n,
            Err(_) => return false,
        };
        let holds = match &caps[1] {
            ">=" => actual >= bound,
            "<=" => actual <= bound,
            ">" => actual > bound,
            "<" => actual < bound,
            _ => false,
        };
        if !holds {
            return false;
        }
        saw_condition = true;
    }
    saw_condition
}

/// Match a JSON value against a range pattern, coercing the value first.
///
/// Numbers and numeric strings coerce; booleans, null, arrays and objects
/// never do, so they never match any range.
pub fn validate_range(actual: &Value, pattern: &str) -> bool {
    match coerce_number(actual) {
        Some(n) => validate_range_number(n, pattern),
        None => false,
    }
}

/// Coerce a JSON value into a finite number where the value is a number or
/// a numeric string.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hyphen_range_inclusive() {
        assert!(validate_range_number(10.0, "10-20"));
        assert!(validate_range_number(20.0, "10-20"));
        assert!(validate_range_number(15.5, "10-20"));
        assert!(!validate_range_number(9.99, "10-20"));
        assert!(!validate_range_number(20.01, "10-20"));
    }

    #[test]
    fn test_hyphen_range_negative_bounds() {
        assert!(validate_range_number(-5.0, "-10-0"));
        assert!(validate_range_number(0.0, "-10-0"));
        assert!(!validate_range_number(1.0, "-10-0"));
    }

    #[test]
    fn test_comparator_boundaries() {
        assert!(validate_range_number(10.0, ">= 10"));
        assert!(!validate_range_number(9.0, ">= 10"));
        assert!(!validate_range_number(10.0, "> 10"));
        assert!(validate_range_number(10.0, "<= 10"));
        assert!(!validate_range_number(10.0, "< 10"));
        assert!(validate_range_number(-5.0, ">= -10"));
    }

    #[test]
    fn test_comparator_conditions_are_anded() {
        assert!(validate_range_number(50.0, ">= 0, <= 100"));
        assert!(!validate_range_number(150.0, ">= 0, <= 100"));
        assert!(!validate_range_number(-1.0, ">= 0, <= 100"));
        assert!(validate_range_number(0.5, "> -1.5, < 1.5"));
    }

    #[test]
    fn test_malformed_pattern_never_matches() {
        assert!(!validate_range_number(10.0, ""));
        assert!(!validate_range_number(10.0, "ten to twenty"));
        assert!(!validate_range_number(10.0, ">= abc"));
        assert!(!validate_range_number(10.0, ">= 10,"));
    }

    #[test]
    fn test_value_coercion() {
        assert!(validate_range(&json!(42), ">= 40"));
        assert!(validate_range(&json!(42.5), "40-43"));
        assert!(validate_range(&json!("42"), ">= 40"));
        assert!(validate_range(&json!(" -3.5 "), "< 0"));
        // Non-numeric values never coerce
        assert!(!validate_range(&json!(true), ">= 0"));
        assert!(!validate_range(&json!(null), ">= 0"));
        assert!(!validate_range(&json!([1, 2]), ">= 0"));
        assert!(!validate_range(&json!({"n": 1}), ">= 0"));
        assert!(!validate_range(&json!("not a number"), ">= 0"));
    }
}
