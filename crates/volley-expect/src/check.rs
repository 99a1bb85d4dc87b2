//! Status, header and response-time checks plus the validation orchestrator.

use crate::body::validate_body;
use crate::range::validate_range_number;
use crate::types::{ExpectConfig, ResponseData, StatusExpect, ValidationResult};
use std::collections::BTreeMap;

/// Check the actual status against the accepted set.
///
/// An absent status defaults to 0 in the error text.
pub fn validate_status(actual: Option<u16>, expected: &StatusExpect) -> Vec<String> {
    let status = actual.unwrap_or(0);
    if expected.accepts(status) {
        return Vec::new();
    }
    let accepted = expected
        .codes()
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" or ");
    vec![format!("Expected status {accepted}, got {status}")]
}

/// Check expected headers against the actual header map.
///
/// Lookup is case-insensitive (exact key first, then lower-cased key);
/// values compare by plain string equality, no pattern matching.
pub fn validate_headers(
    actual: Option<&BTreeMap<String, String>>,
    expected: &BTreeMap<String, String>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for (name, expected_value) in expected {
        let actual_value = actual.and_then(|headers| {
            headers
                .get(name)
                .or_else(|| headers.get(&name.to_lowercase()))
        });
        if actual_value.map(String::as_str) != Some(expected_value.as_str()) {
            let got = match actual_value {
                Some(value) => format!("'{value}'"),
                None => "undefined".to_string(),
            };
            errors.push(format!(
                "Expected header '{name}' to be '{expected_value}', got {got}"
            ));
        }
    }
    errors
}

/// Validate a captured response against an expectation config.
///
/// Pure and single-pass: accumulates every violation across the status,
/// header, body and response-time dimensions, then applies the
/// failure-expectation inversion before producing the verdict.
pub fn validate_response(response: &ResponseData, expect: Option<&ExpectConfig>) -> ValidationResult {
    let Some(expect) = expect else {
        return ValidationResult::pass();
    };

    let mut errors = Vec::new();

    if let Some(status_expect) = &expect.status {
        errors.extend(validate_status(response.status, status_expect));
    }

    if let Some(expected_headers) = &expect.headers {
        errors.extend(validate_headers(response.headers.as_ref(), expected_headers));
    }

    if let Some(expected_body) = &expect.body {
        errors.extend(validate_body(response.body.as_ref(), expected_body, ""));
    }

    if let Some(pattern) = &expect.response_time {
        if let Some(metrics) = &response.metrics {
            if !validate_range_number(metrics.duration, pattern) {
                errors.push(format!(
                    "Expected response time to match '{pattern}', got {:.2}ms",
                    metrics.duration
                ));
            }
        }
    }

    if expect.failure == Some(true) {
        // A caller who asked for a specific failure shape but got mismatched
        // details should see why.
        if !errors.is_empty() {
            return ValidationResult::fail(errors.join("; "));
        }
        let status = response.status.unwrap_or(0);
        if status >= 400 {
            return ValidationResult::pass();
        }
        return ValidationResult::fail(format!(
            "Expected request to fail (4xx/5xx) but got status {status}"
        ));
    }

    if errors.is_empty() {
        ValidationResult::pass()
    } else {
        ValidationResult::fail(errors.join("; "))
    }
}
