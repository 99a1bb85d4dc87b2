//! Core types for the expectation engine.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Expected status code(s): a single code or a set of acceptable codes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StatusExpect {
    /// A single acceptable status code.
    One(u16),
    /// Any of the listed codes is acceptable.
    OneOf(Vec<u16>),
}

impl StatusExpect {
    /// All accepted status codes, in declaration order.
    pub fn codes(&self) -> Vec<u16> {
        match self {
            StatusExpect::One(code) => vec![*code],
            StatusExpect::OneOf(codes) => codes.clone(),
        }
    }

    /// Whether the given status is in the accepted set.
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            StatusExpect::One(code) => *code == status,
            StatusExpect::OneOf(codes) => codes.contains(&status),
        }
    }
}

/// Declarative expectations for one response.
///
/// Every field is independently optional; an absent field means "do not
/// check this dimension", so an empty `ExpectConfig` always passes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpectConfig {
    /// Expected status code or set of codes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusExpect>,

    /// Expected headers (name -> exact value).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// Expected body tree. A present-but-null value means "expect a null
    /// body", distinct from an absent key meaning "do not check the body".
    #[serde(
        deserialize_with = "deserialize_present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub body: Option<Value>,

    /// Range pattern for the response time, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,

    /// When true, a 4xx/5xx response is the desired outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<bool>,
}

/// Deserializer that keeps an explicit `null` as a real expectation.
///
/// With a plain `Option<Value>` serde folds `body: null` into `None`; this
/// only runs when the key is present, so `null` becomes `Some(Value::Null)`.
fn deserialize_present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Timing metrics captured alongside a response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResponseMetrics {
    /// Wall-clock duration of the exchange, in milliseconds.
    pub duration: f64,
    /// Response body size in bytes, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// The captured actual response, as handed over by the request runner.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResponseData {
    /// HTTP status code, absent if the exchange never completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Response headers, case-preserved as received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    /// Parsed response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Timing metrics, absent if the caller did not measure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ResponseMetrics>,
}

/// Top-level verdict for one response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationResult {
    /// Whether the response satisfied every expectation.
    pub success: bool,
    /// All violations, semicolon-joined; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    /// A passing verdict.
    pub fn pass() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failing verdict with the given message.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Per-value verdict used inside the matchers; folded into
/// [`ValidationResult`] before crossing the orchestrator boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValueValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}
