//! Volley response expectation engine.
//!
//! Given a declarative [`ExpectConfig`] and a captured [`ResponseData`],
//! [`validate_response`] decides whether the response satisfies the
//! expectations and explains every violation when it does not. Expectations
//! are written in a small pattern language: exact values, the `"*"`
//! wildcard, regular expressions, numeric ranges, array selectors, and
//! "one of" sets, applied recursively over nested JSON.
//!
//! The engine performs no I/O and holds no state; every entry point is a
//! pure function of its arguments and safe to call concurrently.
//!
//! ```
//! use serde_json::json;
//! use volley_expect::{validate_response, ExpectConfig, ResponseData, StatusExpect};
//!
//! let response = ResponseData {
//!     status: Some(200),
//!     body: Some(json!({"id": 42, "name": "volley"})),
//!     ..Default::default()
//! };
//! let expect = ExpectConfig {
//!     status: Some(StatusExpect::OneOf(vec![200, 201])),
//!     body: Some(json!({"id": ">= 1", "name": "volley"})),
//!     ..Default::default()
//! };
//! assert!(validate_response(&response, Some(&expect)).success);
//! ```

pub mod body;
pub mod check;
pub mod classify;
pub mod range;
pub mod selector;
pub mod types;
pub mod value;

pub use body::validate_body;
pub use check::{validate_headers, validate_response, validate_status};
pub use classify::{is_array_selector, is_range_pattern, is_regex_pattern};
pub use range::{validate_range, validate_range_number};
pub use selector::get_array_value;
pub use types::{
    ExpectConfig, ResponseData, ResponseMetrics, StatusExpect, ValidationResult,
    ValueValidationResult,
};
pub use value::validate_value;
