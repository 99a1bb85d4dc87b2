//! Volley: a YAML-driven HTTP request runner.
//!
//! Run files describe requests and declarative `expect:` blocks; volley
//! executes the requests, validates each response through the
//! [`volley_expect`] engine, retries failed attempts per the configured
//! policy, and renders the results.

pub mod config;
pub mod output;
pub mod retry;
pub mod runner;
pub mod vars;

pub use config::{discover_files, resolve_requests, ConfigError, ResolvedRequest, RunFile};
pub use runner::{RunOutcome, Runner};
