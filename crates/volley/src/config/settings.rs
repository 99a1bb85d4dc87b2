//! Run-wide and collection-level settings.

use crate::config::request::{RequestSpec, RetryConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use volley_expect::ExpectConfig;

/// How the requests of a run file are executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

/// Terminal output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Raw,
}

/// Output settings from the `global.output` block.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub verbose: bool,
    pub show_headers: bool,
    pub show_body: bool,
    pub show_metrics: bool,
    /// When set, the JSON report is also written to this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_to_file: Option<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbose: false,
            show_headers: false,
            show_body: true,
            show_metrics: false,
            save_to_file: None,
        }
    }
}

/// Request defaults that can be set globally or per collection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Defaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expect: Option<ExpectConfig>,
}

/// The `global:` block of a run file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalSettings {
    pub execution: ExecutionMode,
    pub continue_on_error: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
    pub output: OutputSettings,
    pub defaults: Defaults,
}

/// The `collection:` block: a named group of requests with its own
/// variables and defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
    pub defaults: Defaults,
    pub requests: Vec<RequestSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_defaults() {
        let output: OutputSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(output.format, OutputFormat::Pretty);
        assert!(output.show_body);
        assert!(!output.show_headers);
        assert!(!output.verbose);
    }

    #[test]
    fn test_global_block() {
        let yaml = r#"
execution: parallel
continueOnError: true
variables:
  BASE: https://api.example.com
output:
  format: json
  showMetrics: true
defaults:
  timeout: 10000
"#;
        let global: GlobalSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(global.execution, ExecutionMode::Parallel);
        assert!(global.continue_on_error);
        assert_eq!(
            global.variables.get("BASE").map(String::as_str),
            Some("https://api.example.com")
        );
        assert_eq!(global.output.format, OutputFormat::Json);
        assert!(global.output.show_metrics);
        assert_eq!(global.defaults.timeout, Some(10000));
    }

    #[test]
    fn test_collection_block() {
        let yaml = r#"
name: smoke
variables:
  TOKEN: abc
requests:
  - url: https://example.com/health
"#;
        let collection: Collection = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(collection.name.as_deref(), Some("smoke"));
        assert_eq!(collection.requests.len(), 1);
    }
}
