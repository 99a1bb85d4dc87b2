//! `${NAME}` variable interpolation.
//!
//! Placeholders are resolved from the run file's variables map first, then
//! from the process environment. An unresolved placeholder is a hard config
//! error so misconfigured runs fail before any request is sent.

use crate::config::ConfigError;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

static VAR_REGEX: OnceLock<Regex> = OnceLock::new();

fn var_regex() -> &'static Regex {
    VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("variable regex is valid")
    })
}

/// Substitute every `${NAME}` placeholder in `input`.
pub fn interpolate(input: &str, variables: &BTreeMap<String, String>) -> Result<String, ConfigError> {
    // Resolve all names up front so the first unknown one is reported.
    for caps in var_regex().captures_iter(input) {
        let name = &caps[1];
        if !variables.contains_key(name) && std::env::var(name).is_err() {
            return Err(ConfigError::UnknownVariable(name.to_string()));
        }
    }
    let replaced = var_regex().replace_all(input, |caps: &regex::Captures| {
        let name = &caps[1];
        variables
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
            .unwrap_or_default()
    });
    Ok(replaced.into_owned())
}

/// Interpolate every string leaf of a JSON tree, in place of a copy.
pub fn interpolate_value(
    value: &Value,
    variables: &BTreeMap<String, String>,
) -> Result<Value, ConfigError> {
    match value {
        Value::String(s) => Ok(Value::String(interpolate(s, variables)?)),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(interpolate_value(item, variables)?);
            }
            Ok(Value::Array(out))
        }
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, item) in map {
                out.insert(key.clone(), interpolate_value(item, variables)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}
