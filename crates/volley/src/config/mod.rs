//! Run file model, discovery, and request resolution.
//!
//! A run file holds a `global:` block, an optional `collection:`, and/or
//! standalone requests. Resolution flattens everything into
//! [`ResolvedRequest`]s with settings merged request > collection > global
//! and `${NAME}` placeholders interpolated.

pub mod request;
pub mod settings;

use crate::vars::{interpolate, interpolate_value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use volley_expect::ExpectConfig;

pub use request::{AuthConfig, HttpMethod, RequestSpec, RetryConfig};
pub use settings::{
    Collection, Defaults, ExecutionMode, GlobalSettings, OutputFormat, OutputSettings,
};

/// Errors raised while loading or resolving a run file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Unknown variable '${{{0}}}'")]
    UnknownVariable(String),

    #[error("Invalid run file: {0}")]
    Invalid(String),
}

/// A parsed run file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<GlobalSettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<Collection>,

    /// Single request form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestSpec>,

    /// Bare list form.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<RequestSpec>,
}

impl RunFile {
    /// Read, parse and validate a run file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let run_file: RunFile =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        run_file.validate()?;
        Ok(run_file)
    }

    /// Structural validation before any resolution happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let specs = self.all_specs();
        if specs.is_empty() {
            return Err(ConfigError::Invalid(
                "no requests defined (expected 'request', 'requests' or 'collection.requests')"
                    .to_string(),
            ));
        }
        for (index, spec) in specs.iter().enumerate() {
            if spec.url.trim().is_empty() {
                let label = spec
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("request #{}", index + 1));
                return Err(ConfigError::Invalid(format!("{label} has an empty URL")));
            }
        }
        Ok(())
    }

    /// Effective global settings (defaults when the block is absent).
    pub fn global(&self) -> GlobalSettings {
        self.global.clone().unwrap_or_default()
    }

    /// All request specs in file order: `request`, `requests`, then the
    /// collection's requests.
    fn all_specs(&self) -> Vec<&RequestSpec> {
        let mut specs = Vec::new();
        if let Some(single) = &self.request {
            specs.push(single);
        }
        specs.extend(self.requests.iter());
        if let Some(collection) = &self.collection {
            specs.extend(collection.requests.iter());
        }
        specs
    }
}

/// A request after merging and interpolation, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub name: Option<String>,
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub params: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
    /// Timeout in milliseconds.
    pub timeout: Option<u64>,
    pub auth: Option<AuthConfig>,
    pub retry: Option<RetryConfig>,
    pub expect: Option<ExpectConfig>,
}

impl ResolvedRequest {
    /// Name shown in output: the declared name, or the URL.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

/// Find run files: a `.yaml`/`.yml` file yields itself, a directory yields
/// its sorted `.yaml`/`.yml` entries.
pub fn discover_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        if is_yaml(path) {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(path) {
            for entry in entries.flatten() {
                let entry_path = entry.path();
                if entry_path.is_file() && is_yaml(&entry_path) {
                    files.push(entry_path);
                }
            }
        }
    }

    files.sort();
    files
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Flatten a run file into executable requests, merging settings
/// (request > collection defaults > global defaults) and interpolating
/// `${NAME}` placeholders (collection variables > global variables > env).
pub fn resolve_requests(run_file: &RunFile) -> Result<Vec<ResolvedRequest>, ConfigError> {
    let global = run_file.global();

    // Standalone requests see global variables and defaults only.
    let mut resolved = Vec::new();
    for spec in run_file.request.iter().chain(run_file.requests.iter()) {
        resolved.push(resolve_one(
            spec,
            &global.defaults,
            None,
            &global.variables,
        )?);
    }

    if let Some(collection) = &run_file.collection {
        let mut variables = global.variables.clone();
        variables.extend(
            collection
                .variables
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        for spec in &collection.requests {
            resolved.push(resolve_one(
                spec,
                &global.defaults,
                Some(&collection.defaults),
                &variables,
            )?);
        }
    }

    Ok(resolved)
}

fn resolve_one(
    spec: &RequestSpec,
    global_defaults: &Defaults,
    collection_defaults: Option<&Defaults>,
    variables: &BTreeMap<String, String>,
) -> Result<ResolvedRequest, ConfigError> {
    // Header maps merge key-wise, later levels winning.
    let mut headers = global_defaults.headers.clone().unwrap_or_default();
    if let Some(defaults) = collection_defaults {
        if let Some(collection_headers) = &defaults.headers {
            headers.extend(collection_headers.clone());
        }
    }
    if let Some(request_headers) = &spec.headers {
        headers.extend(request_headers.clone());
    }
    let headers = headers
        .into_iter()
        .map(|(name, value)| Ok((name, interpolate(&value, variables)?)))
        .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;

    let params = spec
        .params
        .clone()
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| Ok((name, interpolate(&value, variables)?)))
        .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;

    let timeout = spec
        .timeout
        .or(collection_defaults.and_then(|d| d.timeout))
        .or(global_defaults.timeout);

    let retry = spec
        .retry
        .or(collection_defaults.and_then(|d| d.retry))
        .or(global_defaults.retry);

    let expect = merge_expect(
        merge_expect(
            global_defaults.expect.as_ref(),
            collection_defaults.and_then(|d| d.expect.as_ref()),
        )
        .as_ref(),
        spec.expect.as_ref(),
    );

    let body = spec
        .body
        .as_ref()
        .map(|value| interpolate_value(value, variables))
        .transpose()?;

    let auth = spec
        .auth
        .as_ref()
        .map(|auth| resolve_auth(auth, variables))
        .transpose()?;

    Ok(ResolvedRequest {
        name: spec.name.clone(),
        url: interpolate(&spec.url, variables)?,
        method: spec.method,
        headers,
        params,
        body,
        timeout,
        auth,
        retry,
        expect,
    })
}

fn resolve_auth(
    auth: &AuthConfig,
    variables: &BTreeMap<String, String>,
) -> Result<AuthConfig, ConfigError> {
    Ok(match auth {
        AuthConfig::Basic { username, password } => AuthConfig::Basic {
            username: interpolate(username, variables)?,
            password: interpolate(password, variables)?,
        },
        AuthConfig::Bearer { token } => AuthConfig::Bearer {
            token: interpolate(token, variables)?,
        },
    })
}

/// Merge two expect blocks per top-level field, `over` winning; expected
/// header maps merge key-wise with the same precedence.
pub fn merge_expect(
    base: Option<&ExpectConfig>,
    over: Option<&ExpectConfig>,
) -> Option<ExpectConfig> {
    match (base, over) {
        (None, None) => None,
        (Some(base), None) => Some(base.clone()),
        (None, Some(over)) => Some(over.clone()),
        (Some(base), Some(over)) => {
            let headers = match (&base.headers, &over.headers) {
                (Some(base_headers), Some(over_headers)) => {
                    let mut merged = base_headers.clone();
                    merged.extend(over_headers.clone());
                    Some(merged)
                }
                (maybe_base, maybe_over) => maybe_over.clone().or_else(|| maybe_base.clone()),
            };
            Some(ExpectConfig {
                status: over.status.clone().or_else(|| base.status.clone()),
                headers,
                body: over.body.clone().or_else(|| base.body.clone()),
                response_time: over
                    .response_time
                    .clone()
                    .or_else(|| base.response_time.clone()),
                failure: over.failure.or(base.failure),
            })
        }
    }
}
