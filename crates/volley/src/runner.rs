//! HTTP execution: builds and sends requests, captures responses, and
//! drives retries until an attempt succeeds or the policy is exhausted.

use crate::config::{AuthConfig, ExecutionMode, HttpMethod, ResolvedRequest};
use crate::retry::RetryPolicy;
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use volley_expect::{validate_response, ResponseData, ResponseMetrics, ValidationResult};

/// The outcome of one request, after all retry attempts.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub name: String,
    pub url: String,
    pub method: &'static str,
    /// Attempts actually made (1 when no retry was needed).
    pub attempts: u32,
    /// The last attempt's response, absent when transport never completed.
    pub response: Option<ResponseData>,
    /// The last attempt's verdict.
    pub result: ValidationResult,
    /// The last attempt's transport error, if any.
    pub transport_error: Option<String>,
}

impl RunOutcome {
    /// Transport completed and validation passed.
    pub fn succeeded(&self) -> bool {
        self.transport_error.is_none() && self.result.success
    }
}

/// Request executor sharing one HTTP client across the run.
pub struct Runner {
    client: Client,
}

impl Runner {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    /// Execute all requests of a run in the given mode.
    ///
    /// Parallel mode runs every request concurrently (outcome order follows
    /// file order); sequential mode stops at the first failure unless
    /// `continue_on_error` is set.
    pub async fn run_all(
        &self,
        requests: &[ResolvedRequest],
        mode: ExecutionMode,
        continue_on_error: bool,
    ) -> Vec<RunOutcome> {
        match mode {
            ExecutionMode::Parallel => {
                futures::future::join_all(requests.iter().map(|request| self.execute(request)))
                    .await
            }
            ExecutionMode::Sequential => {
                let mut outcomes = Vec::with_capacity(requests.len());
                for request in requests {
                    let outcome = self.execute(request).await;
                    let failed = !outcome.succeeded();
                    outcomes.push(outcome);
                    if failed && !continue_on_error {
                        break;
                    }
                }
                outcomes
            }
        }
    }

    /// Execute one request, retrying per its policy. A validation failure
    /// on an otherwise successful transport counts as a failed attempt.
    pub async fn execute(&self, request: &ResolvedRequest) -> RunOutcome {
        let policy = RetryPolicy::from_config(request.retry.as_ref());
        let mut attempt = 1u32;
        loop {
            debug!(
                name = request.display_name(),
                url = %request.url,
                attempt,
                "sending request"
            );
            let (response, transport_error) = self.attempt(request).await;
            let result = match (&response, &transport_error) {
                (_, Some(error)) => ValidationResult::fail(format!("transport error: {error}")),
                (Some(response), None) => validate_response(response, request.expect.as_ref()),
                (None, None) => ValidationResult::fail("no response captured"),
            };
            let succeeded = transport_error.is_none() && result.success;

            if !policy.should_retry(attempt, succeeded) {
                return RunOutcome {
                    name: request.display_name().to_string(),
                    url: request.url.clone(),
                    method: request.method.as_str(),
                    attempts: attempt,
                    response,
                    result,
                    transport_error,
                };
            }

            warn!(
                name = request.display_name(),
                attempt,
                delay_ms = policy.delay_ms,
                error = result.error.as_deref().unwrap_or(""),
                "attempt failed, retrying"
            );
            policy.wait().await;
            attempt += 1;
        }
    }

    /// One transport exchange: returns the captured response, or the
    /// transport error when the exchange never completed.
    async fn attempt(&self, request: &ResolvedRequest) -> (Option<ResponseData>, Option<String>) {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(Duration::from_millis(timeout));
        }
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        match &request.auth {
            Some(AuthConfig::Basic { username, password }) => {
                builder = builder.basic_auth(username, Some(password));
            }
            Some(AuthConfig::Bearer { token }) => {
                builder = builder.bearer_auth(token);
            }
            None => {}
        }
        // String bodies go out raw; structured bodies as JSON. reqwest only
        // sets Content-Type when the user has not already set one.
        match &request.body {
            Some(Value::String(text)) => {
                builder = builder.body(text.clone());
            }
            Some(structured) => {
                builder = builder.json(structured);
            }
            None => {}
        }

        let start = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(error) => return (None, Some(error.to_string())),
        };

        let status = response.status().as_u16();
        let headers = convert_headers(response.headers());
        let text = match response.text().await {
            Ok(text) => text,
            Err(error) => return (None, Some(error.to_string())),
        };
        let duration = start.elapsed().as_secs_f64() * 1000.0;
        let size = text.len() as u64;

        (
            Some(ResponseData {
                status: Some(status),
                headers: Some(headers),
                body: parse_body(text),
                metrics: Some(ResponseMetrics {
                    duration,
                    size: Some(size),
                }),
            }),
            None,
        )
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

/// Header names arrive lower-cased from the HTTP layer; values that are not
/// valid UTF-8 are dropped.
fn convert_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// JSON bodies are parsed; anything else is carried as a JSON string; an
/// empty body is absent.
fn parse_body(text: String) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text)),
    }
}
