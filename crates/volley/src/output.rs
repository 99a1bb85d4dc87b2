//! Run output: pretty terminal rendering, JSON reports, raw bodies.

use crate::config::{OutputFormat, OutputSettings};
use crate::runner::RunOutcome;
use serde::Serialize;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// One request's entry in the JSON report.
#[derive(Debug, Serialize)]
pub struct RequestReport {
    pub name: String,
    pub url: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub attempts: u32,
}

/// Aggregate counts for the run.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Summed request durations in milliseconds.
    pub duration: f64,
}

/// The full JSON report.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub results: Vec<RequestReport>,
    pub summary: Summary,
}

/// Shape outcomes into a serializable report.
pub fn build_report(outcomes: &[RunOutcome]) -> RunReport {
    let results: Vec<RequestReport> = outcomes
        .iter()
        .map(|outcome| RequestReport {
            name: outcome.name.clone(),
            url: outcome.url.clone(),
            method: outcome.method.to_string(),
            status: outcome.response.as_ref().and_then(|r| r.status),
            success: outcome.succeeded(),
            error: outcome
                .transport_error
                .clone()
                .or_else(|| outcome.result.error.clone()),
            duration: outcome
                .response
                .as_ref()
                .and_then(|r| r.metrics.as_ref())
                .map(|m| m.duration),
            attempts: outcome.attempts,
        })
        .collect();

    let passed = results.iter().filter(|r| r.success).count();
    let duration = results.iter().filter_map(|r| r.duration).sum();
    let summary = Summary {
        total: results.len(),
        passed,
        failed: results.len() - passed,
        duration,
    };

    RunReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        results,
        summary,
    }
}

/// Render outcomes in the configured format, and write the JSON report to
/// `saveToFile` when set.
pub fn render(outcomes: &[RunOutcome], settings: &OutputSettings) {
    match settings.format {
        OutputFormat::Pretty => print_pretty(outcomes, settings),
        OutputFormat::Json => print_json(outcomes),
        OutputFormat::Raw => print_raw(outcomes),
    }

    if let Some(path) = &settings.save_to_file {
        save_report(outcomes, path);
    }
}

/// Write the JSON report to a file, regardless of the terminal format.
pub fn save_report(outcomes: &[RunOutcome], path: &str) {
    let report = build_report(outcomes);
    match serde_json::to_string_pretty(&report) {
        Ok(contents) => {
            if let Err(error) = std::fs::write(path, contents) {
                eprintln!("{RED}Failed to save report to {path}: {error}{RESET}");
            }
        }
        Err(error) => eprintln!("{RED}Failed to serialize report: {error}{RESET}"),
    }
}

fn print_pretty(outcomes: &[RunOutcome], settings: &OutputSettings) {
    for outcome in outcomes {
        let verdict = if outcome.succeeded() {
            format!("{GREEN}PASS{RESET}")
        } else {
            format!("{RED}FAIL{RESET}")
        };
        let status = outcome
            .response
            .as_ref()
            .and_then(|r| r.status)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let duration = outcome
            .response
            .as_ref()
            .and_then(|r| r.metrics.as_ref())
            .map(|m| format!("{:.2}ms", m.duration))
            .unwrap_or_default();

        println!(
            "{verdict} {BOLD}{}{RESET} {DIM}{} {}{RESET} -> {status} {DIM}{duration}{RESET}",
            outcome.name, outcome.method, outcome.url
        );

        if outcome.attempts > 1 {
            println!("  {YELLOW}attempts: {}{RESET}", outcome.attempts);
        }

        if let Some(error) = &outcome.transport_error {
            println!("  {RED}| {error}{RESET}");
        } else if let Some(error) = &outcome.result.error {
            for violation in error.split("; ") {
                println!("  {RED}| {violation}{RESET}");
            }
        }

        if settings.show_headers {
            if let Some(headers) = outcome.response.as_ref().and_then(|r| r.headers.as_ref()) {
                for (name, value) in headers {
                    println!("  {DIM}{name}: {value}{RESET}");
                }
            }
        }

        if settings.show_body {
            if let Some(body) = outcome.response.as_ref().and_then(|r| r.body.as_ref()) {
                let rendered = serde_json::to_string_pretty(body).unwrap_or_default();
                for line in rendered.lines() {
                    println!("  {line}");
                }
            }
        }

        if settings.show_metrics {
            if let Some(metrics) = outcome.response.as_ref().and_then(|r| r.metrics.as_ref()) {
                let size = metrics
                    .size
                    .map(|s| format!(", {s} bytes"))
                    .unwrap_or_default();
                println!("  {DIM}duration: {:.2}ms{size}{RESET}", metrics.duration);
            }
        }
    }

    let report = build_report(outcomes);
    println!("{DIM}{RULE}{RESET}");
    println!("{BOLD}{CYAN}Summary{RESET}");
    println!("{DIM}{RULE}{RESET}");
    println!("  {DIM}Total:{RESET}    {BOLD}{}{RESET}", report.summary.total);
    println!(
        "  {GREEN}Passed:{RESET}   {BOLD}{GREEN}{}{RESET}",
        report.summary.passed
    );
    if report.summary.failed > 0 {
        println!(
            "  {RED}Failed:{RESET}   {BOLD}{RED}{}{RESET}",
            report.summary.failed
        );
    } else {
        println!("  {DIM}Failed:{RESET}   {BOLD}0{RESET}");
    }
    println!(
        "  {DIM}Duration:{RESET} {BOLD}{:.2}ms{RESET}",
        report.summary.duration
    );
    println!();
    if report.summary.failed == 0 {
        println!("{GREEN}{BOLD}All requests passed!{RESET}");
    } else {
        println!(
            "{RED}{BOLD}{} request(s) failed. See details above.{RESET}",
            report.summary.failed
        );
    }
}

fn print_json(outcomes: &[RunOutcome]) {
    let report = build_report(outcomes);
    match serde_json::to_string_pretty(&report) {
        Ok(output) => println!("{output}"),
        Err(error) => eprintln!("{RED}Failed to serialize report: {error}{RESET}"),
    }
}

fn print_raw(outcomes: &[RunOutcome]) {
    for outcome in outcomes {
        if let Some(body) = outcome.response.as_ref().and_then(|r| r.body.as_ref()) {
            match body {
                serde_json::Value::String(text) => println!("{text}"),
                other => println!("{other}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use volley_expect::{ResponseData, ResponseMetrics, ValidationResult};

    fn outcome(success: bool, duration: f64) -> RunOutcome {
        RunOutcome {
            name: "test".to_string(),
            url: "https://example.com".to_string(),
            method: "GET",
            attempts: 1,
            response: Some(ResponseData {
                status: Some(if success { 200 } else { 500 }),
                headers: None,
                body: Some(json!({"ok": success})),
                metrics: Some(ResponseMetrics {
                    duration,
                    size: Some(12),
                }),
            }),
            result: if success {
                ValidationResult::pass()
            } else {
                ValidationResult::fail("Expected status 200, got 500")
            },
            transport_error: None,
        }
    }

    #[test]
    fn test_report_counts_and_durations() {
        let outcomes = vec![outcome(true, 10.0), outcome(false, 25.5), outcome(true, 4.5)];
        let report = build_report(&outcomes);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.passed, 2);
        assert_eq!(report.summary.failed, 1);
        assert!((report.summary.duration - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_entry_fields() {
        let report = build_report(&[outcome(false, 3.0)]);
        let entry = &report.results[0];
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.status, Some(500));
        assert!(!entry.success);
        assert_eq!(entry.error.as_deref(), Some("Expected status 200, got 500"));
    }

    #[test]
    fn test_transport_error_takes_precedence_in_report() {
        let failed = RunOutcome {
            transport_error: Some("connection refused".to_string()),
            result: ValidationResult::fail("transport error: connection refused"),
            response: None,
            ..outcome(false, 0.0)
        };
        let report = build_report(&[failed]);
        assert_eq!(
            report.results[0].error.as_deref(),
            Some("connection refused")
        );
        assert_eq!(report.results[0].status, None);
    }
}
