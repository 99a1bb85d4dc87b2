//! End-to-end run-file tests: parse -> resolve -> validate against canned
//! responses, with no network involved.

use serde_json::json;
use std::io::Write;
use volley::config::{discover_files, resolve_requests, RunFile};
use volley_expect::{validate_response, ResponseData, ResponseMetrics};

fn write_run_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn parse_resolve_and_validate_a_passing_response() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_run_file(
        &dir,
        "run.yaml",
        r#"
global:
  variables:
    BASE: https://api.example.com
  defaults:
    expect:
      responseTime: "< 2000"
collection:
  name: users
  requests:
    - name: list users
      url: ${BASE}/users
      expect:
        status: [200, 201]
        headers:
          Content-Type: application/json
        body:
          users:
            - name: "^a\\w+$"
          total: ">= 1"
"#,
    );

    let run_file = RunFile::from_file(&path).unwrap();
    let requests = resolve_requests(&run_file).unwrap();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(request.url, "https://api.example.com/users");
    let expect = request.expect.as_ref().unwrap();
    // Global default merged under the request-level expect
    assert_eq!(expect.response_time.as_deref(), Some("< 2000"));

    let response = ResponseData {
        status: Some(200),
        headers: Some(
            [("content-type".to_string(), "application/json".to_string())]
                .into_iter()
                .collect(),
        ),
        body: Some(json!({
            "users": [{"name": "ada"}, {"name": "grace"}],
            "total": 2
        })),
        metrics: Some(ResponseMetrics {
            duration: 135.2,
            size: Some(64),
        }),
    };

    let result = validate_response(&response, Some(expect));
    assert!(result.success, "unexpected failure: {:?}", result.error);
}

#[test]
fn a_mismatched_response_reports_every_violation() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_run_file(
        &dir,
        "run.yaml",
        r#"
requests:
  - url: https://api.example.com/users/1
    expect:
      status: 200
      body:
        name: ada
        role: admin
"#,
    );

    let run_file = RunFile::from_file(&path).unwrap();
    let requests = resolve_requests(&run_file).unwrap();
    let expect = requests[0].expect.as_ref().unwrap();

    let response = ResponseData {
        status: Some(404),
        body: Some(json!({"name": "grace", "role": "admin"})),
        ..Default::default()
    };

    let result = validate_response(&response, Some(expect));
    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("Expected status 200, got 404"));
    assert!(error.contains("Expected body.name to be \"ada\", got \"grace\""));
    assert!(!error.contains("role"));
}

#[test]
fn failure_expectation_inverts_the_verdict() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_run_file(
        &dir,
        "run.yaml",
        r#"
request:
  name: must 404
  url: https://api.example.com/missing
  expect:
    failure: true
    status: 404
"#,
    );

    let run_file = RunFile::from_file(&path).unwrap();
    let requests = resolve_requests(&run_file).unwrap();
    let expect = requests[0].expect.as_ref().unwrap();

    let not_found = ResponseData {
        status: Some(404),
        ..Default::default()
    };
    assert!(validate_response(&not_found, Some(expect)).success);

    // Failing with the wrong status is still a failure
    let wrong_status = ResponseData {
        status: Some(500),
        ..Default::default()
    };
    let result = validate_response(&wrong_status, Some(expect));
    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("Expected status 404, got 500")
    );
}

#[test]
fn failure_expectation_rejects_a_successful_response() {
    let run_file: RunFile = serde_yaml::from_str(
        r#"
request:
  url: https://api.example.com/missing
  expect:
    failure: true
"#,
    )
    .unwrap();
    let requests = resolve_requests(&run_file).unwrap();
    let expect = requests[0].expect.as_ref().unwrap();

    let ok = ResponseData {
        status: Some(200),
        ..Default::default()
    };
    let result = validate_response(&ok, Some(expect));
    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("Expected request to fail (4xx/5xx) but got status 200")
    );
}

#[test]
fn null_body_expectation_survives_yaml_parsing() {
    let run_file: RunFile = serde_yaml::from_str(
        r#"
requests:
  - url: https://api.example.com/void
    expect:
      body: null
"#,
    )
    .unwrap();
    let requests = resolve_requests(&run_file).unwrap();
    let expect = requests[0].expect.as_ref().unwrap();
    assert_eq!(expect.body, Some(serde_json::Value::Null));

    let null_body = ResponseData {
        status: Some(200),
        body: Some(serde_json::Value::Null),
        ..Default::default()
    };
    assert!(validate_response(&null_body, Some(expect)).success);

    let missing_body = ResponseData {
        status: Some(200),
        ..Default::default()
    };
    assert!(!validate_response(&missing_body, Some(expect)).success);
}

#[test]
fn discovery_finds_sorted_yaml_files() {
    let dir = tempfile::tempdir().unwrap();
    write_run_file(&dir, "b.yaml", "requests: []");
    write_run_file(&dir, "a.yml", "requests: []");
    write_run_file(&dir, "notes.txt", "not yaml");

    let files = discover_files(dir.path());
    let names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.yml", "b.yaml"]);

    // A single file path yields itself
    let single = discover_files(&dir.path().join("b.yaml"));
    assert_eq!(single.len(), 1);
}

#[test]
fn from_file_rejects_invalid_yaml_and_empty_files() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write_run_file(&dir, "bad.yaml", "requests: [url: {{{");
    assert!(RunFile::from_file(&bad).is_err());

    let empty = write_run_file(&dir, "empty.yaml", "{}");
    let err = RunFile::from_file(&empty).unwrap_err();
    assert!(err.to_string().contains("no requests defined"));
}
