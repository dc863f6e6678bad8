//! CLI integration tests.
//!
//! Each test runs the built binary against its own temporary session
//! directory. Tests that need the remote service start a wiremock server.

mod common;

use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{run_cli, run_cli_failure, run_cli_success, seed_session};

fn session_json(token: &str, expires_in: Duration) -> String {
    json!({
        "access_token": token,
        "expires_at": (Utc::now() + expires_in).to_rfc3339(),
    })
    .to_string()
}

// ============================================================================
// Offline
// ============================================================================

#[test]
fn test_status_without_session() {
    let dir = TempDir::new().unwrap();

    let stdout = run_cli_success(&["status"], dir.path());
    assert!(stdout.contains("not logged in"));

    let stdout = run_cli_success(&["status", "--json"], dir.path());
    let report: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["stored"], false);
    assert_eq!(report["authenticated"], false);
    assert_eq!(report["api"], "http://localhost:8088/api/v1");
}

#[test]
fn test_open_protected_route_without_session_redirects() {
    let dir = TempDir::new().unwrap();

    for route in ["/my-books", "/manage/42", "/"] {
        let (stdout, stderr) = run_cli_failure(&["open", route], dir.path());
        assert!(stdout.contains("/login"), "no redirect for {}", route);
        assert!(stderr.contains("requires a session"));
    }
}

#[test]
fn test_open_public_route() {
    let dir = TempDir::new().unwrap();

    let stdout = run_cli_success(&["open", "/activate-account"], dir.path());
    assert!(stdout.contains("is open"));
    assert!(!stdout.contains("/login"));
}

#[test]
fn test_open_with_stored_session() {
    let dir = TempDir::new().unwrap();
    seed_session(dir.path(), &session_json("abc123", Duration::hours(1)));

    let stdout = run_cli_success(&["open", "/my-books"], dir.path());
    assert!(stdout.contains("/my-books is open"));

    let stdout = run_cli_success(&["status", "--json"], dir.path());
    let report: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["authenticated"], true);
}

#[test]
fn test_expired_session_is_blocked() {
    let dir = TempDir::new().unwrap();
    seed_session(dir.path(), &session_json("abc123", Duration::seconds(-5)));

    let (stdout, _) = run_cli_failure(&["open", "/my-borrowed-books"], dir.path());
    assert!(stdout.contains("/login"));

    let stdout = run_cli_success(&["status"], dir.path());
    assert!(stdout.contains("expired"));
}

#[test]
fn test_corrupted_session_is_discarded() {
    let dir = TempDir::new().unwrap();
    seed_session(dir.path(), "{not json");

    let stdout = run_cli_success(&["status"], dir.path());
    assert!(stdout.contains("not logged in"));
    assert!(!dir.path().join("session.json").exists());
}

#[test]
fn test_logout_is_idempotent() {
    let dir = TempDir::new().unwrap();
    seed_session(dir.path(), &session_json("abc123", Duration::hours(1)));

    let stdout = run_cli_success(&["logout"], dir.path());
    assert!(stdout.contains("Logged out"));
    assert!(!dir.path().join("session.json").exists());

    let stdout = run_cli_success(&["logout"], dir.path());
    assert!(stdout.contains("No active session"));
}

#[test]
fn test_malformed_activation_code_is_rejected_locally() {
    let dir = TempDir::new().unwrap();

    // Nothing listens on the default API; the code must fail validation first.
    let (_, stderr) = run_cli_failure(&["activate", "12"], dir.path());
    assert!(stderr.contains("Invalid activation code"));
}

#[test]
fn test_invalid_api_url() {
    let dir = TempDir::new().unwrap();

    let (_, stderr) = run_cli_failure(
        &["--api", "http://books.example.com/api/v1", "status"],
        dir.path(),
    );
    assert!(stderr.contains("Invalid API URL"));
}

// ============================================================================
// Against a mock service
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_rejected_request_clears_session() {
    let server = MockServer::start().await;
    let api = format!("http://127.0.0.1:{}/api/v1", server.address().port());

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc123" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/books/borrowed"))
        .and(header("authorization", "Bearer abc123"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/books/borrowed"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let session = dir.path().to_path_buf();

    let stdout = run_cli_success(
        &[
            "--api",
            &api,
            "login",
            "--email",
            "alice@example.com",
            "--password",
            "secret123",
        ],
        &session,
    );
    assert!(stdout.contains("Logged in successfully"));
    assert!(session.join("session.json").exists());

    let stdout = run_cli_success(
        &["--api", &api, "get", "books/borrowed", "-p", "page=0"],
        &session,
    );
    let body: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(body["content"], json!([]));

    let output = run_cli(
        &["--api", &api, "get", "books/borrowed", "-p", "page=0"],
        &session,
    );
    assert!(!output.status.success());
    assert!(!session.join("session.json").exists());

    let (stdout, _) = run_cli_failure(&["open", "/my-borrowed-books"], &session);
    assert!(stdout.contains("/login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_activate_against_service() {
    let server = MockServer::start().await;
    let api = format!("http://127.0.0.1:{}/api/v1", server.address().port());

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/activate-account"))
        .and(query_param("token", "123456"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/activate-account"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();

    let stdout = run_cli_success(&["--api", &api, "activate", "123456"], dir.path());
    assert!(stdout.contains("successfully activated"));
    assert!(stdout.contains("/login"));

    let (_, stderr) = run_cli_failure(&["--api", &api, "activate", "999999"], dir.path());
    assert!(stderr.contains("Token has been expired or invalid"));
}
