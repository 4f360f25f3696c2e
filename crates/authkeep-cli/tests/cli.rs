//! CLI tests against a mock authentication API.
//!
//! Each test gets its own data directory, so the session file written by one
//! invocation is what the next invocation starts from.

mod common;

use common::{
    run_cli_with_env, run_cli_with_env_failure, run_cli_with_env_success, status_json,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_token(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_without_session() {
    let server = MockServer::start().await;
    let data = TempDir::new().unwrap();

    let status = status_json(data.path(), &server.uri());
    assert_eq!(status, json!({"loggedIn": false, "user": null}));

    let stdout = run_cli_with_env_success(&["status"], data.path(), &server.uri());
    assert!(stdout.contains("Logged in: no"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_session() {
    let server = MockServer::start().await;
    let data = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string("username=alice&password=pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok1",
            "token_type": "bearer",
            "username": "alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stdout = run_cli_with_env_success(
        &["login", "--username", "alice", "--password", "pw"],
        data.path(),
        &server.uri(),
    );
    assert!(stdout.contains("Logged in successfully"));
    assert!(stdout.contains("Username: alice"));
    assert!(stdout.contains("Token type: bearer"));

    assert!(data.path().join("user.json").exists());

    let status = status_json(data.path(), &server.uri());
    assert_eq!(
        status,
        json!({
            "loggedIn": true,
            "user": {"access_token": "[REDACTED]", "token_type": "bearer", "username": "alice"}
        })
    );

    let with_token = run_cli_with_env_success(
        &["status", "--json", "--show-token"],
        data.path(),
        &server.uri(),
    );
    assert!(with_token.contains("tok1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    let data = TempDir::new().unwrap();
    mock_token(
        &server,
        401,
        json!({"detail": "Incorrect username or password"}),
    )
    .await;

    let stderr = run_cli_with_env_failure(
        &["login", "--username", "a", "--password", "wrong"],
        data.path(),
        &server.uri(),
    );
    assert!(stderr.contains("Failed to login"));
    assert!(stderr.contains("401"));

    assert!(!data.path().join("user.json").exists());
    assert_eq!(status_json(data.path(), &server.uri())["loggedIn"], json!(false));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;
    let data = TempDir::new().unwrap();
    mock_token(&server, 200, json!({"access_token": "tok1"})).await;

    run_cli_with_env_success(
        &["login", "--username", "a", "--password", "b"],
        data.path(),
        &server.uri(),
    );
    assert_eq!(status_json(data.path(), &server.uri())["loggedIn"], json!(true));

    let stdout = run_cli_with_env_success(&["logout"], data.path(), &server.uri());
    assert!(stdout.contains("Logged out"));
    assert!(!data.path().join("user.json").exists());

    // Logging out again is harmless.
    let stdout = run_cli_with_env_success(&["logout"], data.path(), &server.uri());
    assert!(stdout.contains("No active session"));
    assert_eq!(
        status_json(data.path(), &server.uri()),
        json!({"loggedIn": false, "user": null})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_does_not_log_in() {
    let server = MockServer::start().await;
    let data = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/register"))
        .and(body_string("username=bob&password=pw&email=bob%40example.com"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"username": "bob"})))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli_with_env(
        &[
            "register",
            "--username",
            "bob",
            "--password",
            "pw",
            "--field",
            "email=bob@example.com",
        ],
        data.path(),
        &server.uri(),
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Registered bob"));
    assert!(stdout.contains("\"username\": \"bob\""));
    assert!(String::from_utf8_lossy(&output.stderr).contains("authkeep login"));

    assert_eq!(status_json(data.path(), &server.uri())["loggedIn"], json!(false));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_corrupt_session_file_reads_as_logged_out() {
    let server = MockServer::start().await;
    let data = TempDir::new().unwrap();
    std::fs::write(data.path().join("user.json"), "{\"access_token\": 12").unwrap();

    assert_eq!(
        status_json(data.path(), &server.uri()),
        json!({"loggedIn": false, "user": null})
    );
}

#[test]
fn test_invalid_api_url_blocks_login() {
    let data = TempDir::new().unwrap();

    let stderr = run_cli_with_env_failure(
        &["login", "--username", "a", "--password", "b"],
        data.path(),
        "ftp://auth.example.com/",
    );
    assert!(stderr.contains("Invalid API URL"));
}

#[test]
fn test_local_commands_ignore_invalid_api_url() {
    let data = TempDir::new().unwrap();
    std::fs::write(data.path().join("user.json"), r#"{"access_token":"abc"}"#).unwrap();

    assert_eq!(status_json(data.path(), "not a url")["loggedIn"], json!(true));

    let stdout = run_cli_with_env_success(&["logout"], data.path(), "not a url");
    assert!(stdout.contains("Logged out"));
    assert!(!data.path().join("user.json").exists());
}
