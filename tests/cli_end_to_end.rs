#![deny(clippy::all, clippy::pedantic)]

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use serde_json::json;
use tempfile::TempDir;

const POSTS: &str = "/content-manager/collection-types/api::post.post";

fn postdesk(server: &MockServer, session: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("postdesk"));
    cmd.env_remove("POSTDESK_CONFIG_FILE")
        .env_remove("POSTDESK_PASSWORD")
        .env_remove("POSTDESK_EMAIL")
        .env("RUST_LOG", "off")
        .arg("--cms-url")
        .arg(server.base_url())
        .arg("--session-file")
        .arg(session.path().join("session.json"));
    cmd
}

fn mock_session(server: &MockServer) {
    server.mock(|when, then| {
        when.method("POST")
            .path("/admin/login")
            .json_body_includes(r#"{"email":"admin@example.com","password":"secret"}"#);
        then.status(200)
            .json_body(json!({"data": {"token": "tok-e2e"}}));
    });
}

#[test]
fn login_then_list_posts_reuses_the_remembered_token() {
    let server = MockServer::start();
    let session = TempDir::new().expect("tempdir");
    mock_session(&server);
    let list = server.mock(|when, then| {
        when.method("GET")
            .path(POSTS)
            .header("authorization", "Bearer tok-e2e");
        then.status(200).json_body(json!({
            "results": [{
                "id": 1,
                "documentId": "doc-1",
                "title": "Hello World",
                "slug": "hello-world",
                "publishedAt": null,
                "createdAt": "2024-05-01T10:00:00.000Z",
                "updatedAt": "2024-05-01T10:00:00.000Z"
            }],
            "pagination": {"page": 1, "pageSize": 10, "pageCount": 1, "total": 1}
        }));
    });

    postdesk(&server, &session)
        .env("POSTDESK_PASSWORD", "secret")
        .args(["login", "--email", "admin@example.com"])
        .assert()
        .success()
        .stdout(contains("\"phase\": \"authenticated\""))
        .stderr(contains("Successfully logged in as admin!"));

    let assert = postdesk(&server, &session)
        .args(["posts", "list"])
        .assert()
        .success()
        .stderr(contains("Welcome back, admin@example.com!"));

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("\"document_id\": \"doc-1\""));
    assert!(output.contains("\"status\": \"draft\""));
    // one validation read plus the listing itself
    list.assert_hits(2);
}

#[test]
fn listing_without_a_session_fails_fast() {
    let server = MockServer::start();
    let session = TempDir::new().expect("tempdir");

    postdesk(&server, &session)
        .args(["posts", "list"])
        .assert()
        .failure()
        .stderr(contains("NotSignedIn"));
}

#[test]
fn rejected_login_reports_backend_message() {
    let server = MockServer::start();
    let session = TempDir::new().expect("tempdir");
    server.mock(|when, then| {
        when.method("POST").path("/admin/login");
        then.status(400)
            .json_body(json!({"error": {"message": "Invalid credentials"}}));
    });

    postdesk(&server, &session)
        .env("POSTDESK_PASSWORD", "wrong")
        .args(["login", "--email", "admin@example.com"])
        .assert()
        .failure()
        .stderr(contains("error: authentication failed: Invalid credentials"));
    assert!(!session.path().join("session.json").exists());
}

#[test]
fn logout_forgets_the_session() {
    let server = MockServer::start();
    let session = TempDir::new().expect("tempdir");
    mock_session(&server);

    postdesk(&server, &session)
        .env("POSTDESK_PASSWORD", "secret")
        .args(["login", "--email", "admin@example.com"])
        .assert()
        .success();

    postdesk(&server, &session)
        .arg("logout")
        .assert()
        .success()
        .stderr(contains("Successfully signed out!"));

    postdesk(&server, &session)
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("\"phase\": \"unauthenticated\""));
}

#[test]
fn published_posts_need_no_session() {
    let server = MockServer::start();
    let session = TempDir::new().expect("tempdir");
    let published = server.mock(|when, then| {
        when.method("GET")
            .path("/api/posts")
            .query_param("pagination[page]", "2")
            .query_param("pagination[pageSize]", "5");
        then.status(200).json_body(json!({
            "data": [],
            "meta": {"pagination": {"page": 2, "pageSize": 5, "pageCount": 2, "total": 7}}
        }));
    });

    postdesk(&server, &session)
        .args(["--page-size", "5", "published", "--page", "2"])
        .assert()
        .success()
        .stdout(contains("\"total\": 7"));
    published.assert();
}
