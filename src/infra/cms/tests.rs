use httpmock::MockServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

use super::*;
use crate::application::repos::{
    AuthGateway, CategoriesRepo, PostQuery, PostsRepo, PostsWriteRepo,
};
use crate::domain::entities::{CategoryDraft, PostDraft};
use crate::domain::types::PostStatus;

const TOKEN: &str = "tok-123";

fn client(server: &MockServer) -> CmsClient {
    CmsClient::new(&server.base_url(), None).expect("client")
}

fn post_json(document_id: &str, published_at: Option<&str>) -> Value {
    json!({
        "id": 1,
        "documentId": document_id,
        "title": "Hello World",
        "slug": "hello-world",
        "publishedAt": published_at,
        "createdAt": "2024-05-01T10:00:00.000Z",
        "updatedAt": "2024-05-01T10:00:00.000Z"
    })
}

fn draft() -> PostDraft {
    PostDraft {
        title: "Hello World".into(),
        description: "intro".into(),
        content: "body".into(),
        slug: String::new(),
        category_id: Some("7".into()),
    }
}

#[test]
fn base_url_gets_scheme_and_loses_trailing_slash() {
    assert_eq!(normalize_base_url(""), DEFAULT_BASE_URL);
    assert_eq!(normalize_base_url("cms.example.com/"), "https://cms.example.com");
    assert_eq!(
        normalize_base_url("http://localhost:1337"),
        "http://localhost:1337"
    );
}

#[test]
fn url_keeps_base_path_prefix() {
    let client = CmsClient::new("https://cms.example.com/strapi/", None).expect("client");
    let url = client
        .url(POSTS_PATH, &StrapiQuery::new().page(1, 10))
        .expect("url");
    assert_eq!(url.path(), "/strapi/content-manager/collection-types/api::post.post");
    assert!(url.query().unwrap_or_default().contains("pagination%5Bpage%5D=1"));
}

#[tokio::test]
async fn login_returns_token() -> Result<(), CmsError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/admin/login")
            .json_body_includes(r#"{"email":"admin@example.com","password":"secret"}"#);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"data": {"token": TOKEN}}));
    });

    let token = client(&server).login("admin@example.com", "secret").await?;
    assert_eq!(token, TOKEN);
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn rejected_login_is_auth_error_with_backend_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/admin/login");
        then.status(400)
            .header("content-type", "application/json")
            .json_body(json!({"error": {"status": 400, "message": "Invalid credentials"}}));
    });

    let err = client(&server)
        .login("admin@example.com", "wrong")
        .await
        .expect_err("rejected");
    match err {
        CmsError::Auth { message } => assert_eq!(message, "Invalid credentials"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_login_without_body_uses_status_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/admin/login");
        then.status(401);
    });

    let err = client(&server)
        .login("admin@example.com", "wrong")
        .await
        .expect_err("rejected");
    assert_eq!(err.to_string(), "authentication failed: Admin login failed: 401");
}

#[tokio::test]
async fn validate_token_reads_one_post() {
    let server = MockServer::start();
    let ok = server.mock(|when, then| {
        when.method("GET")
            .path(POSTS_PATH)
            .header("authorization", format!("Bearer {TOKEN}"))
            .query_param("pagination[page]", "1")
            .query_param("pagination[pageSize]", "1");
        then.status(200).json_body(json!({"results": [], "pagination": {}}));
    });
    server.mock(|when, then| {
        when.method("GET")
            .path(POSTS_PATH)
            .header("authorization", "Bearer stale");
        then.status(401);
    });

    let client = client(&server);
    assert!(client.validate_token(TOKEN).await);
    assert!(!client.validate_token("stale").await);
    ok.assert();
}

#[tokio::test]
async fn list_posts_sends_listing_query() -> Result<(), CmsError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path(POSTS_PATH)
            .header("authorization", format!("Bearer {TOKEN}"))
            .query_param("pagination[page]", "2")
            .query_param("pagination[pageSize]", "10")
            .query_param("populate[category]", "true")
            .query_param("populate[image]", "true")
            .query_param("sort", "createdAt:desc")
            .query_param("status", "draft")
            .query_param("filters[title][$containsi]", "hello");
        then.status(200).json_body(json!({
            "results": [
                post_json("doc-1", Some("2024-05-02T10:00:00.000Z")),
                post_json("doc-2", None)
            ],
            "pagination": {"page": 2, "pageSize": 10, "pageCount": 3, "total": 22}
        }));
    });

    let page = client(&server)
        .list_posts(TOKEN, &PostQuery::new(2, 10, " hello "))
        .await?;

    mock.assert();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].status, PostStatus::Published);
    assert_eq!(page.items[1].status, PostStatus::Draft);
    assert_eq!(page.pagination.page(), 2);
    assert_eq!(page.pagination.total_pages(), 3);
    assert_eq!(page.pagination.total(), 22);
    Ok(())
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    let server = MockServer::start();
    let any = server.mock(|_when, then| {
        then.status(200).json_body(json!({}));
    });

    let client = client(&server);
    let err = client
        .list_posts("", &PostQuery::new(1, 10, ""))
        .await
        .expect_err("no token");
    assert!(matches!(err, CmsError::AuthRequired));
    let err = client.list_categories("").await.expect_err("no token");
    assert!(matches!(err, CmsError::AuthRequired));
    let err = client.create_post("", &draft()).await.expect_err("no token");
    assert!(matches!(err, CmsError::AuthRequired));
    any.assert_hits(0);
}

#[tokio::test]
async fn create_post_auto_publishes() -> Result<(), CmsError> {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method("POST")
            .path(POSTS_PATH)
            .json_body_includes(
                r#"{"title":"Hello World","slug":"hello-world","category":{"connect":[{"id":"7"}]}}"#,
            );
        then.status(201).json_body(json!({"data": post_json("doc-1", None)}));
    });
    let publish = server.mock(|when, then| {
        when.method("POST")
            .path(format!("{POSTS_PATH}/doc-1/actions/publish"));
        then.status(200)
            .json_body(json!({"data": post_json("doc-1", Some("2024-05-02T10:00:00.000Z"))}));
    });

    let post = client(&server).create_post(TOKEN, &draft()).await?;

    create.assert();
    publish.assert();
    assert_eq!(post.document_id, "doc-1");
    assert!(post.is_published());
    assert_eq!(post.status, PostStatus::Published);
    Ok(())
}

#[tokio::test]
async fn create_post_survives_failed_publish() -> Result<(), CmsError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path(POSTS_PATH);
        then.status(200).json_body(post_json("doc-1", None));
    });
    let publish = server.mock(|when, then| {
        when.method("POST")
            .path(format!("{POSTS_PATH}/doc-1/actions/publish"));
        then.status(500)
            .json_body(json!({"error": {"status": 500, "message": "Internal Server Error"}}));
    });

    let post = client(&server).create_post(TOKEN, &draft()).await?;

    publish.assert();
    assert_eq!(post.document_id, "doc-1");
    assert!(!post.is_published());
    assert_eq!(post.status, PostStatus::Draft);
    Ok(())
}

#[tokio::test]
async fn create_post_failure_carries_backend_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path(POSTS_PATH);
        then.status(400)
            .json_body(json!({"error": {"status": 400, "message": "slug must be unique"}}));
    });

    let err = client(&server)
        .create_post(TOKEN, &draft())
        .await
        .expect_err("rejected");
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.to_string(), "slug must be unique");
}

#[tokio::test]
async fn delete_failure_without_message_uses_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("DELETE").path(format!("{POSTS_PATH}/doc-9"));
        then.status(404);
    });

    let err = client(&server)
        .delete_post(TOKEN, "doc-9")
        .await
        .expect_err("missing");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.to_string(), "Failed to delete post: 404");
}

#[tokio::test]
async fn unpublish_twice_is_not_an_error() -> Result<(), CmsError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path(format!("{POSTS_PATH}/doc-1/actions/unpublish"));
        then.status(200).body("");
    });

    let client = client(&server);
    client.unpublish_post(TOKEN, "doc-1").await?;
    client.unpublish_post(TOKEN, "doc-1").await?;
    mock.assert_hits(2);
    Ok(())
}

#[tokio::test]
async fn update_post_puts_normalized_draft() -> Result<(), CmsError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("PUT")
            .path(format!("{POSTS_PATH}/doc-1"))
            .json_body_includes(r#"{"title":"Hello World","description":"intro"}"#);
        then.status(200).json_body(post_json("doc-1", None));
    });

    let post = client(&server).update_post(TOKEN, "doc-1", &draft()).await?;
    mock.assert();
    assert_eq!(post.title, "Hello World");
    Ok(())
}

#[tokio::test]
async fn find_post_by_slug_filters_on_slug() -> Result<(), CmsError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path(POSTS_PATH)
            .query_param("filters[slug][$eq]", "hello-world");
        then.status(200).json_body(json!({
            "results": [post_json("doc-1", None)],
            "pagination": {"page": 1, "pageSize": 1, "pageCount": 1, "total": 1}
        }));
    });

    let found = client(&server).find_post_by_slug(TOKEN, "hello-world").await?;
    mock.assert();
    assert_eq!(found.map(|post| post.document_id).as_deref(), Some("doc-1"));
    Ok(())
}

#[tokio::test]
async fn category_chain_stops_at_last_source_with_empty_list() -> Result<(), CmsError> {
    let server = MockServer::start();
    let cm_draft = server.mock(|when, then| {
        when.method("GET")
            .path(CATEGORIES_PATH)
            .query_param("status", "draft");
        then.status(500);
    });
    let cm_plain = server.mock(|when, then| {
        when.method("GET")
            .path(CATEGORIES_PATH)
            .query_param_missing("status");
        then.status(404);
    });
    let rest_populated = server.mock(|when, then| {
        when.method("GET")
            .path(REST_CATEGORIES_PATH)
            .query_param("populate", "*");
        then.status(403)
            .json_body(json!({"error": {"status": 403, "message": "Forbidden"}}));
    });
    let rest_plain = server.mock(|when, then| {
        when.method("GET")
            .path(REST_CATEGORIES_PATH)
            .query_param_missing("populate");
        then.status(200).json_body(json!({"data": [], "meta": {}}));
    });

    let categories = client(&server).list_categories(TOKEN).await?;

    assert!(categories.is_empty());
    cm_draft.assert();
    cm_plain.assert();
    rest_populated.assert();
    rest_plain.assert();
    Ok(())
}

#[tokio::test]
async fn category_chain_halts_on_first_answer() -> Result<(), CmsError> {
    let server = MockServer::start();
    let cm_draft = server.mock(|when, then| {
        when.method("GET")
            .path(CATEGORIES_PATH)
            .query_param("status", "draft");
        then.status(200).json_body(json!({
            "results": [
                {"id": 1, "documentId": "c1", "text": "News"},
                {"id": 2, "documentId": "c2", "attributes": {"name": "Guides", "slug": "guides"}}
            ],
            "pagination": {}
        }));
    });
    let rest = server.mock(|when, then| {
        when.method("GET").path(REST_CATEGORIES_PATH);
        then.status(200).json_body(json!({"data": []}));
    });

    let categories = client(&server).list_categories(TOKEN).await?;

    cm_draft.assert();
    rest.assert_hits(0);
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["News", "Guides"]);
    assert_eq!(categories[1].slug, "guides");
    Ok(())
}

#[tokio::test]
async fn category_chain_exhaustion_yields_empty_list() -> Result<(), CmsError> {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method("GET");
        then.status(502);
    });

    let categories = client(&server).list_categories(TOKEN).await?;

    assert!(categories.is_empty());
    any.assert_hits(4);
    Ok(())
}

#[tokio::test]
async fn create_category_falls_back_to_rest() -> Result<(), CmsError> {
    let server = MockServer::start();
    let cm = server.mock(|when, then| {
        when.method("POST")
            .path(CATEGORIES_PATH)
            .json_body_includes(r#"{"text":"Release Notes","description":"release-notes"}"#);
        then.status(405);
    });
    let rest = server.mock(|when, then| {
        when.method("POST")
            .path(REST_CATEGORIES_PATH)
            .json_body_includes(r#"{"data":{"text":"Release Notes","description":"release-notes"}}"#);
        then.status(201).json_body(json!({
            "data": {"id": 4, "documentId": "c4", "text": "Release Notes", "description": "release-notes"}
        }));
    });

    let category = client(&server)
        .create_category(
            TOKEN,
            &CategoryDraft {
                name: "Release Notes".into(),
                slug: String::new(),
            },
        )
        .await?;

    cm.assert();
    rest.assert();
    assert_eq!(category.document_id, "c4");
    assert_eq!(category.name, "Release Notes");
    Ok(())
}

#[tokio::test]
async fn delete_category_uses_rest_endpoint() -> Result<(), CmsError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE")
            .path(format!("{REST_CATEGORIES_PATH}/c4"))
            .header("authorization", format!("Bearer {TOKEN}"));
        then.status(204);
    });

    client(&server).delete_category(TOKEN, "c4").await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn published_posts_use_public_envelope_and_api_token() -> Result<(), CmsError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path(REST_POSTS_PATH)
            .header("authorization", "Bearer static-token")
            .query_param("pagination[page]", "1")
            .query_param("sort", "createdAt:desc");
        then.status(200).json_body(json!({
            "data": [post_json("doc-1", Some("2024-05-02T10:00:00.000Z"))],
            "meta": {"pagination": {"page": 1, "pageSize": 10, "pageCount": 1, "total": 1}}
        }));
    });

    let page = client(&server)
        .with_api_token(Some("static-token".into()))
        .list_published_posts(&PostQuery::new(1, 10, ""))
        .await?;

    mock.assert();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.pagination.total(), 1);
    Ok(())
}
