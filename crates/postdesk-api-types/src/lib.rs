//! Wire shapes of the headless CMS REST API.
//!
//! Two listing envelopes exist on the backend: the admin content-manager
//! variant (`{results, pagination}`) and the public REST variant
//! (`{data, meta: {pagination}}`). Both are modelled here; the client decides
//! which one an endpoint speaks.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// Body of `POST /admin/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful `POST /admin/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub data: LoginData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

/// Content-manager listing: `{results: T[], pagination: {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentManagerPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub pagination: PaginationMeta,
}

/// Public REST envelope: `{data: T, meta?: {pagination}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
}

/// Wrapper used by REST write endpoints, which expect `{data: {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct DataWrapper<T> {
    pub data: T,
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Backend-provided message, if the body carried a non-empty one.
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|detail| detail.message.as_deref())
            .filter(|message| !message.trim().is_empty())
    }
}

/// Post entry as stored by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    pub id: i64,
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default)]
    pub category: Option<RawCategoryRef>,
    #[serde(default)]
    pub image: Option<RawMedia>,
}

/// Category relation embedded in a post (populated).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategoryRef {
    pub id: i64,
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

/// Media relation embedded in a post (populated).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMedia {
    pub id: i64,
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    pub url: String,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
}

/// Body for post create/update on the content-manager API.
#[derive(Debug, Clone, Serialize)]
pub struct PostWriteRequest {
    pub title: String,
    pub description: String,
    pub content: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<RelationConnect>,
}

/// Relation payload: `{connect: [{id}]}`.
#[derive(Debug, Clone, Serialize)]
pub struct RelationConnect {
    pub connect: Vec<RelationId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationId {
    pub id: String,
}

impl RelationConnect {
    pub fn single(id: impl Into<String>) -> Self {
        Self {
            connect: vec![RelationId { id: id.into() }],
        }
    }
}

/// Body for category writes. The backend model stores the display label in
/// `text` and slug-like data in `description`.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWriteRequest {
    pub text: String,
    pub description: String,
}

/// Response of publish/unpublish actions. Older backends reply with an empty
/// body, newer ones with the affected entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub data: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_ignores_blank_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":{"status":400,"message":"  "}}"#).expect("body");
        assert_eq!(body.message(), None);

        let body: ErrorBody =
            serde_json::from_str(r#"{"error":{"status":400,"message":"Invalid credentials"}}"#)
                .expect("body");
        assert_eq!(body.message(), Some("Invalid credentials"));
    }

    #[test]
    fn content_manager_page_tolerates_missing_fields() {
        let page: ContentManagerPage<Value> = serde_json::from_str("{}").expect("page");
        assert!(page.results.is_empty());
        assert_eq!(page.pagination, PaginationMeta::default());
    }

    #[test]
    fn post_write_request_omits_empty_category() {
        let body = PostWriteRequest {
            title: "T".into(),
            description: String::new(),
            content: String::new(),
            slug: "t".into(),
            category: None,
        };
        let value = serde_json::to_value(body).expect("json");
        assert!(value.get("category").is_none());

        let body = PostWriteRequest {
            title: "T".into(),
            description: String::new(),
            content: String::new(),
            slug: "t".into(),
            category: Some(RelationConnect::single("7")),
        };
        let value = serde_json::to_value(body).expect("json");
        assert_eq!(value["category"]["connect"][0]["id"], "7");
    }

    #[test]
    fn raw_post_parses_backend_timestamps() {
        let raw: RawPost = serde_json::from_str(
            r#"{"id":1,"documentId":"abc","title":"Hello","slug":"hello",
                "publishedAt":null,"createdAt":"2024-05-01T10:00:00.000Z",
                "updatedAt":"2024-05-02T10:00:00.000Z"}"#,
        )
        .expect("raw post");
        assert_eq!(raw.document_id, "abc");
        assert!(raw.published_at.is_none());
        assert_eq!(raw.created_at.year(), 2024);
    }
}
