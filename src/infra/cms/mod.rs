//! HTTP client for the headless CMS.
//!
//! Every call except login takes the bearer token explicitly; the session
//! store owns the token and hands out snapshots.

mod auth;
mod categories;
mod normalize;
mod posts;
mod query;

#[cfg(test)]
mod tests;

use std::time::Duration;

use postdesk_api_types::ErrorBody;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::application::error::CmsError;
use crate::application::pagination::DEFAULT_PAGE_SIZE;

pub use query::{SortDirection, StrapiQuery};

/// Backend used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1337";

pub(crate) const POSTS_PATH: &str = "/content-manager/collection-types/api::post.post";
pub(crate) const CATEGORIES_PATH: &str = "/content-manager/collection-types/api::category.category";
pub(crate) const REST_POSTS_PATH: &str = "/api/posts";
pub(crate) const REST_CATEGORIES_PATH: &str = "/api/categories";
pub(crate) const LOGIN_PATH: &str = "/admin/login";

/// Normalize a configured base URL: blank means the local default, a missing
/// scheme gets `https://`, trailing slashes are dropped.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    with_scheme.trim_end_matches('/').to_string()
}

#[derive(Clone, Debug)]
pub struct CmsClient {
    client: Client,
    base: Url,
    api_token: Option<String>,
    page_size: u32,
}

impl CmsClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, CmsError> {
        let base = Url::parse(&normalize_base_url(base_url))?;
        let mut builder = Client::builder().user_agent(Self::user_agent());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base,
            api_token: None,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Static token used for the public read endpoints.
    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|token| !token.trim().is_empty());
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn user_agent() -> &'static str {
        concat!("postdesk/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub(crate) fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// Join `path` onto the base URL, keeping any path prefix the base has.
    pub(crate) fn url(&self, path: &str, query: &StrapiQuery) -> Result<Url, CmsError> {
        let mut url = Url::parse(&format!(
            "{}{}",
            self.base.as_str().trim_end_matches('/'),
            path
        ))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.pairs() {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &StrapiQuery,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<Response, CmsError> {
        let url = self.url(path, query)?;
        debug!(%method, %url, authenticated = token.is_some(), "cms request");

        let mut req = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        Ok(req.send().await?)
    }

    /// Authenticated request; an empty token fails before any I/O.
    pub(crate) async fn authed(
        &self,
        method: Method,
        path: &str,
        query: &StrapiQuery,
        token: &str,
        body: Option<Value>,
    ) -> Result<Response, CmsError> {
        let token = require_token(token)?;
        self.send(method, path, query, Some(token), body).await
    }
}

pub(crate) fn require_token(token: &str) -> Result<&str, CmsError> {
    if token.trim().is_empty() {
        Err(CmsError::AuthRequired)
    } else {
        Ok(token)
    }
}

pub(crate) fn to_body<T: Serialize>(value: &T) -> Result<Value, CmsError> {
    serde_json::to_value(value).map_err(|err| CmsError::InvalidInput(err.to_string()))
}

/// Decode a 2xx body, or map the failure.
pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: Response,
    action: &str,
) -> Result<T, CmsError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(failure(status, &bytes, action));
    }
    serde_json::from_slice(&bytes)
        .map_err(|err| CmsError::Decode(format!("failed to {action}: {err}")))
}

/// Like [`read_json`], but an empty 2xx body decodes as `T::default()`.
pub(crate) async fn read_json_or_default<T: DeserializeOwned + Default>(
    resp: Response,
    action: &str,
) -> Result<T, CmsError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(failure(status, &bytes, action));
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(&bytes)
        .map_err(|err| CmsError::Decode(format!("failed to {action}: {err}")))
}

pub(crate) async fn expect_success(resp: Response, action: &str) -> Result<(), CmsError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let bytes = resp.bytes().await.unwrap_or_default();
    Err(failure(status, &bytes, action))
}

/// Backend message when the error body carries one, otherwise a message
/// derived from the status.
pub(crate) fn failure(status: StatusCode, body: &[u8], action: &str) -> CmsError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message().map(str::to_string))
        .unwrap_or_else(|| format!("Failed to {action}: {}", status.as_u16()));
    CmsError::http(status, message)
}

/// Write endpoints answer either with the bare entry or with `{data: entry}`.
pub(crate) fn unwrap_entry(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
