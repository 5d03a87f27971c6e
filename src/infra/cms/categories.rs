use async_trait::async_trait;
use postdesk_api_types::{CategoryWriteRequest, DataWrapper};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::normalize::{categories_from_listing, category_from_value};
use super::{
    CATEGORIES_PATH, CmsClient, REST_CATEGORIES_PATH, StrapiQuery, expect_success, failure,
    read_json, require_token, to_body, unwrap_entry,
};
use crate::application::error::CmsError;
use crate::application::repos::CategoriesRepo;
use crate::domain::entities::{Category, CategoryDraft};

type Normalizer = fn(&Value) -> Option<Vec<Category>>;

/// One candidate endpoint of the category listing chain.
struct CategorySource {
    label: &'static str,
    path: &'static str,
    query: fn() -> StrapiQuery,
    normalize: Normalizer,
}

/// Tried strictly in order; the first usable answer wins.
const CATEGORY_SOURCES: [CategorySource; 4] = [
    CategorySource {
        label: "content-manager (draft)",
        path: CATEGORIES_PATH,
        query: || StrapiQuery::new().status("draft"),
        normalize: categories_from_listing,
    },
    CategorySource {
        label: "content-manager",
        path: CATEGORIES_PATH,
        query: StrapiQuery::new,
        normalize: categories_from_listing,
    },
    CategorySource {
        label: "rest (populated)",
        path: REST_CATEGORIES_PATH,
        query: || StrapiQuery::new().populate_all(),
        normalize: categories_from_listing,
    },
    CategorySource {
        label: "rest",
        path: REST_CATEGORIES_PATH,
        query: StrapiQuery::new,
        normalize: categories_from_listing,
    },
];

impl CmsClient {
    async fn try_category_source(
        &self,
        token: &str,
        source: &CategorySource,
    ) -> Result<Option<Vec<Category>>, CmsError> {
        let resp = self
            .authed(Method::GET, source.path, &(source.query)(), token, None)
            .await?;
        let body: Value = read_json(resp, "load categories").await?;
        Ok((source.normalize)(&body))
    }

    fn category_write_body(draft: &CategoryDraft) -> Result<CategoryWriteRequest, CmsError> {
        let draft = draft.normalized()?;
        Ok(CategoryWriteRequest {
            text: draft.name,
            description: draft.slug,
        })
    }

    fn rest_category_path(document_id: &str) -> Result<String, CmsError> {
        let document_id = document_id.trim();
        if document_id.is_empty() {
            return Err(CmsError::InvalidInput("document id must not be empty".into()));
        }
        Ok(format!("{REST_CATEGORIES_PATH}/{document_id}"))
    }

    fn decode_category(body: Value, action: &str) -> Result<Category, CmsError> {
        category_from_value(&unwrap_entry(body))
            .ok_or_else(|| CmsError::Decode(format!("failed to {action}: unexpected body")))
    }
}

#[async_trait]
impl CategoriesRepo for CmsClient {
    async fn list_categories(&self, token: &str) -> Result<Vec<Category>, CmsError> {
        require_token(token)?;

        for source in &CATEGORY_SOURCES {
            match self.try_category_source(token, source).await {
                Ok(Some(categories)) => {
                    debug!(source = source.label, count = categories.len(), "categories loaded");
                    return Ok(categories);
                }
                Ok(None) => {
                    warn!(source = source.label, "category source returned an unrecognized body");
                }
                Err(err) => {
                    warn!(source = source.label, error = %err, "category source failed");
                }
            }
        }

        error!("every category source failed; continuing without categories");
        Ok(Vec::new())
    }

    async fn create_category(
        &self,
        token: &str,
        draft: &CategoryDraft,
    ) -> Result<Category, CmsError> {
        require_token(token)?;
        let request = Self::category_write_body(draft)?;

        let resp = self
            .authed(
                Method::POST,
                CATEGORIES_PATH,
                &StrapiQuery::new(),
                token,
                Some(to_body(&request)?),
            )
            .await?;
        let resp = if resp.status().is_success() {
            resp
        } else {
            let status = resp.status();
            let bytes = resp.bytes().await.unwrap_or_default();
            warn!(
                error = %failure(status, &bytes, "create category"),
                "content-manager category create failed; retrying through REST"
            );
            self.authed(
                Method::POST,
                REST_CATEGORIES_PATH,
                &StrapiQuery::new(),
                token,
                Some(to_body(&DataWrapper { data: request })?),
            )
            .await?
        };

        let body: Value = read_json(resp, "create category").await?;
        let category = Self::decode_category(body, "create category")?;
        info!(document_id = %category.document_id, name = %category.name, "category created");
        Ok(category)
    }

    async fn update_category(
        &self,
        token: &str,
        document_id: &str,
        draft: &CategoryDraft,
    ) -> Result<Category, CmsError> {
        require_token(token)?;
        let path = Self::rest_category_path(document_id)?;
        let body = to_body(&DataWrapper {
            data: Self::category_write_body(draft)?,
        })?;
        let resp = self
            .authed(Method::PUT, &path, &StrapiQuery::new(), token, Some(body))
            .await?;
        let body: Value = read_json(resp, "update category").await?;
        Self::decode_category(body, "update category")
    }

    async fn delete_category(&self, token: &str, document_id: &str) -> Result<(), CmsError> {
        require_token(token)?;
        let path = Self::rest_category_path(document_id)?;
        let resp = self
            .authed(Method::DELETE, &path, &StrapiQuery::new(), token, None)
            .await?;
        expect_success(resp, "delete category").await?;
        info!(document_id, "category deleted");
        Ok(())
    }
}
