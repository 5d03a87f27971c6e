use async_trait::async_trait;
use postdesk_api_types::{
    ActionResponse, ContentManagerPage, DataEnvelope, PostWriteRequest, RawPost, RelationConnect,
};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error, info};

use super::normalize::{post_from_raw, published_at_of};
use super::{
    CmsClient, POSTS_PATH, REST_POSTS_PATH, SortDirection, StrapiQuery, expect_success,
    read_json, read_json_or_default, require_token, to_body, unwrap_entry,
};
use crate::application::error::CmsError;
use crate::application::pagination::PaginationState;
use crate::application::repos::{PostPage, PostQuery, PostsRepo, PostsWriteRepo};
use crate::domain::entities::{Post, PostDraft};
use crate::domain::types::PostStatus;

impl CmsClient {
    fn post_listing_query(query: &PostQuery) -> StrapiQuery {
        StrapiQuery::new()
            .page(query.page, query.page_size)
            .populate("category")
            .populate("image")
            .sort("createdAt", SortDirection::Desc)
    }

    fn post_path(document_id: &str) -> Result<String, CmsError> {
        let document_id = document_id.trim();
        if document_id.is_empty() {
            return Err(CmsError::InvalidInput("document id must not be empty".into()));
        }
        Ok(format!("{POSTS_PATH}/{document_id}"))
    }

    fn write_body(draft: &PostDraft) -> Result<Value, CmsError> {
        let draft = draft.normalized()?;
        to_body(&PostWriteRequest {
            title: draft.title,
            description: draft.description,
            content: draft.content,
            slug: draft.slug,
            category: draft.category_id.map(RelationConnect::single),
        })
    }

    fn decode_entry(body: Value, action: &str) -> Result<Post, CmsError> {
        let raw: RawPost = serde_json::from_value(unwrap_entry(body))
            .map_err(|err| CmsError::Decode(format!("failed to {action}: {err}")))?;
        Ok(post_from_raw(raw))
    }

    async fn post_action(
        &self,
        token: &str,
        document_id: &str,
        action: &str,
    ) -> Result<Option<Value>, CmsError> {
        let path = format!("{}/actions/{action}", Self::post_path(document_id)?);
        let resp = self
            .authed(Method::POST, &path, &StrapiQuery::new(), token, None)
            .await?;
        let body: ActionResponse =
            read_json_or_default(resp, &format!("{action} post")).await?;
        debug!(document_id, action, "post action applied");
        Ok(body.data)
    }

    /// Published posts from the public REST endpoint, read with the static
    /// API token when one is configured.
    pub async fn list_published_posts(&self, query: &PostQuery) -> Result<PostPage, CmsError> {
        let strapi = Self::post_listing_query(query)
            .contains_i("title", query.search.as_deref().unwrap_or_default());
        let resp = self
            .send(Method::GET, REST_POSTS_PATH, &strapi, self.api_token(), None)
            .await?;
        let envelope: DataEnvelope<Vec<RawPost>> = read_json(resp, "load posts").await?;

        let pagination = envelope
            .meta
            .and_then(|meta| meta.pagination)
            .map(|meta| PaginationState::from_meta(&meta, query.page, query.page_size))
            .unwrap_or_else(|| PaginationState::first(query.page_size));
        Ok(PostPage {
            items: envelope.data.into_iter().map(post_from_raw).collect(),
            pagination,
        })
    }
}

#[async_trait]
impl PostsRepo for CmsClient {
    async fn list_posts(&self, token: &str, query: &PostQuery) -> Result<PostPage, CmsError> {
        let strapi = Self::post_listing_query(query)
            .status("draft")
            .contains_i("title", query.search.as_deref().unwrap_or_default());
        let resp = self
            .authed(Method::GET, POSTS_PATH, &strapi, token, None)
            .await?;
        let page: ContentManagerPage<RawPost> = read_json(resp, "load posts").await?;

        debug!(
            page = query.page,
            results = page.results.len(),
            total = page.pagination.total,
            "posts loaded"
        );
        Ok(PostPage {
            pagination: PaginationState::from_meta(&page.pagination, query.page, query.page_size),
            items: page.results.into_iter().map(post_from_raw).collect(),
        })
    }

    async fn find_post_by_slug(&self, token: &str, slug: &str) -> Result<Option<Post>, CmsError> {
        let strapi = StrapiQuery::new()
            .page(1, 1)
            .populate("category")
            .populate("image")
            .status("draft")
            .equals("slug", slug.trim());
        let resp = self
            .authed(Method::GET, POSTS_PATH, &strapi, token, None)
            .await?;
        let page: ContentManagerPage<RawPost> = read_json(resp, "load post").await?;
        Ok(page.results.into_iter().next().map(post_from_raw))
    }
}

#[async_trait]
impl PostsWriteRepo for CmsClient {
    async fn create_post(&self, token: &str, draft: &PostDraft) -> Result<Post, CmsError> {
        require_token(token)?;
        let body = Self::write_body(draft)?;
        let resp = self
            .authed(Method::POST, POSTS_PATH, &StrapiQuery::new(), token, Some(body))
            .await?;
        let created: Value = read_json(resp, "create post").await?;
        let mut post = Self::decode_entry(created, "create post")?;
        info!(document_id = %post.document_id, slug = %post.slug, "post created");

        if post.document_id.is_empty() {
            return Ok(post);
        }
        match self.post_action(token, &post.document_id, "publish").await {
            Ok(entry) => {
                if let Some(published_at) = entry.as_ref().and_then(published_at_of) {
                    post.published_at = Some(published_at);
                    post.status = PostStatus::resolve(None, post.published_at);
                }
                info!(document_id = %post.document_id, "post auto-published");
            }
            Err(err) => {
                error!(document_id = %post.document_id, error = %err, "auto-publish failed; post kept as draft");
            }
        }
        Ok(post)
    }

    async fn update_post(
        &self,
        token: &str,
        document_id: &str,
        draft: &PostDraft,
    ) -> Result<Post, CmsError> {
        require_token(token)?;
        let path = Self::post_path(document_id)?;
        let body = Self::write_body(draft)?;
        let resp = self
            .authed(Method::PUT, &path, &StrapiQuery::new(), token, Some(body))
            .await?;
        let updated: Value = read_json(resp, "update post").await?;
        Self::decode_entry(updated, "update post")
    }

    async fn delete_post(&self, token: &str, document_id: &str) -> Result<(), CmsError> {
        let path = Self::post_path(document_id)?;
        let resp = self
            .authed(Method::DELETE, &path, &StrapiQuery::new(), token, None)
            .await?;
        expect_success(resp, "delete post").await?;
        info!(document_id, "post deleted");
        Ok(())
    }

    async fn publish_post(&self, token: &str, document_id: &str) -> Result<(), CmsError> {
        self.post_action(token, document_id, "publish").await.map(|_| ())
    }

    async fn unpublish_post(&self, token: &str, document_id: &str) -> Result<(), CmsError> {
        self.post_action(token, document_id, "unpublish")
            .await
            .map(|_| ())
    }
}
