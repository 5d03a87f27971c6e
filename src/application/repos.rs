//! Traits describing the backend adapters the application services depend on.

use async_trait::async_trait;

use crate::application::error::{CmsError, StorageError};
use crate::application::pagination::PaginationState;
use crate::domain::entities::{Category, CategoryDraft, Post, PostDraft};

/// Storage slot holding the bearer token.
pub const TOKEN_KEY: &str = "posts_manager_auth_token";
/// Storage slot holding the signed-in email.
pub const EMAIL_KEY: &str = "posts_manager_email";

/// Durable key-value persistence for the remembered session.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<String, CmsError>;

    /// Cheap authenticated read; any failure means "not valid".
    async fn validate_token(&self, token: &str) -> bool;
}

/// Listing parameters for posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
}

impl PostQuery {
    pub fn new(page: u32, page_size: u32, search: &str) -> Self {
        let search = search.trim();
        Self {
            page: page.max(1),
            page_size,
            search: (!search.is_empty()).then(|| search.to_string()),
        }
    }
}

/// One page of posts plus the backend's pagination report.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub items: Vec<Post>,
    pub pagination: PaginationState,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list_posts(&self, token: &str, query: &PostQuery) -> Result<PostPage, CmsError>;

    async fn find_post_by_slug(&self, token: &str, slug: &str) -> Result<Option<Post>, CmsError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Create a post and attempt to publish it. A failed publish still yields
    /// the created (draft) post.
    async fn create_post(&self, token: &str, draft: &PostDraft) -> Result<Post, CmsError>;

    async fn update_post(
        &self,
        token: &str,
        document_id: &str,
        draft: &PostDraft,
    ) -> Result<Post, CmsError>;

    async fn delete_post(&self, token: &str, document_id: &str) -> Result<(), CmsError>;

    async fn publish_post(&self, token: &str, document_id: &str) -> Result<(), CmsError>;

    async fn unpublish_post(&self, token: &str, document_id: &str) -> Result<(), CmsError>;
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    /// Never fails because of backend shape problems: exhausting every
    /// candidate endpoint yields an empty list.
    async fn list_categories(&self, token: &str) -> Result<Vec<Category>, CmsError>;

    async fn create_category(&self, token: &str, draft: &CategoryDraft)
    -> Result<Category, CmsError>;

    async fn update_category(
        &self,
        token: &str,
        document_id: &str,
        draft: &CategoryDraft,
    ) -> Result<Category, CmsError>;

    async fn delete_category(&self, token: &str, document_id: &str) -> Result<(), CmsError>;
}
