//! Mutation orchestration for the posts manager.
//!
//! Create and update return their errors so an edit form can stay open;
//! delete and publish toggles only report failures through toasts. Every
//! applied write reloads the shared listing.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::application::error::CmsError;
use crate::application::listing::PostListController;
use crate::application::notify::{Notifier, Toast};
use crate::application::repos::{CategoriesRepo, PostsWriteRepo};
use crate::application::session::SessionStore;
use crate::domain::entities::{Category, CategoryDraft, Post, PostDraft};

/// Result of a write whose failure is reported rather than returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOutcome {
    Applied,
    Declined,
    Failed,
}

impl MutationOutcome {
    /// Whether the caller should reload its list.
    pub fn changed(self) -> bool {
        self == MutationOutcome::Applied
    }
}

#[derive(Clone)]
pub struct PostEditor {
    session: Arc<SessionStore>,
    posts: Arc<dyn PostsWriteRepo>,
    categories: Arc<dyn CategoriesRepo>,
    listing: Arc<PostListController>,
    notifier: Arc<dyn Notifier>,
}

impl PostEditor {
    pub fn new(
        session: Arc<SessionStore>,
        posts: Arc<dyn PostsWriteRepo>,
        categories: Arc<dyn CategoriesRepo>,
        listing: Arc<PostListController>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            posts,
            categories,
            listing,
            notifier,
        }
    }

    /// Create a post (auto-published on a best-effort basis).
    pub async fn create_post(&self, draft: &PostDraft) -> Result<Post, CmsError> {
        let result = async {
            let token = self.session.require_token()?;
            self.posts.create_post(&token, draft).await
        }
        .await;

        let result = self.report(result, "create post", |post| {
            info!(document_id = %post.document_id, status = post.status.as_str(), "post created");
            "Post created successfully!".to_string()
        });
        if result.is_ok() {
            self.reload_posts().await;
        }
        result
    }

    pub async fn update_post(&self, document_id: &str, draft: &PostDraft) -> Result<Post, CmsError> {
        let result = async {
            let token = self.session.require_token()?;
            self.posts.update_post(&token, document_id, draft).await
        }
        .await;

        let result = self.report(result, "update post", |post| {
            info!(document_id = %post.document_id, "post updated");
            "Post updated successfully!".to_string()
        });
        if result.is_ok() {
            self.reload_posts().await;
        }
        result
    }

    /// Delete after the confirmation gate approves. Failures are reported,
    /// never returned.
    pub async fn delete_post<F>(&self, post: &Post, confirm: F) -> MutationOutcome
    where
        F: FnOnce(&Post) -> bool,
    {
        if !confirm(post) {
            info!(document_id = %post.document_id, "delete declined");
            return MutationOutcome::Declined;
        }

        let result = async {
            let token = self.session.require_token()?;
            self.posts.delete_post(&token, &post.document_id).await
        }
        .await;

        let outcome = self.swallow(result, "delete post", || {
            info!(document_id = %post.document_id, "post deleted");
            "Post deleted successfully!"
        });
        if outcome.changed() {
            self.reload_posts().await;
        }
        outcome
    }

    /// Publish a draft or unpublish a published post, decided by
    /// `published_at`. Failures are reported, never returned.
    pub async fn toggle_publish(&self, post: &Post) -> MutationOutcome {
        let publishing = !post.is_published();
        let result = async {
            let token = self.session.require_token()?;
            if publishing {
                self.posts.publish_post(&token, &post.document_id).await
            } else {
                self.posts.unpublish_post(&token, &post.document_id).await
            }
        }
        .await;

        let (action, done) = if publishing {
            ("publish post", "Post published successfully!")
        } else {
            ("unpublish post", "Post unpublished successfully!")
        };
        let outcome = self.swallow(result, action, || {
            info!(document_id = %post.document_id, publishing, "publish state toggled");
            done
        });
        if outcome.changed() {
            self.reload_posts().await;
        }
        outcome
    }

    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, CmsError> {
        let result = async {
            let token = self.session.require_token()?;
            self.categories.create_category(&token, draft).await
        }
        .await;

        let result = self.report(result, "create category", |category| {
            info!(document_id = %category.document_id, name = %category.name, "category created");
            "Category created successfully!".to_string()
        });
        if result.is_ok() {
            self.reload_categories().await;
        }
        result
    }

    pub async fn update_category(
        &self,
        document_id: &str,
        draft: &CategoryDraft,
    ) -> Result<Category, CmsError> {
        let result = async {
            let token = self.session.require_token()?;
            self.categories
                .update_category(&token, document_id, draft)
                .await
        }
        .await;

        let result = self.report(result, "update category", |_| {
            "Category updated successfully!".to_string()
        });
        if result.is_ok() {
            self.reload_categories().await;
        }
        result
    }

    pub async fn delete_category<F>(&self, category: &Category, confirm: F) -> MutationOutcome
    where
        F: FnOnce(&Category) -> bool,
    {
        if !confirm(category) {
            return MutationOutcome::Declined;
        }

        let result = async {
            let token = self.session.require_token()?;
            self.categories
                .delete_category(&token, &category.document_id)
                .await
        }
        .await;

        let outcome = self.swallow(result, "delete category", || "Category deleted successfully!");
        if outcome.changed() {
            self.reload_categories().await;
        }
        outcome
    }

    /// The listing reports its own load failures.
    async fn reload_posts(&self) {
        if let Err(err) = self.listing.reload().await {
            debug!(error = %err, "post list reload after write failed");
        }
    }

    async fn reload_categories(&self) {
        if let Err(err) = self.listing.load_categories().await {
            warn!(error = %err, "category reload after write failed");
        }
    }

    fn report<T>(
        &self,
        result: Result<T, CmsError>,
        action: &'static str,
        on_success: impl FnOnce(&T) -> String,
    ) -> Result<T, CmsError> {
        match result {
            Ok(value) => {
                self.notifier.notify(Toast::success(on_success(&value)));
                Ok(value)
            }
            Err(err) => {
                error!(action, error = %err, "mutation failed");
                self.notifier.notify(Toast::error(err.to_string()));
                Err(err)
            }
        }
    }

    fn swallow(
        &self,
        result: Result<(), CmsError>,
        action: &'static str,
        on_success: impl FnOnce() -> &'static str,
    ) -> MutationOutcome {
        match result {
            Ok(()) => {
                self.notifier.notify(Toast::success(on_success()));
                MutationOutcome::Applied
            }
            Err(err) => {
                error!(action, error = %err, "mutation failed");
                self.notifier.notify(Toast::error(err.to_string()));
                MutationOutcome::Failed
            }
        }
    }
}
