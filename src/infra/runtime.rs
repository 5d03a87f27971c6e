//! Assembles the services from validated settings.

use std::sync::Arc;

use tracing::info;

use crate::application::listing::{ListOptions, PostListController};
use crate::application::notify::ToastLog;
use crate::application::posts::PostEditor;
use crate::application::repos::{AuthGateway, SessionStorage};
use crate::application::session::SessionStore;
use crate::config::{AuthMode, Settings};

use super::auth::StaticCredentials;
use super::cms::CmsClient;
use super::error::InfraError;
use super::storage::{FileStorage, MemoryStorage};

/// Long-lived service graph. One instance per process; every component
/// shares the same session store.
pub struct Runtime {
    pub settings: Settings,
    pub cms: CmsClient,
    pub toasts: Arc<ToastLog>,
    pub session: Arc<SessionStore>,
    pub editor: PostEditor,
    pub listing: Arc<PostListController>,
}

impl Runtime {
    pub fn build(settings: Settings) -> Result<Self, InfraError> {
        let cms = CmsClient::new(&settings.cms.base_url, settings.cms.request_timeout)?
            .with_api_token(settings.cms.api_token.clone())
            .with_page_size(settings.listing.page_size.get());
        let shared = Arc::new(cms.clone());

        let auth: Arc<dyn AuthGateway> = match settings.auth.mode {
            AuthMode::Admin => shared.clone(),
            AuthMode::StaticToken => {
                let (Some(email), Some(password), Some(token)) = (
                    settings.auth.admin_email.clone(),
                    settings.auth.admin_password.clone(),
                    settings.cms.api_token.clone(),
                ) else {
                    return Err(InfraError::configuration(
                        "static_token mode needs admin credentials and an API token",
                    ));
                };
                Arc::new(StaticCredentials::new(email, password, token, shared.clone()))
            }
        };

        let storage: Arc<dyn SessionStorage> = match settings.session.storage_path.as_ref() {
            Some(path) => Arc::new(FileStorage::new(path)),
            None => Arc::new(MemoryStorage::new()),
        };

        let toasts = Arc::new(ToastLog::new());
        let session = Arc::new(SessionStore::new(auth, storage, toasts.clone()));
        let listing = Arc::new(PostListController::new(
            session.clone(),
            shared.clone(),
            shared.clone(),
            toasts.clone(),
            ListOptions {
                page_size: settings.listing.page_size.get(),
                search_debounce: settings.listing.search_debounce,
            },
        ));
        let editor = PostEditor::new(
            session.clone(),
            shared.clone(),
            shared,
            listing.clone(),
            toasts.clone(),
        );

        info!(
            base_url = %cms.base_url(),
            auth_mode = ?settings.auth.mode,
            remembered = settings.session.storage_path.is_some(),
            "runtime assembled"
        );

        Ok(Self {
            settings,
            cms,
            toasts,
            session,
            editor,
            listing,
        })
    }
}
