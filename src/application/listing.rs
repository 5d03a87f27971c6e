//! Paged, searchable post listing with a debounced search box.
//!
//! In-flight loads are never cancelled; whichever response resolves last
//! overwrites the snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::error::CmsError;
use crate::application::notify::{Notifier, Toast};
use crate::application::pagination::{DEFAULT_PAGE_SIZE, PaginationState};
use crate::application::repos::{CategoriesRepo, PostQuery, PostsRepo};
use crate::application::session::SessionStore;
use crate::domain::entities::{Category, Post};
use crate::util::lock::{rw_read, rw_write};

const LOCK_TARGET: &str = "application::listing";

/// Default quiet period before a search term is sent.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum ListError {
    #[error(transparent)]
    Cms(#[from] CmsError),
    #[error("page {requested} is out of range (1..={total_pages})")]
    PageOutOfRange { requested: u32, total_pages: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub page_size: u32,
    pub search_debounce: Duration,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

/// What the list view renders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListSnapshot {
    pub items: Vec<Post>,
    pub pagination: PaginationState,
    pub search: String,
    pub loading: bool,
}

impl ListSnapshot {
    pub fn current_page(&self) -> u32 {
        self.pagination.page()
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.total_pages()
    }
}

#[derive(Debug, Default)]
struct ListState {
    items: Vec<Post>,
    pagination: Option<PaginationState>,
    search: String,
    categories: Vec<Category>,
}

pub struct PostListController {
    session: Arc<SessionStore>,
    posts: Arc<dyn PostsRepo>,
    categories: Arc<dyn CategoriesRepo>,
    notifier: Arc<dyn Notifier>,
    options: ListOptions,
    state: RwLock<ListState>,
    in_flight: AtomicU64,
    search_generation: AtomicU64,
}

/// Keeps the loading indicator up while at least one load is pending.
struct LoadingGuard<'a> {
    counter: &'a AtomicU64,
}

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicU64) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PostListController {
    pub fn new(
        session: Arc<SessionStore>,
        posts: Arc<dyn PostsRepo>,
        categories: Arc<dyn CategoriesRepo>,
        notifier: Arc<dyn Notifier>,
        options: ListOptions,
    ) -> Self {
        Self {
            session,
            posts,
            categories,
            notifier,
            options: ListOptions {
                page_size: options.page_size.max(1),
                ..options
            },
            state: RwLock::new(ListState::default()),
            in_flight: AtomicU64::new(0),
            search_generation: AtomicU64::new(0),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let state = rw_read(&self.state, LOCK_TARGET, "snapshot");
        ListSnapshot {
            items: state.items.clone(),
            pagination: self.pagination_of(&state),
            search: state.search.clone(),
            loading: self.is_loading(),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.pagination().page()
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination().total_pages()
    }

    pub fn categories(&self) -> Vec<Category> {
        rw_read(&self.state, LOCK_TARGET, "categories")
            .categories
            .clone()
    }

    /// Fetch `page` for `search`. On failure the previous items stay in
    /// place and an error toast is emitted.
    pub async fn load(&self, page: u32, search: &str) -> Result<ListSnapshot, ListError> {
        let query = PostQuery::new(page, self.options.page_size, search);
        let result = {
            let _loading = LoadingGuard::enter(&self.in_flight);
            match self.session.require_token() {
                Ok(token) => self.posts.list_posts(&token, &query).await,
                Err(err) => Err(err),
            }
        };

        match result {
            Ok(loaded) => {
                debug!(
                    page = loaded.pagination.page(),
                    items = loaded.items.len(),
                    "post page loaded"
                );
                let mut state = rw_write(&self.state, LOCK_TARGET, "load");
                state.items = loaded.items;
                state.pagination = Some(loaded.pagination);
                state.search = search.trim().to_string();
                drop(state);
                Ok(self.snapshot())
            }
            Err(err) => {
                warn!(page, error = %err, "failed to load posts");
                self.notifier.notify(Toast::error("Failed to load posts"));
                Err(err.into())
            }
        }
    }

    /// Reload the current page with the current search term.
    pub async fn reload(&self) -> Result<ListSnapshot, ListError> {
        let (page, search) = self.position();
        self.load(page, &search).await
    }

    /// Navigate to `page`. Out-of-range pages issue no request.
    pub async fn go_to(&self, page: u32) -> Result<ListSnapshot, ListError> {
        let pagination = self.pagination();
        if !pagination.contains(page) {
            return Err(ListError::PageOutOfRange {
                requested: page,
                total_pages: pagination.total_pages(),
            });
        }
        let (_, search) = self.position();
        self.load(page, &search).await
    }

    pub async fn next(&self) -> Result<ListSnapshot, ListError> {
        let pagination = self.pagination();
        match pagination.next() {
            Some(page) => self.go_to(page).await,
            None => Err(ListError::PageOutOfRange {
                requested: pagination.page().saturating_add(1),
                total_pages: pagination.total_pages(),
            }),
        }
    }

    pub async fn previous(&self) -> Result<ListSnapshot, ListError> {
        let pagination = self.pagination();
        match pagination.previous() {
            Some(page) => self.go_to(page).await,
            None => Err(ListError::PageOutOfRange {
                requested: pagination.page().saturating_sub(1),
                total_pages: pagination.total_pages(),
            }),
        }
    }

    /// Debounced search. Each call supersedes the pending one; only the last
    /// term within the quiet period reloads page 1.
    pub fn search(self: &Arc<Self>, term: &str) -> JoinHandle<Option<Result<ListSnapshot, ListError>>> {
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let controller = Arc::clone(self);
        let term = term.to_string();
        let delay = self.options.search_debounce;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if controller.search_generation.load(Ordering::SeqCst) != generation {
                debug!(term = %term, "search superseded");
                return None;
            }
            Some(controller.load(1, &term).await)
        })
    }

    /// Refresh the category snapshot used by post forms.
    pub async fn load_categories(&self) -> Result<Vec<Category>, ListError> {
        let token = self.session.require_token()?;
        let categories = self.categories.list_categories(&token).await?;
        rw_write(&self.state, LOCK_TARGET, "load_categories").categories = categories.clone();
        Ok(categories)
    }

    fn pagination(&self) -> PaginationState {
        let state = rw_read(&self.state, LOCK_TARGET, "pagination");
        self.pagination_of(&state)
    }

    fn pagination_of(&self, state: &ListState) -> PaginationState {
        state
            .pagination
            .unwrap_or_else(|| PaginationState::first(self.options.page_size))
    }

    fn position(&self) -> (u32, String) {
        let state = rw_read(&self.state, LOCK_TARGET, "position");
        (self.pagination_of(&state).page(), state.search.clone())
    }
}
