//! Page-number pagination state.

use postdesk_api_types::PaginationMeta;
use serde::Serialize;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Invariant: `1 <= page <= max(page_count, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    page: u32,
    page_size: u32,
    page_count: u32,
    total: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// State before anything has been loaded.
    pub fn first(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            page_count: 1,
            total: 0,
        }
    }

    /// Build from the backend report. Missing values fall back to the request;
    /// the page is clamped into range.
    pub fn from_meta(meta: &PaginationMeta, requested_page: u32, page_size: u32) -> Self {
        let page_size = if meta.page_size > 0 {
            meta.page_size
        } else {
            page_size.max(1)
        };
        let page_count = meta.page_count;
        let page = if meta.page > 0 {
            meta.page
        } else {
            requested_page
        };
        Self {
            page: page.clamp(1, page_count.max(1)),
            page_size,
            page_count,
            total: meta.total,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of navigable pages; an empty listing still has page 1.
    pub fn total_pages(&self) -> u32 {
        self.page_count.max(1)
    }

    pub fn contains(&self, page: u32) -> bool {
        (1..=self.total_pages()).contains(&page)
    }

    pub fn next(&self) -> Option<u32> {
        let next = self.page.checked_add(1)?;
        self.contains(next).then_some(next)
    }

    pub fn previous(&self) -> Option<u32> {
        let previous = self.page.checked_sub(1)?;
        self.contains(previous).then_some(previous)
    }
}
