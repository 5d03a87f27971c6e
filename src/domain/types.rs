//! Shared domain enumerations.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Editorial status of a post.
///
/// `Modified` is only ever reported by the backend (a published entry with
/// unpublished changes); the client never computes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Modified,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Modified => "modified",
            PostStatus::Published => "published",
        }
    }

    /// Resolve the status from what the backend reported and the publication
    /// timestamp. Only `modified` is taken verbatim.
    pub fn resolve(reported: Option<&str>, published_at: Option<OffsetDateTime>) -> Self {
        if reported.is_some_and(|value| value.eq_ignore_ascii_case("modified")) {
            return PostStatus::Modified;
        }
        if published_at.is_some() {
            PostStatus::Published
        } else {
            PostStatus::Draft
        }
    }
}

/// Publication status of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    Draft,
    Published,
}

impl CategoryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryStatus::Draft => "draft",
            CategoryStatus::Published => "published",
        }
    }
}
