use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::slug::slug_or_derive;
use crate::domain::types::{CategoryStatus, PostStatus};

/// A post as shown in the manager. `document_id` is the stable identifier
/// used by every mutation endpoint; `id` is the backend row id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: i64,
    pub document_id: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub slug: String,
    pub status: PostStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub category: Option<CategoryRef>,
    pub image: Option<MediaRef>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRef {
    pub id: i64,
    pub document_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaRef {
    pub id: i64,
    pub document_id: String,
    pub name: String,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub url: String,
    pub mime: Option<String>,
    pub size: Option<f64>,
}

/// A category normalized from whichever shape the backend returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub document_id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    pub status: CategoryStatus,
}

/// Post form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    pub slug: String,
    pub category_id: Option<String>,
}

impl PostDraft {
    /// Validate the form and fill in a slug derived from the title when the
    /// slug field was left empty.
    pub fn normalized(&self) -> Result<PostDraft, DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }
        let slug = slug_or_derive(&self.slug, &self.title)
            .map_err(|err| DomainError::validation(err.to_string()))?;
        let category_id = self
            .category_id
            .as_ref()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Ok(PostDraft {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            content: self.content.clone(),
            slug,
            category_id,
        })
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            description: post.description.clone().unwrap_or_default(),
            content: post.content.clone().unwrap_or_default(),
            slug: post.slug.clone(),
            category_id: post.category.as_ref().map(|category| category.id.to_string()),
        }
    }
}

/// Category form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
}

impl CategoryDraft {
    pub fn normalized(&self) -> Result<CategoryDraft, DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("category name must not be empty"));
        }
        let slug = slug_or_derive(&self.slug, &self.name)
            .map_err(|err| DomainError::validation(err.to_string()))?;
        Ok(CategoryDraft {
            name: self.name.trim().to_string(),
            slug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_draft_derives_missing_slug() {
        let draft = PostDraft {
            title: " Launch Notes ".into(),
            category_id: Some("  ".into()),
            ..Default::default()
        };
        let normalized = draft.normalized().expect("valid draft");
        assert_eq!(normalized.title, "Launch Notes");
        assert_eq!(normalized.slug, "launch-notes");
        assert_eq!(normalized.category_id, None);
    }

    #[test]
    fn post_draft_requires_title() {
        let err = PostDraft::default().normalized().expect_err("empty title");
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn category_draft_keeps_explicit_slug() {
        let draft = CategoryDraft {
            name: "Release Notes".into(),
            slug: "releases".into(),
        };
        assert_eq!(draft.normalized().expect("valid").slug, "releases");
    }
}
