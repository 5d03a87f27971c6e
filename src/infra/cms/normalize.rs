//! Conversion of backend entries into domain models.
//!
//! Posts arrive in a fixed shape and are decoded through the wire types.
//! Categories do not: depending on the endpoint and backend version they
//! carry their fields flat or under `attributes`, and label themselves with
//! `text` or `name`. They are read from raw JSON.

use postdesk_api_types::{RawCategoryRef, RawMedia, RawPost};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::domain::entities::{Category, CategoryRef, MediaRef, Post};
use crate::domain::slug::derive_slug;
use crate::domain::types::{CategoryStatus, PostStatus};

pub(crate) const UNKNOWN_CATEGORY: &str = "Unknown Category";

pub(crate) fn post_from_raw(raw: RawPost) -> Post {
    let slug = raw
        .slug
        .filter(|slug| !slug.trim().is_empty())
        .unwrap_or_else(|| derive_slug(&raw.title).unwrap_or_default());

    Post {
        id: raw.id,
        status: PostStatus::resolve(raw.status.as_deref(), raw.published_at),
        document_id: raw.document_id,
        title: raw.title,
        description: raw.description,
        content: raw.content,
        slug,
        published_at: raw.published_at,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
        category: raw.category.map(category_ref_from_raw),
        image: raw.image.map(media_from_raw),
    }
}

fn category_ref_from_raw(raw: RawCategoryRef) -> CategoryRef {
    let name = raw
        .text
        .or(raw.name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
    CategoryRef {
        id: raw.id,
        document_id: raw.document_id,
        name,
        description: raw.description,
        published_at: raw.published_at,
    }
}

fn media_from_raw(raw: RawMedia) -> MediaRef {
    MediaRef {
        id: raw.id,
        document_id: raw.document_id,
        name: raw.name,
        alternative_text: raw.alternative_text,
        caption: raw.caption,
        width: raw.width,
        height: raw.height,
        url: raw.url,
        mime: raw.mime,
        size: raw.size,
    }
}

/// Pull the category list out of a listing body.
///
/// `results` (content-manager) is preferred over `data` (REST). A present
/// array, even an empty one, or an explicit `null` counts as an answer;
/// any other shape yields `None` so the caller can try the next source.
pub(crate) fn categories_from_listing(body: &Value) -> Option<Vec<Category>> {
    let list = ["results", "data"]
        .into_iter()
        .find_map(|key| match body.get(key) {
            Some(Value::Array(items)) => Some(items.as_slice()),
            Some(Value::Null) => Some(&[][..]),
            _ => None,
        })?;
    Some(list.iter().filter_map(category_from_value).collect())
}

/// Normalize one category entry. Non-objects are dropped.
pub(crate) fn category_from_value(entry: &Value) -> Option<Category> {
    if !entry.is_object() {
        return None;
    }

    let label = text_of(entry, "text").or_else(|| text_of(entry, "name"));
    let name = label
        .or_else(|| attribute_text(entry, "text"))
        .or_else(|| attribute_text(entry, "name"))
        .unwrap_or(UNKNOWN_CATEGORY)
        .to_string();
    let slug = text_of(entry, "slug")
        .or_else(|| attribute_text(entry, "slug"))
        .map(str::to_string)
        .unwrap_or_else(|| derive_slug(label.unwrap_or("unknown")).unwrap_or_else(|_| "unknown".into()));
    let description = lookup(entry, "description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let published_at = timestamp(entry, "publishedAt");

    Some(Category {
        id: entry.get("id").and_then(Value::as_i64).unwrap_or_default(),
        document_id: entry
            .get("documentId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        name,
        slug,
        description,
        created_at: timestamp(entry, "createdAt"),
        updated_at: timestamp(entry, "updatedAt"),
        published_at,
        status: if published_at.is_some() {
            CategoryStatus::Published
        } else {
            CategoryStatus::Draft
        },
    })
}

/// Read `publishedAt` from an action response entry.
pub(crate) fn published_at_of(entry: &Value) -> Option<OffsetDateTime> {
    timestamp(entry, "publishedAt")
}

fn text_of<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

fn attribute_text<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry.get("attributes").and_then(|attrs| text_of(attrs, key))
}

/// Flat field first, then the `attributes` envelope. Null counts as absent.
fn lookup<'a>(entry: &'a Value, key: &str) -> Option<&'a Value> {
    entry
        .get(key)
        .filter(|value| !value.is_null())
        .or_else(|| {
            entry
                .get("attributes")
                .and_then(|attrs| attrs.get(key))
                .filter(|value| !value.is_null())
        })
}

fn timestamp(entry: &Value, key: &str) -> Option<OffsetDateTime> {
    lookup(entry, key)
        .and_then(Value::as_str)
        .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_name_falls_back_through_shapes() {
        let flat = category_from_value(&json!({"id": 1, "documentId": "a", "text": "News"}))
            .expect("category");
        assert_eq!(flat.name, "News");
        assert_eq!(flat.slug, "news");
        assert_eq!(flat.status, CategoryStatus::Draft);

        let nested = category_from_value(&json!({
            "id": 2,
            "attributes": {"name": "Deep Dives", "slug": "deep", "publishedAt": "2024-05-01T10:00:00.000Z"}
        }))
        .expect("category");
        assert_eq!(nested.name, "Deep Dives");
        assert_eq!(nested.slug, "deep");
        assert_eq!(nested.status, CategoryStatus::Published);

        let unnamed = category_from_value(&json!({"id": 3})).expect("category");
        assert_eq!(unnamed.name, UNKNOWN_CATEGORY);
        assert_eq!(unnamed.slug, "unknown");
    }

    #[test]
    fn listing_accepts_empty_and_null_but_not_unknown_shapes() {
        assert_eq!(categories_from_listing(&json!({"results": []})), Some(vec![]));
        assert_eq!(categories_from_listing(&json!({"data": null})), Some(vec![]));
        assert_eq!(categories_from_listing(&json!({"items": []})), None);
        assert_eq!(categories_from_listing(&json!([])), None);

        let listed = categories_from_listing(&json!({"data": [{"id": 1, "name": "A"}, 7]}))
            .expect("listing");
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn post_keeps_modified_status_and_derives_missing_slug() {
        let raw: RawPost = serde_json::from_value(json!({
            "id": 5,
            "documentId": "doc-5",
            "title": "Hello World",
            "status": "modified",
            "publishedAt": "2024-05-02T10:00:00.000Z",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-03T10:00:00.000Z",
            "category": {"id": 9, "documentId": "c9", "text": "News"}
        }))
        .expect("raw post");

        let post = post_from_raw(raw);
        assert_eq!(post.status, PostStatus::Modified);
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.category.expect("category").name, "News");
    }
}
