//! Slug derivation for posts and categories.
//!
//! Slugs are lower-case ASCII with `-` separators. A derived slug is only a
//! suggestion: forms keep whatever the editor typed into the slug field.

use slug::slugify;
use thiserror::Error;

/// Errors that can occur while deriving a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Keep an explicitly supplied slug, otherwise derive one from `source`.
pub fn slug_or_derive(explicit: &str, source: &str) -> Result<String, SlugError> {
    let explicit = explicit.trim();
    if explicit.is_empty() {
        derive_slug(source)
    } else {
        Ok(explicit.to_string())
    }
}
