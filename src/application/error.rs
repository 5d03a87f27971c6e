use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::error::DomainError;

/// Failures of CMS operations.
///
/// `Auth` and `AuthRequired` are kept apart from generic HTTP failures so the
/// session layer can react to them without string matching.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("authentication failed: {message}")]
    Auth { message: String },
    #[error("no auth token available")]
    AuthRequired,
    #[error("{message}")]
    Http { status: StatusCode, message: String },
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl CmsError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CmsError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CmsError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            CmsError::Decode(error.to_string())
        } else {
            CmsError::Network(error)
        }
    }
}

impl From<DomainError> for CmsError {
    fn from(error: DomainError) -> Self {
        CmsError::InvalidInput(error.to_string())
    }
}

/// Failures of the durable session storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session storage is corrupt: {0}")]
    Corrupt(String),
}
