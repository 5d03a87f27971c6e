//! Sign-in against configured credentials instead of the admin login route.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::application::error::CmsError;
use crate::application::repos::AuthGateway;

/// Accepts exactly one configured email/password pair and hands out the
/// configured API token. Token validation is delegated to `validator`, which
/// performs a real authenticated read.
pub struct StaticCredentials {
    email: String,
    password: String,
    api_token: String,
    validator: Arc<dyn AuthGateway>,
}

impl StaticCredentials {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        api_token: impl Into<String>,
        validator: Arc<dyn AuthGateway>,
    ) -> Self {
        let email: String = email.into();
        Self {
            email: email.trim().to_string(),
            password: password.into(),
            api_token: api_token.into(),
            validator,
        }
    }
}

#[async_trait]
impl AuthGateway for StaticCredentials {
    async fn login(&self, email: &str, password: &str) -> Result<String, CmsError> {
        if self.api_token.is_empty() {
            return Err(CmsError::auth("no API token configured"));
        }
        if email.trim() != self.email.as_str() || password != self.password {
            warn!(email, "static credential mismatch");
            return Err(CmsError::auth("Invalid credentials"));
        }
        info!(email, "static credentials accepted");
        Ok(self.api_token.clone())
    }

    async fn validate_token(&self, token: &str) -> bool {
        self.validator.validate_token(token).await
    }
}
