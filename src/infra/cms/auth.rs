use async_trait::async_trait;
use postdesk_api_types::{ErrorBody, LoginRequest, LoginResponse};
use reqwest::Method;
use tracing::{debug, info};

use super::{CmsClient, LOGIN_PATH, POSTS_PATH, StrapiQuery, to_body};
use crate::application::error::CmsError;
use crate::application::repos::AuthGateway;

#[async_trait]
impl AuthGateway for CmsClient {
    async fn login(&self, email: &str, password: &str) -> Result<String, CmsError> {
        let body = to_body(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        let resp = self
            .send(Method::POST, LOGIN_PATH, &StrapiQuery::new(), None, Some(body))
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message().map(str::to_string))
                .unwrap_or_else(|| format!("Admin login failed: {}", status.as_u16()));
            return Err(CmsError::auth(message));
        }

        let parsed: LoginResponse = serde_json::from_slice(&bytes)
            .map_err(|err| CmsError::Decode(format!("failed to decode login response: {err}")))?;
        info!(email, "admin login accepted");
        Ok(parsed.data.token)
    }

    async fn validate_token(&self, token: &str) -> bool {
        let query = StrapiQuery::new().page(1, 1);
        match self.authed(Method::GET, POSTS_PATH, &query, token, None).await {
            Ok(resp) => {
                let valid = resp.status().is_success();
                debug!(status = %resp.status(), valid, "token validation");
                valid
            }
            Err(err) => {
                debug!(error = %err, "token validation failed");
                false
            }
        }
    }
}
