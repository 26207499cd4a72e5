//! HTTP client for the identity provider's verification endpoint.

use std::time::Duration;

use atelier_auth::{IdentityError, IdentityProvider, VerifiedIdentity};
use atelier_core::SubjectId;
use reqwest::StatusCode;
use serde::Deserialize;

/// Verifies an access token by calling `GET {base_url}/auth/v1/user` with the
/// caller's credential as the bearer token and the service api key alongside,
/// the way GoTrue-style providers expose token introspection.
///
/// Failure mapping is deliberately conservative: only statuses the provider
/// documents as "bad credential" become [`IdentityError::Rejected`];
/// transport failures, timeouts and anything unexpected become
/// [`IdentityError::Unavailable`] so the pipeline fails closed without
/// blaming the caller.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    verify_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

impl HttpIdentityProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            verify_url: format!("{}/auth/v1/user", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, IdentityError> {
        let response = self
            .client
            .get(&self.verify_url)
            .bearer_auth(credential)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(IdentityError::Rejected(format!(
                    "provider returned {}",
                    response.status()
                )));
            }
            status => {
                return Err(IdentityError::Unavailable(format!(
                    "unexpected provider status {status}"
                )));
            }
        }

        let user: ProviderUser = response
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("undecodable provider body: {e}")))?;

        Ok(VerifiedIdentity {
            subject_id: SubjectId::new(user.id),
            email: user.email.unwrap_or_default(),
            expires_at: None,
            metadata: user.user_metadata,
        })
    }
}
