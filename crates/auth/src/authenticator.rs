//! Composition of extraction, verification and profile resolution.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;

use crate::cache::ValidationCache;
use crate::context::{AuthContext, ProfileAttributes};
use crate::credential;
use crate::error::AuthError;
use crate::profile::ProfileStore;
use crate::provider::{IdentityError, IdentityProvider, VerifiedIdentity};
use crate::role::Role;

/// Runs the authentication pipeline once per request:
/// header, credential, verified identity, profile, [`AuthContext`].
///
/// The provider and profile store are injected, so transports wire real
/// clients and tests wire doubles. The first failure short-circuits the rest
/// of the pipeline; nothing here retries. If the surrounding request is
/// aborted the in-flight call is simply dropped, and since the cache is only
/// written after a complete provider verification, a partial run can never
/// produce a cached result.
pub struct Authenticator {
    provider: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    cache: Option<ValidationCache>,
}

impl Authenticator {
    pub fn new(provider: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            provider,
            profiles,
            cache: None,
        }
    }

    /// Cache verification results for `ttl`.
    ///
    /// The cache only ever saves a provider round-trip; it cannot outlive the
    /// credential itself. See [`ValidationCache`].
    pub fn with_validation_cache(mut self, ttl: Duration) -> Self {
        self.cache = Some(ValidationCache::new(ttl));
        self
    }

    /// Authenticate a request from its raw `Authorization` header value.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<AuthContext, AuthError> {
        let token = credential::extract_bearer(authorization)?;
        let identity = self.verify(token).await?;

        let record = self
            .profiles
            .get_profile(&identity.subject_id)
            .await
            .map_err(|e| AuthError::UpstreamUnavailable(e.to_string()))?
            .ok_or_else(|| AuthError::ProfileNotFound(identity.subject_id.clone()))?;

        let role = Role::from_str(&record.role).map_err(|_| AuthError::ProfileCorrupt {
            subject: record.subject_id.clone(),
            role: record.role.clone(),
        })?;

        tracing::debug!(
            subject_id = %record.subject_id,
            role = role.as_str(),
            "request authenticated"
        );

        Ok(AuthContext::new(
            record.subject_id,
            record.email,
            record.display_name,
            role,
            ProfileAttributes {
                phone: record.phone,
                company: record.company,
                department: record.department,
                experience: record.experience,
            },
        ))
    }

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        if let Some(cache) = &self.cache {
            if let Some(identity) = cache.get(token) {
                return Ok(identity);
            }
        }

        let identity = self.provider.verify(token).await.map_err(|e| match e {
            IdentityError::Rejected(reason) => {
                tracing::warn!(reason = %reason, "credential rejected");
                AuthError::InvalidCredential
            }
            IdentityError::Unavailable(reason) => AuthError::UpstreamUnavailable(reason),
        })?;

        if let Some(cache) = &self.cache {
            cache.insert(token, identity.clone());
        }

        Ok(identity)
    }
}
