//! Identity provider boundary.

use atelier_core::SubjectId;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// What the identity provider asserts about a verified credential.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub subject_id: SubjectId,
    pub email: String,
    /// Credential expiry as asserted by the provider, when it reports one.
    /// The validation cache clamps its entries to this instant.
    pub expires_at: Option<DateTime<Utc>>,
    /// Provider-side user metadata, passed through opaquely.
    pub metadata: serde_json::Value,
}

/// Failure modes of a verification call.
///
/// `Rejected` is about the credential, `Unavailable` about the
/// infrastructure. Callers must not conflate them: the two map to different
/// wire semantics and log severities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("credential rejected: {0}")]
    Rejected(String),

    #[error("identity provider unreachable: {0}")]
    Unavailable(String),
}

/// Verification endpoint of the external identity provider.
///
/// Implementations may suspend (network I/O) but must not hold locks across
/// suspension points and must not retry internally.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, IdentityError>;
}
