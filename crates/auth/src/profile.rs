//! Durable profile boundary.

use atelier_core::SubjectId;
use thiserror::Error;

/// Raw profile row as the store returns it.
///
/// The role stays a string here on purpose: mapping it into the closed
/// [`Role`](crate::Role) set happens in the resolver, so a bad stored value
/// fails the request instead of leaking through as a valid context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub subject_id: SubjectId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub experience: Option<String>,
}

/// The profile store could not answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("profile store unavailable: {0}")]
pub struct ProfileStoreError(pub String);

/// Lookup of the durable profile for a validated subject.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` means the subject has no provisioned profile.
    async fn get_profile(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<ProfileRecord>, ProfileStoreError>;
}
