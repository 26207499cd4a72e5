//! Failure taxonomy for the authorization pipeline.
//!
//! Every failure is terminal for the request it belongs to. Nothing in this
//! crate retries; whether the caller may retry is a transport-layer concern.

use atelier_core::{ProjectId, SubjectId};
use thiserror::Error;

use crate::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The request carried no well-formed `Bearer` credential.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// The identity provider rejected the credential (invalid, expired or
    /// malformed).
    #[error("credential rejected by identity provider")]
    InvalidCredential,

    /// The identity provider or profile store could not be reached. Logged at
    /// elevated severity: this is infrastructure degradation, not a caller
    /// error.
    #[error("identity infrastructure unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The credential was valid but no profile is provisioned for the
    /// subject, e.g. signup was never completed.
    #[error("no profile provisioned for subject {0}")]
    ProfileNotFound(SubjectId),

    /// The stored profile carries a role outside the closed set.
    #[error("profile for subject {subject} has unknown role '{role}'")]
    ProfileCorrupt { subject: SubjectId, role: String },

    /// A guard required an authenticated context and none was present.
    #[error("authentication required")]
    Unauthenticated,

    /// The caller's role is not in the set the route allows.
    #[error("requires one of: {}", fmt_roles(.allowed))]
    InsufficientRole { allowed: Vec<Role> },

    /// The resource under access control does not exist.
    #[error("resource not found")]
    ResourceNotFound,

    /// The caller is not a participant of the resource.
    #[error("subject {subject} is not a participant of resource {resource}")]
    NotParticipant {
        subject: SubjectId,
        resource: ProjectId,
    },
}

impl AuthError {
    /// Stable machine-readable code for wire responses and log correlation.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential(_) => "missing_credential",
            AuthError::InvalidCredential => "invalid_credential",
            AuthError::UpstreamUnavailable(_) => "upstream_unavailable",
            AuthError::ProfileNotFound(_) => "profile_not_found",
            AuthError::ProfileCorrupt { .. } => "profile_corrupt",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::InsufficientRole { .. } => "insufficient_role",
            AuthError::ResourceNotFound => "resource_not_found",
            AuthError::NotParticipant { .. } => "not_participant",
        }
    }
}

fn fmt_roles(roles: &[Role]) -> String {
    let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
    names.join(", ")
}
