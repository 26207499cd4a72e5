//! `atelier-auth` — the request-authorization pipeline.
//!
//! Verifies a bearer credential against the external identity provider,
//! resolves the caller's durable profile, and enforces ordered guard chains
//! before a request reaches business logic. The crate is decoupled from HTTP
//! and storage: the provider, profile store and ownership lookup are injected
//! trait objects, so transports and tests pick their own implementations.
//!
//! Everything here fails closed. A guard either affirmatively allows or
//! denies; ambiguous, partial or malformed data at any stage is a denial.

pub mod authenticator;
pub mod cache;
pub mod context;
pub mod credential;
pub mod error;
pub mod guard;
pub mod profile;
pub mod provider;
pub mod role;

pub use authenticator::Authenticator;
pub use cache::ValidationCache;
pub use context::{AuthContext, ProfileAttributes};
pub use credential::extract_bearer;
pub use error::AuthError;
pub use guard::{
    AuthenticationGuard, Guard, GuardChain, GuardDecision, LookupError, ParticipantSet,
    ResourceAccessQuery, ResourceOwnershipLookup, ResourceParticipantGuard, RoleGuard, RouteParams,
};
pub use profile::{ProfileRecord, ProfileStore, ProfileStoreError};
pub use provider::{IdentityError, IdentityProvider, VerifiedIdentity};
pub use role::Role;
