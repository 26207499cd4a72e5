//! `atelier-infra` — collaborators behind the authorization boundary.
//!
//! Real adapters (HTTP identity provider, Postgres stores) live next to the
//! in-memory implementations that back dev mode and tests. Nothing in here
//! makes authorization decisions; these types only answer the questions the
//! pipeline asks.

pub mod identity;
pub mod profiles;
pub mod projects;

pub use identity::{HttpIdentityProvider, InMemoryIdentityProvider};
pub use profiles::{InMemoryProfileStore, PostgresProfileStore};
pub use projects::{
    InMemoryProjectStore, Milestone, MilestoneStatus, PostgresProjectStore, Project,
    ProjectOwnershipLookup, ProjectStatus, ProjectStore, ProjectStoreError,
};
