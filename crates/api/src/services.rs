//! Dependency wiring: which provider and store implementations back the app.

use std::sync::Arc;

use atelier_auth::{Authenticator, ProfileRecord, ResourceOwnershipLookup, VerifiedIdentity};
use atelier_core::{ProjectId, SubjectId};
use atelier_infra::{
    InMemoryIdentityProvider, InMemoryProfileStore, InMemoryProjectStore, Project,
    ProjectOwnershipLookup, ProjectStatus, ProjectStore,
};
use chrono::{Duration, Utc};

/// Shared handles injected into routes and the guard runner.
#[derive(Clone)]
pub struct AppServices {
    pub authenticator: Arc<Authenticator>,
    pub projects: Arc<dyn ProjectStore>,
    pub ownership: Arc<dyn ResourceOwnershipLookup>,
}

impl AppServices {
    /// Wire services around an authenticator and a project store. Ownership
    /// answers come from the same store the project handlers use.
    pub fn new(authenticator: Authenticator, projects: Arc<dyn ProjectStore>) -> Self {
        let ownership: Arc<dyn ResourceOwnershipLookup> =
            Arc::new(ProjectOwnershipLookup::new(projects.clone()));
        Self {
            authenticator: Arc::new(authenticator),
            projects,
            ownership,
        }
    }

    /// Seeded in-memory wiring for dev mode: one client, one designer, one
    /// admin, and a project the first two share. Tokens are fixed strings
    /// (`dev-client-token` and friends); the caller logs a warning before
    /// using this.
    pub fn in_memory_dev() -> Self {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let profiles = Arc::new(InMemoryProfileStore::new());
        let projects = Arc::new(InMemoryProjectStore::new());

        let fixtures = [
            ("dev-client-token", "u-client", "Mina Park", "client"),
            ("dev-designer-token", "u-designer", "Jae Lee", "designer"),
            ("dev-admin-token", "u-admin", "Operations", "admin"),
        ];

        for (token, subject, name, role) in fixtures {
            let subject_id = SubjectId::new(subject);
            provider.grant(
                token,
                VerifiedIdentity {
                    subject_id: subject_id.clone(),
                    email: format!("{subject}@atelier.dev"),
                    expires_at: None,
                    metadata: serde_json::Value::Null,
                },
            );
            profiles.upsert(ProfileRecord {
                subject_id,
                email: format!("{subject}@atelier.dev"),
                display_name: name.to_string(),
                role: role.to_string(),
                phone: None,
                company: None,
                department: None,
                experience: None,
            });
        }

        projects.insert(Project {
            id: ProjectId::new(),
            title: "sample brand refresh".to_string(),
            status: ProjectStatus::Active,
            client_id: SubjectId::new("u-client"),
            designer_id: Some(SubjectId::new("u-designer")),
            created_at: Utc::now(),
        });

        let authenticator = Authenticator::new(provider, profiles)
            .with_validation_cache(Duration::seconds(30));

        Self::new(authenticator, projects)
    }
}
