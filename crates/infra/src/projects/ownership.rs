//! Ownership lookup over the project store.

use std::sync::Arc;

use atelier_auth::{LookupError, ParticipantSet, ResourceAccessQuery, ResourceOwnershipLookup};

use super::ProjectStore;

/// Answers "who may act on this project" from the projects table itself:
/// the client who opened it plus the assigned designer, if any.
pub struct ProjectOwnershipLookup {
    store: Arc<dyn ProjectStore>,
}

impl ProjectOwnershipLookup {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl ResourceOwnershipLookup for ProjectOwnershipLookup {
    async fn participants(
        &self,
        query: &ResourceAccessQuery,
    ) -> Result<Option<ParticipantSet>, LookupError> {
        let project = self
            .store
            .get(query.resource_id)
            .await
            .map_err(|e| LookupError(e.to_string()))?;

        Ok(project.map(|p| p.participants()))
    }
}
