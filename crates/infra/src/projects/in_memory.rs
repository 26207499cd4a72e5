//! In-memory project store for dev mode and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use atelier_core::{ProjectId, SubjectId};

use super::{Milestone, Project, ProjectStore, ProjectStoreError};

#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
    milestones: RwLock<Vec<Milestone>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous insert for seeding fixtures.
    pub fn insert(&self, project: Project) {
        self.projects.write().unwrap().insert(project.id, project);
    }
}

#[async_trait::async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, ProjectStoreError> {
        Ok(self.projects.read().unwrap().get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Project>, ProjectStoreError> {
        let mut projects: Vec<Project> = self.projects.read().unwrap().values().cloned().collect();
        projects.sort_by_key(|p| p.created_at);
        Ok(projects)
    }

    async fn list_for(&self, subject: &SubjectId) -> Result<Vec<Project>, ProjectStoreError> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .unwrap()
            .values()
            .filter(|p| &p.client_id == subject || p.designer_id.as_ref() == Some(subject))
            .cloned()
            .collect();
        projects.sort_by_key(|p| p.created_at);
        Ok(projects)
    }

    async fn create(&self, project: Project) -> Result<Project, ProjectStoreError> {
        self.insert(project.clone());
        Ok(project)
    }

    async fn milestones_for(
        &self,
        project: ProjectId,
    ) -> Result<Vec<Milestone>, ProjectStoreError> {
        let mut milestones: Vec<Milestone> = self
            .milestones
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.project_id == project)
            .cloned()
            .collect();
        milestones.sort_by_key(|m| m.sort_order);
        Ok(milestones)
    }

    async fn add_milestone(&self, milestone: Milestone) -> Result<Milestone, ProjectStoreError> {
        self.milestones.write().unwrap().push(milestone.clone());
        Ok(milestone)
    }
}
