//! Project and milestone storage behind the authorization boundary.
//!
//! The projects table is also the source of truth for resource ownership:
//! the participants of a project are its client and, once assigned, its
//! designer. [`ProjectOwnershipLookup`] adapts this store to the pipeline's
//! lookup boundary.

use core::fmt;
use core::str::FromStr;

use atelier_auth::ParticipantSet;
use atelier_core::{ProjectId, SubjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod in_memory;
pub mod ownership;
pub mod postgres;

pub use in_memory::InMemoryProjectStore;
pub use ownership::ProjectOwnershipLookup;
pub use postgres::PostgresProjectStore;

/// Lifecycle status of a project.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Pending,
    Active,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ProjectStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProjectStatus::Pending),
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            other => Err(ProjectStoreError(format!("unknown project status '{other}'"))),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub status: ProjectStatus,
    pub client_id: SubjectId,
    pub designer_id: Option<SubjectId>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Subjects entitled to act on this project.
    pub fn participants(&self) -> ParticipantSet {
        std::iter::once(self.client_id.clone())
            .chain(self.designer_id.clone())
            .collect()
    }
}

/// Progress state of a milestone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Planned,
    InProgress,
    Done,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Planned => "planned",
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Done => "done",
        }
    }
}

impl FromStr for MilestoneStatus {
    type Err = ProjectStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(MilestoneStatus::Planned),
            "in_progress" => Ok(MilestoneStatus::InProgress),
            "done" => Ok(MilestoneStatus::Done),
            other => Err(ProjectStoreError(format!(
                "unknown milestone status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub id: Uuid,
    pub project_id: ProjectId,
    pub title: String,
    pub status: MilestoneStatus,
    pub sort_order: i32,
}

/// Infrastructure failure in the project store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("project store failure: {0}")]
pub struct ProjectStoreError(pub String);

#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, ProjectStoreError>;

    async fn list_all(&self) -> Result<Vec<Project>, ProjectStoreError>;

    /// Projects where the subject participates as client or designer.
    async fn list_for(&self, subject: &SubjectId) -> Result<Vec<Project>, ProjectStoreError>;

    async fn create(&self, project: Project) -> Result<Project, ProjectStoreError>;

    async fn milestones_for(&self, project: ProjectId)
    -> Result<Vec<Milestone>, ProjectStoreError>;

    async fn add_milestone(&self, milestone: Milestone) -> Result<Milestone, ProjectStoreError>;
}
