//! Project store backed by the `projects` and `milestones` tables.

use core::str::FromStr;

use atelier_core::{ProjectId, SubjectId};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::{Milestone, MilestoneStatus, Project, ProjectStatus, ProjectStore, ProjectStoreError};

#[derive(Debug, Clone)]
pub struct PostgresProjectStore {
    pool: PgPool,
}

impl PostgresProjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PROJECT_COLUMNS: &str = "id, title, status, client_id::text AS client_id, \
     designer_id::text AS designer_id, created_at";

fn project_from_row(row: &PgRow) -> Result<Project, ProjectStoreError> {
    Ok(Project {
        id: ProjectId::from_uuid(row.get("id")),
        title: row.get("title"),
        status: ProjectStatus::from_str(row.get::<&str, _>("status"))?,
        client_id: SubjectId::new(row.get::<String, _>("client_id")),
        designer_id: row
            .get::<Option<String>, _>("designer_id")
            .map(SubjectId::new),
        created_at: row.get("created_at"),
    })
}

fn milestone_from_row(row: &PgRow) -> Result<Milestone, ProjectStoreError> {
    Ok(Milestone {
        id: row.get("id"),
        project_id: ProjectId::from_uuid(row.get("project_id")),
        title: row.get("title"),
        status: MilestoneStatus::from_str(row.get::<&str, _>("status"))?,
        sort_order: row.get("sort_order"),
    })
}

#[async_trait::async_trait]
impl ProjectStore for PostgresProjectStore {
    #[instrument(skip(self), fields(project_id = %id), err)]
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, ProjectStoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProjectStoreError(e.to_string()))?;

        row.as_ref().map(project_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_all(&self) -> Result<Vec<Project>, ProjectStoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProjectStoreError(e.to_string()))?;

        rows.iter().map(project_from_row).collect()
    }

    #[instrument(skip(self), fields(subject = %subject), err)]
    async fn list_for(&self, subject: &SubjectId) -> Result<Vec<Project>, ProjectStoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE client_id::text = $1 OR designer_id::text = $1 \
             ORDER BY created_at"
        ))
        .bind(subject.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProjectStoreError(e.to_string()))?;

        rows.iter().map(project_from_row).collect()
    }

    #[instrument(skip(self, project), fields(project_id = %project.id), err)]
    async fn create(&self, project: Project) -> Result<Project, ProjectStoreError> {
        sqlx::query(
            "INSERT INTO projects (id, title, status, client_id, designer_id, created_at) \
             VALUES ($1, $2, $3, $4::uuid, $5::uuid, $6)",
        )
        .bind(project.id.as_uuid())
        .bind(&project.title)
        .bind(project.status.as_str())
        .bind(project.client_id.as_str())
        .bind(project.designer_id.as_ref().map(|d| d.as_str().to_string()))
        .bind(project.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ProjectStoreError(e.to_string()))?;

        Ok(project)
    }

    #[instrument(skip(self), fields(project_id = %project), err)]
    async fn milestones_for(
        &self,
        project: ProjectId,
    ) -> Result<Vec<Milestone>, ProjectStoreError> {
        let rows = sqlx::query(
            "SELECT id, project_id, title, status, sort_order \
             FROM milestones WHERE project_id = $1 ORDER BY sort_order",
        )
        .bind(project.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProjectStoreError(e.to_string()))?;

        rows.iter().map(milestone_from_row).collect()
    }

    #[instrument(skip(self, milestone), fields(project_id = %milestone.project_id), err)]
    async fn add_milestone(&self, milestone: Milestone) -> Result<Milestone, ProjectStoreError> {
        sqlx::query(
            "INSERT INTO milestones (id, project_id, title, status, sort_order) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(milestone.id)
        .bind(milestone.project_id.as_uuid())
        .bind(&milestone.title)
        .bind(milestone.status.as_str())
        .bind(milestone.sort_order)
        .execute(&self.pool)
        .await
        .map_err(|e| ProjectStoreError(e.to_string()))?;

        Ok(milestone)
    }
}
