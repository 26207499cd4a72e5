//! Project and milestone endpoints.
//!
//! Handlers stay thin: the guard chain has already decided access by the
//! time any of these run, and the context arrives as an explicit parameter.

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use atelier_auth::AuthContext;
use atelier_core::{ProjectId, SubjectId};
use atelier_infra::{Milestone, MilestoneStatus, Project, ProjectStatus};

use crate::error::ApiError;
use crate::services::AppServices;

pub async fn list_mine(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = services.projects.list_for(ctx.subject_id()).await?;
    Ok(Json(projects))
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    /// Subject id of a designer to assign up front, if already chosen.
    pub designer_id: Option<String>,
}

pub async fn create(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("invalid_title", "title is required"));
    }

    let project = Project {
        id: ProjectId::new(),
        title: title.to_string(),
        status: ProjectStatus::Pending,
        client_id: ctx.subject_id().clone(),
        designer_id: body.designer_id.map(SubjectId::new),
        created_at: Utc::now(),
    };

    tracing::info!(
        project_id = %project.id,
        client = %project.client_id,
        "project opened"
    );

    let project = services.projects.create(project).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn show(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    Extension(_ctx): Extension<AuthContext>,
) -> Result<Json<Project>, ApiError> {
    let project = services
        .projects
        .get(ProjectId::from_uuid(id))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(project))
}

pub async fn list_milestones(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    Extension(_ctx): Extension<AuthContext>,
) -> Result<Json<Vec<Milestone>>, ApiError> {
    let milestones = services
        .projects
        .milestones_for(ProjectId::from_uuid(id))
        .await?;
    Ok(Json(milestones))
}

#[derive(Debug, Deserialize)]
pub struct PlanMilestoneRequest {
    pub title: String,
    pub sort_order: Option<i32>,
}

pub async fn plan_milestone(
    State(services): State<AppServices>,
    Path(id): Path<Uuid>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<PlanMilestoneRequest>,
) -> Result<(StatusCode, Json<Milestone>), ApiError> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("invalid_title", "title is required"));
    }

    let project_id = ProjectId::from_uuid(id);
    let sort_order = match body.sort_order {
        Some(order) => order,
        None => services.projects.milestones_for(project_id).await?.len() as i32,
    };

    let milestone = services
        .projects
        .add_milestone(Milestone {
            id: Uuid::now_v7(),
            project_id,
            title: title.to_string(),
            status: MilestoneStatus::Planned,
            sort_order,
        })
        .await?;

    tracing::info!(
        project_id = %project_id,
        planner = %ctx.subject_id(),
        "milestone planned"
    );

    Ok((StatusCode::CREATED, Json(milestone)))
}
