//! Operator endpoints.

use axum::Json;
use axum::extract::{Extension, State};

use atelier_auth::AuthContext;
use atelier_infra::Project;

use crate::error::ApiError;
use crate::services::AppServices;

pub async fn all_projects(
    State(services): State<AppServices>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Vec<Project>>, ApiError> {
    tracing::debug!(operator = %ctx.subject_id(), "full project listing requested");
    let projects = services.projects.list_all().await?;
    Ok(Json(projects))
}
