//! Health and identity echo endpoints.

use axum::Json;
use axum::extract::Extension;
use serde::Serialize;
use serde_json::{Value, json};

use atelier_auth::AuthContext;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    subject_id: String,
    email: String,
    display_name: String,
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    department: Option<String>,
}

/// Echo the caller's resolved context. Useful for clients checking what the
/// platform thinks they are.
pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<MeResponse> {
    Json(MeResponse {
        subject_id: ctx.subject_id().to_string(),
        email: ctx.email().to_string(),
        display_name: ctx.display_name().to_string(),
        role: ctx.role().as_str(),
        company: ctx.attributes().company.clone(),
        department: ctx.attributes().department.clone(),
    })
}
