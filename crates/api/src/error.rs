//! Wire mapping of pipeline and handler failures.
//!
//! Responses carry a stable machine-readable code plus a human message and
//! nothing else: no stack traces, no provider-internal detail.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use atelier_auth::AuthError;
use atelier_infra::ProjectStoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}: {1}")]
    Validation(&'static str, String),

    #[error("not found")]
    NotFound,

    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(code, message.into())
    }
}

impl From<ProjectStoreError> for ApiError {
    fn from(e: ProjectStoreError) -> Self {
        tracing::error!(error = %e, "project store failure");
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(err) => auth_error_response(err),
            ApiError::Validation(code, message) => {
                json_error(StatusCode::BAD_REQUEST, code, message)
            }
            ApiError::NotFound => {
                json_error(StatusCode::NOT_FOUND, "not_found", "not found".to_string())
            }
            ApiError::Internal => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error".to_string(),
            ),
        }
    }
}

fn auth_error_response(err: AuthError) -> Response {
    // Infrastructure degradation is the operator's problem and gets the loud
    // log line; every other denial is caller-attributable.
    match &err {
        AuthError::UpstreamUnavailable(reason) => {
            tracing::error!(reason = %reason, "identity infrastructure unavailable");
        }
        other => {
            tracing::warn!(code = other.code(), "request denied: {other}");
        }
    }

    let status = match &err {
        AuthError::Unauthenticated
        | AuthError::MissingCredential(_)
        | AuthError::InvalidCredential
        | AuthError::UpstreamUnavailable(_) => StatusCode::UNAUTHORIZED,
        AuthError::InsufficientRole { .. }
        | AuthError::NotParticipant { .. }
        | AuthError::ProfileNotFound(_)
        | AuthError::ProfileCorrupt { .. } => StatusCode::FORBIDDEN,
        AuthError::ResourceNotFound => StatusCode::NOT_FOUND,
    };

    let message = match &err {
        AuthError::UpstreamUnavailable(_) => {
            "identity verification temporarily unavailable".to_string()
        }
        AuthError::ProfileCorrupt { .. } => "profile is misconfigured".to_string(),
        other => other.to_string(),
    };

    json_error(status, err.code(), message)
}

pub fn json_error(status: StatusCode, code: &'static str, message: String) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message,
        })),
    )
        .into_response()
}
