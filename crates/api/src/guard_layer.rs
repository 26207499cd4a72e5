//! Route-level enforcement of declared guard chains.
//!
//! One middleware runs for every guarded route: it authenticates the request
//! (the pipeline runs exactly once), resolves the declared resource
//! parameter, evaluates the route's chain, and on allow hands the context to
//! the handler through request extensions. Handlers take the context as an
//! explicit `Extension` parameter; nothing is fetched from ambient state.

use std::sync::Arc;

use axum::extract::{RawPathParams, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use atelier_auth::{AuthError, Authenticator, GuardChain, GuardDecision, RouteParams};
use atelier_core::ProjectId;

use crate::error::ApiError;

/// Everything the runner needs for one route: the authenticator, the
/// declared chain, and (when a guard wants one) the name of the path
/// parameter carrying the resource id.
#[derive(Clone)]
pub struct RoutePolicy {
    pub authenticator: Arc<Authenticator>,
    pub chain: Arc<GuardChain>,
    pub resource_param: Option<&'static str>,
}

pub async fn enforce(
    State(policy): State<RoutePolicy>,
    raw_params: RawPathParams,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if policy.chain.is_public() {
        return Ok(next.run(req).await);
    }

    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    // Extraction, verification and profile resolution happen here, once. If
    // any of it fails no guard in the chain runs.
    let ctx = policy.authenticator.authenticate(authorization).await?;

    let resource_id = match policy.resource_param {
        Some(name) => Some(resolve_resource_id(&raw_params, name)?),
        None => None,
    };
    let params = RouteParams { resource_id };

    match policy.chain.evaluate(Some(&ctx), &params).await {
        GuardDecision::Allow => {
            req.extensions_mut().insert(ctx);
            Ok(next.run(req).await)
        }
        GuardDecision::Deny(reason) => Err(ApiError::Auth(reason)),
    }
}

/// A declared-but-unparsable resource id denies the same way a nonexistent
/// resource does.
fn resolve_resource_id(raw: &RawPathParams, name: &str) -> Result<ProjectId, ApiError> {
    raw.iter()
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| value.parse::<ProjectId>().ok())
        .ok_or(ApiError::Auth(AuthError::ResourceNotFound))
}
