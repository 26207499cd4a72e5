//! Routing table.
//!
//! Each route declares its guard chain here, as an explicit ordered list
//! evaluated by the runner in [`crate::guard_layer`]. The chain for a route
//! is fixed at startup; nothing is computed per request except the decision.

use std::sync::Arc;

use axum::routing::{MethodRouter, get, post};
use axum::{Router, middleware};

use atelier_auth::{AuthenticationGuard, GuardChain, ResourceParticipantGuard, Role, RoleGuard};

use crate::guard_layer::{self, RoutePolicy};
use crate::services::AppServices;

pub mod admin;
pub mod projects;
pub mod system;

pub fn router(services: &AppServices) -> Router {
    let authenticated = || GuardChain::new().with(AuthenticationGuard);
    let participant =
        || authenticated().with(ResourceParticipantGuard::new(services.ownership.clone()));

    Router::new()
        .route("/health", get(system::health))
        .route(
            "/auth/me",
            guarded(get(system::me), services, authenticated(), None),
        )
        .route(
            "/projects",
            guarded(get(projects::list_mine), services, authenticated(), None),
        )
        .route(
            "/projects",
            guarded(
                post(projects::create),
                services,
                authenticated().with(RoleGuard::allowing([Role::Client])),
                None,
            ),
        )
        .route(
            "/projects/:id",
            guarded(get(projects::show), services, participant(), Some("id")),
        )
        .route(
            "/projects/:id/milestones",
            guarded(
                get(projects::list_milestones),
                services,
                participant(),
                Some("id"),
            ),
        )
        .route(
            "/projects/:id/milestones",
            guarded(
                post(projects::plan_milestone),
                services,
                authenticated()
                    .with(RoleGuard::allowing([Role::Designer, Role::Admin]))
                    .with(ResourceParticipantGuard::new(services.ownership.clone())),
                Some("id"),
            ),
        )
        .route(
            "/admin/projects",
            guarded(
                get(admin::all_projects),
                services,
                authenticated().with(RoleGuard::allowing([Role::Admin])),
                None,
            ),
        )
        .with_state(services.clone())
}

/// Attach a guard chain to one method route.
fn guarded(
    route: MethodRouter<AppServices>,
    services: &AppServices,
    chain: GuardChain,
    resource_param: Option<&'static str>,
) -> MethodRouter<AppServices> {
    route.layer(middleware::from_fn_with_state(
        RoutePolicy {
            authenticator: services.authenticator.clone(),
            chain: Arc::new(chain),
            resource_param,
        },
        guard_layer::enforce,
    ))
}
