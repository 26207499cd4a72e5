//! Black-box tests of the authorization pipeline over real HTTP.
//!
//! The router is the production one; only the identity provider and stores
//! are in-memory doubles.

use std::sync::Arc;

use atelier_api::services::AppServices;
use atelier_auth::{Authenticator, IdentityError, ProfileRecord, VerifiedIdentity};
use atelier_core::{ProjectId, SubjectId};
use atelier_infra::{
    InMemoryIdentityProvider, InMemoryProfileStore, InMemoryProjectStore, Project, ProjectStatus,
};
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: AppServices) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = atelier_api::app::build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct TestWorld {
    server: TestServer,
    client: reqwest::Client,
    provider: Arc<InMemoryIdentityProvider>,
    shared_project: ProjectId,
    foreign_project: ProjectId,
}

impl TestWorld {
    /// Fixtures: `abc123` -> u1 (client), `designer-token` -> u2 (designer),
    /// `admin-token` -> u3 (admin), `no-profile-token` -> u9 (no profile),
    /// `outage-token` -> provider outage. Project `shared_project` belongs to
    /// u1 and u2; `foreign_project` belongs to u2 alone.
    async fn spawn() -> Self {
        let provider = Arc::new(InMemoryIdentityProvider::new());
        let profiles = Arc::new(InMemoryProfileStore::new());
        let projects = Arc::new(InMemoryProjectStore::new());

        for (token, subject, role) in [
            ("abc123", "u1", Some("client")),
            ("designer-token", "u2", Some("designer")),
            ("admin-token", "u3", Some("admin")),
            ("no-profile-token", "u9", None),
        ] {
            provider.grant(
                token,
                VerifiedIdentity {
                    subject_id: SubjectId::new(subject),
                    email: format!("{subject}@example.com"),
                    expires_at: None,
                    metadata: serde_json::Value::Null,
                },
            );
            if let Some(role) = role {
                profiles.upsert(ProfileRecord {
                    subject_id: SubjectId::new(subject),
                    email: format!("{subject}@example.com"),
                    display_name: subject.to_uppercase(),
                    role: role.to_string(),
                    phone: None,
                    company: None,
                    department: None,
                    experience: None,
                });
            }
        }
        provider.fail(
            "outage-token",
            IdentityError::Unavailable("connect timeout".into()),
        );

        let shared_project = ProjectId::new();
        projects.insert(Project {
            id: shared_project,
            title: "brand refresh".to_string(),
            status: ProjectStatus::Active,
            client_id: SubjectId::new("u1"),
            designer_id: Some(SubjectId::new("u2")),
            created_at: Utc::now(),
        });

        let foreign_project = ProjectId::new();
        projects.insert(Project {
            id: foreign_project,
            title: "poster series".to_string(),
            status: ProjectStatus::Active,
            client_id: SubjectId::new("u2"),
            designer_id: None,
            created_at: Utc::now(),
        });

        let authenticator = Authenticator::new(provider.clone(), profiles)
            .with_validation_cache(Duration::seconds(30));
        let services = AppServices::new(authenticator, projects);

        Self {
            server: TestServer::spawn(services).await,
            client: reqwest::Client::new(),
            provider,
            shared_project,
            foreign_project,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server.base_url)
    }
}

async fn error_code(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_needs_no_credential() {
    let world = TestWorld::spawn().await;

    let res = world.client.get(world.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn bearer_credential_resolves_to_the_client_context() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url("/auth/me"))
        .bearer_auth("abc123")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["subject_id"], "u1");
    assert_eq!(body["role"], "client");
    assert_eq!(body["email"], "u1@example.com");
}

#[tokio::test]
async fn wrong_scheme_is_a_missing_credential() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url("/auth/me"))
        .header("Authorization", "Token abc123")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "missing_credential");
}

#[tokio::test]
async fn absent_header_is_a_missing_credential() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url("/projects"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "missing_credential");
}

#[tokio::test]
async fn unknown_token_is_an_invalid_credential() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url("/auth/me"))
        .bearer_auth("forged")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "invalid_credential");
}

#[tokio::test]
async fn designer_is_denied_the_admin_listing() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url("/admin/projects"))
        .bearer_auth("designer-token")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "insufficient_role");
}

#[tokio::test]
async fn admin_sees_every_project() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url("/admin/projects"))
        .bearer_auth("admin-token")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn participant_can_view_a_shared_project() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url(&format!("/projects/{}", world.shared_project)))
        .bearer_auth("abc123")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["title"], "brand refresh");
}

#[tokio::test]
async fn non_participant_is_denied_a_foreign_project() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url(&format!("/projects/{}", world.foreign_project)))
        .bearer_auth("abc123")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "not_participant");
}

#[tokio::test]
async fn admin_override_reaches_any_project() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url(&format!("/projects/{}", world.shared_project)))
        .bearer_auth("admin-token")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_project_is_resource_not_found() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url(&format!("/projects/{}", ProjectId::new())))
        .bearer_auth("abc123")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(res).await, "resource_not_found");
}

#[tokio::test]
async fn malformed_project_id_is_resource_not_found() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url("/projects/not-a-uuid"))
        .bearer_auth("abc123")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(res).await, "resource_not_found");
}

#[tokio::test]
async fn provider_outage_is_upstream_unavailable() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url("/auth/me"))
        .bearer_auth("outage-token")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "upstream_unavailable");
}

#[tokio::test]
async fn valid_credential_without_a_profile_is_denied() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .get(world.url("/auth/me"))
        .bearer_auth("no-profile-token")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "profile_not_found");
}

#[tokio::test]
async fn client_cannot_plan_milestones() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .post(world.url(&format!(
            "/projects/{}/milestones",
            world.shared_project
        )))
        .bearer_auth("abc123")
        .json(&json!({ "title": "first draft" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "insufficient_role");
}

#[tokio::test]
async fn designer_plans_a_milestone_on_their_project() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .post(world.url(&format!(
            "/projects/{}/milestones",
            world.shared_project
        )))
        .bearer_auth("designer-token")
        .json(&json!({ "title": "first draft" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["title"], "first draft");
    assert_eq!(body["status"], "planned");
}

#[tokio::test]
async fn client_opens_a_project_and_sees_it_listed() {
    let world = TestWorld::spawn().await;

    let created = world
        .client
        .post(world.url("/projects"))
        .bearer_auth("abc123")
        .json(&json!({ "title": "landing page", "designer_id": "u2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = world
        .client
        .get(world.url("/projects"))
        .bearer_auth("abc123")
        .send()
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);

    let body: Value = listed.json().await.unwrap();
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"landing page"));
}

#[tokio::test]
async fn designer_cannot_open_projects() {
    let world = TestWorld::spawn().await;

    let res = world
        .client
        .post(world.url("/projects"))
        .bearer_auth("designer-token")
        .json(&json!({ "title": "self-serve" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "insufficient_role");
}

#[tokio::test]
async fn repeated_requests_reuse_the_cached_verification() {
    let world = TestWorld::spawn().await;

    for _ in 0..3 {
        let res = world
            .client
            .get(world.url("/auth/me"))
            .bearer_auth("abc123")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    assert_eq!(world.provider.verify_calls(), 1);
}
