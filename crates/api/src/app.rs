//! App assembly: config, services, router, serve.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use chrono::Duration;

use atelier_auth::Authenticator;
use atelier_infra::{HttpIdentityProvider, PostgresProfileStore, PostgresProjectStore, ProjectStore};

use crate::config::Config;
use crate::routes;
use crate::services::AppServices;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let services = build_services(&config).await?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_app(services: AppServices) -> Router {
    routes::router(&services)
}

async fn build_services(config: &Config) -> anyhow::Result<AppServices> {
    match (
        &config.database_url,
        &config.identity_provider_url,
        &config.identity_provider_api_key,
    ) {
        (Some(database_url), Some(provider_url), Some(api_key)) => {
            let pool = sqlx::PgPool::connect(database_url)
                .await
                .context("failed to connect to DATABASE_URL")?;

            let provider = Arc::new(HttpIdentityProvider::new(
                provider_url.clone(),
                api_key.clone(),
            )?);
            let profiles = Arc::new(PostgresProfileStore::new(pool.clone()));
            let projects: Arc<dyn ProjectStore> = Arc::new(PostgresProjectStore::new(pool));

            let mut authenticator = Authenticator::new(provider, profiles);
            if config.validation_cache_ttl_seconds > 0 {
                authenticator = authenticator.with_validation_cache(Duration::seconds(
                    config.validation_cache_ttl_seconds as i64,
                ));
            }

            Ok(AppServices::new(authenticator, projects))
        }
        (None, None, None) => {
            tracing::warn!(
                "DATABASE_URL and identity provider not configured; \
                 using seeded in-memory dev services"
            );
            Ok(AppServices::in_memory_dev())
        }
        _ => anyhow::bail!(
            "DATABASE_URL, IDENTITY_PROVIDER_URL and IDENTITY_PROVIDER_API_KEY \
             must be set together"
        ),
    }
}
