//! Profile store backed by the platform's `users` table.

use atelier_auth::{ProfileRecord, ProfileStore, ProfileStoreError};
use atelier_core::SubjectId;
use sqlx::{PgPool, Row};
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileStore for PostgresProfileStore {
    #[instrument(skip(self), fields(subject_id = %subject_id), err)]
    async fn get_profile(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<ProfileRecord>, ProfileStoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                id::text AS id,
                email,
                name,
                role,
                phone,
                company,
                department,
                experience
            FROM users
            WHERE id::text = $1
            "#,
        )
        .bind(subject_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProfileStoreError(e.to_string()))?;

        Ok(row.map(|row| ProfileRecord {
            subject_id: SubjectId::new(row.get::<String, _>("id")),
            email: row.get("email"),
            display_name: row.get("name"),
            role: row.get("role"),
            phone: row.get("phone"),
            company: row.get("company"),
            department: row.get("department"),
            experience: row.get("experience"),
        }))
    }
}
