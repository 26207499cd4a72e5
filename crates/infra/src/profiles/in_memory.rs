//! In-memory profile store for dev mode and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use atelier_auth::{ProfileRecord, ProfileStore, ProfileStoreError};
use atelier_core::SubjectId;

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    records: RwLock<HashMap<SubjectId, ProfileRecord>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, record: ProfileRecord) {
        self.records
            .write()
            .unwrap()
            .insert(record.subject_id.clone(), record);
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Option<ProfileRecord>, ProfileStoreError> {
        Ok(self.records.read().unwrap().get(subject_id).cloned())
    }
}
