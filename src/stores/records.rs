use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a schedule request. `started` is the sole entry
/// state, `completed` the sole terminal state; anything else the worker
/// reports passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Started,
    Completed,
    Other(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Started => "started",
            JobStatus::Completed => "completed",
            JobStatus::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        // Worker-written statuses vary in case and padding.
        match raw.trim().to_ascii_lowercase().as_str() {
            "started" => JobStatus::Started,
            "completed" => JobStatus::Completed,
            _ => JobStatus::Other(raw),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> String {
        status.as_str().to_string()
    }
}

/// Durable record of a schedule request. Created exactly once at submission
/// and mutated only by reconciliation; `id` is the sole external handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleRecord {
    pub id: Uuid,
    pub mission_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub input_object_key: Option<String>,
    pub output_object_key: Option<String>,
    #[schema(value_type = String)]
    pub status: JobStatus,
}

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("schedule request {0} not found")]
    NotFound(Uuid),
    #[error("schedule request {0} already exists")]
    Duplicate(Uuid),
}

/// The job record store. `update` replaces the whole record in one write so
/// concurrent reconciliations can never expose a torn merge.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, record: ScheduleRecord) -> Result<(), RecordStoreError>;
    async fn get(&self, id: Uuid) -> Result<ScheduleRecord, RecordStoreError>;
    async fn update(&self, record: ScheduleRecord) -> Result<(), RecordStoreError>;
    async fn by_mission(&self, mission_id: i64) -> Result<Vec<ScheduleRecord>, RecordStoreError>;
    /// Records still in `started` whose last update predates `older_than`.
    async fn stale_started(
        &self,
        older_than: DateTime<Utc>,
    ) -> Result<Vec<ScheduleRecord>, RecordStoreError>;
}

/// In-memory record store. The relational store owning these rows is an
/// external system; this implementation carries its contract for the
/// service process and for tests.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<Uuid, ScheduleRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, record: ScheduleRecord) -> Result<(), RecordStoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(RecordStoreError::Duplicate(record.id));
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<ScheduleRecord, RecordStoreError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RecordStoreError::NotFound(id))
    }

    async fn update(&self, record: ScheduleRecord) -> Result<(), RecordStoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RecordStoreError::NotFound(record.id)),
        }
    }

    async fn by_mission(&self, mission_id: i64) -> Result<Vec<ScheduleRecord>, RecordStoreError> {
        let records = self.records.read().await;
        let mut found: Vec<ScheduleRecord> = records
            .values()
            .filter(|r| r.mission_id == mission_id)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.created_at);
        Ok(found)
    }

    async fn stale_started(
        &self,
        older_than: DateTime<Utc>,
    ) -> Result<Vec<ScheduleRecord>, RecordStoreError> {
        let records = self.records.read().await;
        let mut found: Vec<ScheduleRecord> = records
            .values()
            .filter(|r| r.status == JobStatus::Started && r.updated_at < older_than)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.updated_at);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(mission_id: i64, status: JobStatus) -> ScheduleRecord {
        let now = Utc::now();
        ScheduleRecord {
            id: Uuid::new_v4(),
            mission_id,
            created_at: now,
            updated_at: now,
            input_object_key: None,
            output_object_key: None,
            status,
        }
    }

    #[test]
    fn status_parsing_is_case_and_padding_insensitive() {
        assert_eq!(JobStatus::from(" Completed ".to_string()), JobStatus::Completed);
        assert_eq!(JobStatus::from("started".to_string()), JobStatus::Started);
        assert_eq!(
            JobStatus::from("processing".to_string()),
            JobStatus::Other("processing".into())
        );
        assert!(!JobStatus::Other("processing".into()).is_terminal());
        assert!(JobStatus::Completed.is_terminal());
    }

    #[tokio::test]
    async fn insert_get_update_round_trip() {
        let store = InMemoryRecordStore::new();
        let mut rec = record(1, JobStatus::Started);
        store.insert(rec.clone()).await.unwrap();
        assert!(matches!(
            store.insert(rec.clone()).await,
            Err(RecordStoreError::Duplicate(_))
        ));

        rec.status = JobStatus::Completed;
        store.update(rec.clone()).await.unwrap();
        assert_eq!(store.get(rec.id).await.unwrap(), rec);

        assert!(matches!(
            store.get(Uuid::new_v4()).await,
            Err(RecordStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn by_mission_filters_and_sorts() {
        let store = InMemoryRecordStore::new();
        store.insert(record(1, JobStatus::Started)).await.unwrap();
        store.insert(record(1, JobStatus::Completed)).await.unwrap();
        store.insert(record(2, JobStatus::Started)).await.unwrap();

        let mission = store.by_mission(1).await.unwrap();
        assert_eq!(mission.len(), 2);
        assert!(mission.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn stale_started_finds_only_old_started_records() {
        let store = InMemoryRecordStore::new();
        let mut stale = record(1, JobStatus::Started);
        stale.updated_at = Utc::now() - Duration::hours(2);
        let mut old_but_done = record(1, JobStatus::Completed);
        old_but_done.updated_at = Utc::now() - Duration::hours(2);
        let fresh = record(1, JobStatus::Started);

        store.insert(stale.clone()).await.unwrap();
        store.insert(old_but_done).await.unwrap();
        store.insert(fresh).await.unwrap();

        let cutoff = Utc::now() - Duration::hours(1);
        let orphans = store.stale_started(cutoff).await.unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, stale.id);
    }
}
