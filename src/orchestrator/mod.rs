pub mod error;
pub mod reconcile;
pub mod snapshot;

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::AssetCatalog;
use crate::dispatch::Dispatch;
use crate::domain::{input_hash, SchedulingInputOutputData};
use crate::stores::{
    artifacts, with_retry, ArtifactStore, JobMetadata, JobStatus, MetadataStore, RecordStore,
    RetryPolicy, ScheduleRecord,
};

pub use error::ScheduleError;

/// Submission input: a mission plus the ids of the entities to project into
/// the optimizer snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitRequest {
    pub mission_id: i64,
    pub satellite_ids: Vec<i64>,
    pub ground_station_ids: Vec<i64>,
    pub image_request_ids: Vec<i64>,
}

/// Schedule-generation and result-retrieval orchestration. Owns the job
/// record lifecycle; every external system comes in through a trait,
/// constructed once with its configuration (no ad-hoc lookups at call time).
pub struct Orchestrator {
    catalog: Arc<dyn AssetCatalog>,
    records: Arc<dyn RecordStore>,
    artifacts: Arc<dyn ArtifactStore>,
    metadata: Arc<dyn MetadataStore>,
    dispatcher: Arc<dyn Dispatch>,
    retry: RetryPolicy,
}

impl Orchestrator {
    pub fn new(
        catalog: Arc<dyn AssetCatalog>,
        records: Arc<dyn RecordStore>,
        artifacts: Arc<dyn ArtifactStore>,
        metadata: Arc<dyn MetadataStore>,
        dispatcher: Arc<dyn Dispatch>,
        retry: RetryPolicy,
    ) -> Self {
        Orchestrator {
            catalog,
            records,
            artifacts,
            metadata,
            dispatcher,
            retry,
        }
    }

    /// Builds and persists a schedule request, then dispatches the worker.
    ///
    /// Stage order is load-bearing: the job record is written before the
    /// artifact, the artifact before the metadata mirror, the mirror before
    /// dispatch. A failure at any later stage leaves the earlier writes in
    /// place, so the returned id always resolves to a record. Returns the
    /// new job id; completion is never signalled synchronously.
    pub async fn submit(&self, request: &SubmitRequest) -> Result<Uuid, ScheduleError> {
        log::info!("Received schedule request for mission {}", request.mission_id);

        let mut params = snapshot::build_snapshot(
            self.catalog.as_ref(),
            &request.satellite_ids,
            &request.ground_station_ids,
            &request.image_request_ids,
        )?;
        params.input_hash = Some(input_hash(&params).map_err(ScheduleError::Encode)?);

        let id = Uuid::new_v4();
        let now = Utc::now();
        self.records
            .insert(ScheduleRecord {
                id,
                mission_id: request.mission_id,
                created_at: now,
                updated_at: now,
                input_object_key: None,
                output_object_key: None,
                status: JobStatus::Started,
            })
            .await?;

        log::info!("Storing parameters for job {}", id);
        let key = artifacts::input_key(id);
        let body = serde_json::to_vec(&params).map_err(ScheduleError::Encode)?;
        with_retry(&self.retry, "artifact store", || {
            self.artifacts.put(&key, body.clone())
        })
        .await?;

        log::info!("Mirroring job {} into the metadata store", id);
        let mirror = JobMetadata {
            job_id: id,
            status: Some(JobStatus::Started.as_str().to_string()),
            input_object_key: Some(key.clone()),
            output_object_key: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        with_retry(&self.retry, "metadata store", || self.metadata.put(&mirror)).await?;

        log::info!("Dispatching worker for job {}", id);
        // Timeout-bound like every other external call, but never retried:
        // one schedule request launches at most one compute task.
        match tokio::time::timeout(self.retry.timeout, self.dispatcher.dispatch(id)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(ScheduleError::Dispatch {
                    id,
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(ScheduleError::Dispatch {
                    id,
                    reason: format!("launch timed out after {:?}", self.retry.timeout),
                })
            }
        }

        Ok(id)
    }

    /// Current view of a schedule request, reconciled against the metadata
    /// store unless the record is already terminal.
    pub async fn get(&self, id: Uuid) -> Result<ScheduleRecord, ScheduleError> {
        let record = self.records.get(id).await?;
        if record.status.is_terminal() {
            return Ok(record);
        }

        log::info!("Refreshing schedule request {} from the metadata store", id);
        let metadata = with_retry(&self.retry, "metadata store", || self.metadata.fetch(id))
            .await?;
        let Some(metadata) = metadata else {
            // Worker has not reported yet.
            return Ok(record);
        };

        let merged = reconcile::merge(record, &metadata);
        self.records.update(merged.clone()).await?;
        Ok(merged)
    }

    /// Decoded result of a completed run, or `None` while the run is still
    /// in progress. Absence of a result is a pending state, not a failure.
    pub async fn output(
        &self,
        id: Uuid,
    ) -> Result<Option<SchedulingInputOutputData>, ScheduleError> {
        let record = self.get(id).await?;
        if !record.status.is_terminal() {
            return Ok(None);
        }

        let key = record
            .output_object_key
            .ok_or(ScheduleError::MissingOutputKey(id))?;
        log::info!("Retrieving {} from the artifact store", key);
        let bytes = with_retry(&self.retry, "artifact store", || self.artifacts.get(&key)).await?;
        let data = serde_json::from_slice(&bytes)
            .map_err(|source| ScheduleError::Decode { key, source })?;
        Ok(Some(data))
    }

    /// All schedule requests for a mission, as currently recorded. No
    /// reconciliation happens here; identity queries stay local.
    pub async fn by_mission(&self, mission_id: i64) -> Result<Vec<ScheduleRecord>, ScheduleError> {
        Ok(self.records.by_mission(mission_id).await?)
    }

    /// Maintenance scan for requests stuck in `started`: dispatched work
    /// whose worker never reported. Detection only; nothing is mutated.
    pub async fn find_orphans(
        &self,
        stale_after: Duration,
    ) -> Result<Vec<ScheduleRecord>, ScheduleError> {
        let cutoff = Utc::now() - stale_after;
        Ok(self.records.stale_started(cutoff).await?)
    }
}
