use thiserror::Error;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::stores::{RecordStoreError, UpstreamError};

/// Failure taxonomy for schedule orchestration. No variant implies any
/// rollback of earlier submission stages; a `started` record left behind is
/// recovered by idempotent resubmission, correlated through the input hash.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule request {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("dispatch failed for job {id}: {reason}")]
    Dispatch { id: Uuid, reason: String },
    #[error("output artifact {key} did not decode: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("job {0} is completed but carries no output key")]
    MissingOutputKey(Uuid),
    #[error("snapshot build failed: {0}")]
    Snapshot(#[from] DomainError),
    #[error("parameter encoding failed: {0}")]
    Encode(serde_json::Error),
    #[error("record store error: {0}")]
    Records(RecordStoreError),
}

impl From<RecordStoreError> for ScheduleError {
    fn from(e: RecordStoreError) -> Self {
        match e {
            RecordStoreError::NotFound(id) => ScheduleError::NotFound(id),
            other => ScheduleError::Records(other),
        }
    }
}
