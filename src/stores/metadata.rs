use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::params::utc_timestamp;

#[derive(Debug, Error)]
pub enum MetadataStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("metadata for job {id} did not decode: {source}")]
    Decode {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },
    #[error("metadata for job {0} did not encode: {1}")]
    Encode(Uuid, #[source] serde_json::Error),
}

/// Progress record the external worker updates in place. Every field other
/// than `job_id` is optional; the reconciler merges whatever is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
    pub job_id: Uuid,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub input_object_key: Option<String>,
    #[serde(default)]
    pub output_object_key: Option<String>,
    #[serde(default, with = "utc_timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "utc_timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Low-latency key-value store keyed by job id. Authoritative for worker
/// liveness data, never for request identity.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn put(&self, metadata: &JobMetadata) -> Result<(), MetadataStoreError>;
    /// `None` means the worker has not reported yet, which is not an error.
    async fn fetch(&self, job_id: Uuid) -> Result<Option<JobMetadata>, MetadataStoreError>;
}

/// Metadata store backed by one JSON file per job id under a base folder.
/// The worker process writes the same files through its own copy of this
/// layout.
pub struct FsMetadataStore {
    root: PathBuf,
}

impl FsMetadataStore {
    pub fn new(root: PathBuf) -> Self {
        FsMetadataStore { root }
    }

    fn path_for(&self, job_id: Uuid) -> PathBuf {
        self.root.join(format!("{job_id}.json"))
    }
}

#[async_trait]
impl MetadataStore for FsMetadataStore {
    async fn put(&self, metadata: &JobMetadata) -> Result<(), MetadataStoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let body = serde_json::to_vec(metadata)
            .map_err(|e| MetadataStoreError::Encode(metadata.job_id, e))?;
        tokio::fs::write(self.path_for(metadata.job_id), body).await?;
        Ok(())
    }

    async fn fetch(&self, job_id: Uuid) -> Result<Option<JobMetadata>, MetadataStoreError> {
        match tokio::fs::read(self.path_for(job_id)).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| MetadataStoreError::Decode { id: job_id, source }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
