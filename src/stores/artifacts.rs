use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact {0} not found")]
    NotFound(String),
    #[error("invalid artifact key: {0}")]
    InvalidKey(String),
}

/// Object key for a request's input parameter payload.
pub fn input_key(id: Uuid) -> String {
    format!("input/{id}.json")
}

/// Durable blob storage for the large input and output payloads. Input keys
/// follow `input/{id}.json`; output keys are supplied by the worker through
/// the metadata store, never derived locally.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), ArtifactStoreError>;
    async fn get(&self, key: &str) -> Result<Vec<u8>, ArtifactStoreError>;
}

/// Filesystem-backed artifact store rooted at a base folder, one file per
/// object key.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: PathBuf) -> Self {
        FsArtifactStore { root }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, ArtifactStoreError> {
        // Output keys arrive from the worker; keep them under the root.
        let valid = !key.is_empty()
            && !Path::new(key).is_absolute()
            && !key.split('/').any(|part| part == "..");
        if !valid {
            return Err(ArtifactStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), ArtifactStoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, ArtifactStoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ArtifactStoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
