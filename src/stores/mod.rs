pub mod artifacts;
pub mod metadata;
pub mod records;
pub mod retry;

pub use artifacts::{ArtifactStore, ArtifactStoreError, FsArtifactStore};
pub use metadata::{FsMetadataStore, JobMetadata, MetadataStore, MetadataStoreError};
pub use records::{InMemoryRecordStore, JobStatus, RecordStore, RecordStoreError, ScheduleRecord};
pub use retry::{with_retry, RetryPolicy, UpstreamError};
