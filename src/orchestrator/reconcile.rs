use crate::stores::{JobMetadata, JobStatus, ScheduleRecord};

/// Merges every field the metadata record defines into the local record.
/// Pure and idempotent: applying the same metadata twice yields the same
/// record. The caller persists the result in a single whole-record write.
pub fn merge(mut record: ScheduleRecord, metadata: &JobMetadata) -> ScheduleRecord {
    if let Some(created_at) = metadata.created_at {
        record.created_at = created_at;
    }
    if let Some(updated_at) = metadata.updated_at {
        record.updated_at = updated_at;
    }
    if let Some(key) = &metadata.input_object_key {
        record.input_object_key = Some(key.clone());
    }
    if let Some(key) = &metadata.output_object_key {
        record.output_object_key = Some(key.clone());
    }
    if let Some(status) = &metadata.status {
        record.status = JobStatus::from(status.clone());
    }
    record
}
