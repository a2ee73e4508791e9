//! In-memory doubles and fixtures shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::catalog::YamlCatalog;
use crate::dispatch::{Dispatch, DispatchError};
use crate::domain::params::utc_timestamp;
use crate::domain::{
    Job, PlannedOrder, Priority, ScheduleOutput, ScheduleParameters, SchedulingInputOutputData,
};
use crate::stores::{
    ArtifactStore, ArtifactStoreError, JobMetadata, MetadataStore, MetadataStoreError,
};

pub fn sample_catalog() -> YamlCatalog {
    YamlCatalog::from_str(
        r#"
satellites:
  - id: 5
    satellite_name: SAT-1
    tle_line1: "1 25544U 98067A   24001.50000000"
    tle_line2: "2 25544  51.6400 208.9163"
  - id: 6
    satellite_name: SAT-2
    tle_line1: "1 43013U 17073A   24001.50000000"
    tle_line2: "2 43013  98.7200 301.1100"
ground_stations:
  - id: 9
    ground_station_name: Inuvik
    latitude: 68.3
    longitude: -133.5
    elevation: 102.5
    send_mask: 5
    uplink_rate: 40
    downlink_rate: 100
image_requests:
  - id: 42
    image_name: img-42
    latitude: 45.4
    longitude: -75.7
    priority: 3
    image_start_time: "2025-06-01T10:00:00"
    image_end_time: "2025-06-01T11:00:00"
    delivery_time: "2025-06-02T00:00:00"
"#,
    )
    .expect("sample catalog must parse")
}

pub fn sample_output_data() -> SchedulingInputOutputData {
    let at = utc_timestamp::parse("2025-06-01T10:00:00").unwrap();
    let job = Job::new(
        "img-42".into(),
        45.4,
        -75.7,
        Priority::High,
        at,
        utc_timestamp::parse("2025-06-01T11:00:00").unwrap(),
        utc_timestamp::parse("2025-06-02T00:00:00").unwrap(),
        None,
    )
    .unwrap();

    let params = ScheduleParameters {
        input_hash: Some("0".repeat(64)),
        two_line_elements: Vec::new(),
        jobs: vec![job.clone()],
        ground_stations: Vec::new(),
        outage_requests: Vec::new(),
        ground_station_outage_requests: Vec::new(),
    };

    let mut planned_orders = std::collections::BTreeMap::new();
    planned_orders.insert(
        "SAT-1".to_string(),
        vec![PlannedOrder {
            job,
            satellite_name: "SAT-1".into(),
            ground_station_name: "Inuvik".into(),
            job_begin: utc_timestamp::parse("2025-06-01T10:05:00").unwrap(),
            job_end: utc_timestamp::parse("2025-06-01T10:10:00").unwrap(),
            downlink_begin: utc_timestamp::parse("2025-06-01T10:40:00").unwrap(),
            downlink_end: utc_timestamp::parse("2025-06-01T10:42:00").unwrap(),
        }],
    );

    SchedulingInputOutputData {
        params_hash: "0".repeat(64),
        params,
        output: ScheduleOutput {
            input_hash: "0".repeat(64),
            impossible_orders: Vec::new(),
            impossible_orders_from_outages: Vec::new(),
            impossible_orders_from_ground_stations: Vec::new(),
            undownlinkable_orders: Vec::new(),
            rejected_orders: Vec::new(),
            planned_orders,
        },
    }
}

#[derive(Default)]
pub struct MemArtifactStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl ArtifactStore for MemArtifactStore {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), ArtifactStoreError> {
        self.objects.lock().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, ArtifactStoreError> {
        self.objects
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| ArtifactStoreError::NotFound(key.to_string()))
    }
}

#[derive(Default)]
pub struct MemMetadataStore {
    entries: Mutex<HashMap<Uuid, JobMetadata>>,
    fetches: AtomicUsize,
}

impl MemMetadataStore {
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub async fn clear(&self, job_id: Uuid) {
        self.entries.lock().await.remove(&job_id);
    }

    /// Simulates the worker updating its progress record in place.
    pub async fn write_worker_update(
        &self,
        job_id: Uuid,
        status: &str,
        output_object_key: Option<String>,
    ) {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(job_id).or_insert_with(|| JobMetadata {
            job_id,
            status: None,
            input_object_key: None,
            output_object_key: None,
            created_at: None,
            updated_at: None,
        });
        entry.status = Some(status.to_string());
        if output_object_key.is_some() {
            entry.output_object_key = output_object_key;
        }
        entry.updated_at = Some(Utc::now());
    }
}

#[async_trait]
impl MetadataStore for MemMetadataStore {
    async fn put(&self, metadata: &JobMetadata) -> Result<(), MetadataStoreError> {
        self.entries
            .lock()
            .await
            .insert(metadata.job_id, metadata.clone());
        Ok(())
    }

    async fn fetch(&self, job_id: Uuid) -> Result<Option<JobMetadata>, MetadataStoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().await.get(&job_id).cloned())
    }
}

#[derive(Default)]
pub struct MockDispatcher {
    launched: StdMutex<Vec<Uuid>>,
    fail: bool,
}

impl MockDispatcher {
    pub fn failing() -> Self {
        MockDispatcher {
            launched: StdMutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn launched(&self) -> Vec<Uuid> {
        self.launched.lock().unwrap().clone()
    }
}

/// Dispatcher standing in for a compute platform that accepts the launch
/// call but never answers it.
pub struct StallingDispatcher;

#[async_trait]
impl Dispatch for StallingDispatcher {
    async fn dispatch(&self, _job_id: Uuid) -> Result<(), DispatchError> {
        std::future::pending().await
    }
}

#[async_trait]
impl Dispatch for MockDispatcher {
    async fn dispatch(&self, job_id: Uuid) -> Result<(), DispatchError> {
        if self.fail {
            return Err(DispatchError::Launch(std::io::Error::other(
                "compute platform rejected the task",
            )));
        }
        self.launched.lock().unwrap().push(job_id);
        Ok(())
    }
}
