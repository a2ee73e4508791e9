use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Image payload size assumed when an image request does not carry one.
pub const DEFAULT_JOB_SIZE_BYTES: f64 = 128_000_000.0;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid priority {0}, expected 1..=3")]
    InvalidPriority(u8),
    #[error("job {name}: start is after end")]
    InvalidWindow { name: String },
}

/// Timestamp (de)serialization for optimizer-facing types.
///
/// Inputs may carry an offset (honored, converted to UTC) or be naive
/// (assumed UTC). Naive timestamps are never rejected.
pub mod utc_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
    }

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match dt {
                Some(dt) => super::serialize(dt, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

/// Two-line element identifying a satellite orbit for the optimizer.
/// Unique by `name` within one parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TwoLineElement {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

/// Ordinal job priority. Serialized as its integer value so the optimizer
/// can compare strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl TryFrom<u8> for Priority {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            other => Err(DomainError::InvalidPriority(other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> u8 {
        value as u8
    }
}

/// A unit of imaging work to be scheduled onto a satellite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Job {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub priority: Priority,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub start: DateTime<Utc>,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub end: DateTime<Utc>,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub delivery: DateTime<Utc>,
    /// Image size in bytes.
    #[serde(default = "default_job_size")]
    pub size: f64,
}

fn default_job_size() -> f64 {
    DEFAULT_JOB_SIZE_BYTES
}

impl Job {
    /// Builds a job, enforcing `start <= end`. `delivery >= end` is the
    /// optimizer's concern and is not checked here.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        latitude: f64,
        longitude: f64,
        priority: Priority,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        delivery: DateTime<Utc>,
        size: Option<f64>,
    ) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidWindow { name });
        }
        Ok(Job {
            name,
            latitude,
            longitude,
            priority,
            start,
            end,
            delivery,
            size: size.unwrap_or(DEFAULT_JOB_SIZE_BYTES),
        })
    }
}

/// Optimizer-facing projection of a ground station. Distinct from the
/// asset-management entity it is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GroundStation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
    pub mask: i64,
    pub uplink_rate: i64,
    pub downlink_rate: i64,
}

/// Window during which a satellite is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OutageRequest {
    pub name: String,
    pub satellite_name: String,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub start: DateTime<Utc>,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub end: DateTime<Utc>,
}

/// Window during which a ground station is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GroundStationOutageRequest {
    pub name: String,
    pub ground_station: GroundStation,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub start: DateTime<Utc>,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub end: DateTime<Utc>,
}

/// The full input snapshot handed to the optimizer. Immutable once built;
/// list ordering is the builder's insertion order and is part of the hashed
/// representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleParameters {
    /// Hash of the parameters of a previous run. Set only when re-scheduling
    /// from a prior result.
    pub input_hash: Option<String>,
    pub two_line_elements: Vec<TwoLineElement>,
    pub jobs: Vec<Job>,
    pub ground_stations: Vec<GroundStation>,
    pub outage_requests: Vec<OutageRequest>,
    pub ground_station_outage_requests: Vec<GroundStationOutageRequest>,
}
