use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::params::{utc_timestamp, Job, ScheduleParameters};

/// The optimizer's assignment of a job to a satellite and ground station
/// with concrete imaging and downlink windows.
///
/// `job_begin <= job_end <= downlink_begin <= downlink_end` is expected of
/// worker output but not enforced on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlannedOrder {
    pub job: Job,
    pub satellite_name: String,
    pub ground_station_name: String,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub job_begin: DateTime<Utc>,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub job_end: DateTime<Utc>,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub downlink_begin: DateTime<Utc>,
    #[serde(with = "utc_timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub downlink_end: DateTime<Utc>,
}

impl PlannedOrder {
    pub fn windows_are_ordered(&self) -> bool {
        self.job_begin <= self.job_end
            && self.job_end <= self.downlink_begin
            && self.downlink_begin <= self.downlink_end
    }
}

/// Decoded result of a scheduling run. Every input job lands in exactly one
/// of the five rejection buckets or one `planned_orders` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleOutput {
    /// Hash of the input parameters that produced this output, kept for
    /// correlation and re-scheduling.
    pub input_hash: String,
    pub impossible_orders: Vec<Job>,
    pub impossible_orders_from_outages: Vec<Job>,
    pub impossible_orders_from_ground_stations: Vec<Job>,
    pub undownlinkable_orders: Vec<Job>,
    pub rejected_orders: Vec<Job>,
    /// Satellite name to the ordered sequence of orders planned onto it.
    pub planned_orders: BTreeMap<String, Vec<PlannedOrder>>,
}

impl ScheduleOutput {
    /// Number of times a job name appears across all buckets and planned
    /// lists. A well-formed output yields exactly 1 for every input job.
    pub fn occurrences_of(&self, job_name: &str) -> usize {
        let rejected = [
            &self.impossible_orders,
            &self.impossible_orders_from_outages,
            &self.impossible_orders_from_ground_stations,
            &self.undownlinkable_orders,
            &self.rejected_orders,
        ]
        .iter()
        .map(|bucket| bucket.iter().filter(|job| job.name == job_name).count())
        .sum::<usize>();

        let planned = self
            .planned_orders
            .values()
            .flatten()
            .filter(|order| order.job.name == job_name)
            .count();

        rejected + planned
    }
}

/// Archival pairing of a scheduling run's input and output, keyed by the
/// input hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SchedulingInputOutputData {
    pub params_hash: String,
    pub params: ScheduleParameters,
    pub output: ScheduleOutput,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::params::Priority;

    fn job(name: &str) -> Job {
        let at = utc_timestamp::parse("2025-06-01T10:00:00").unwrap();
        Job::new(name.into(), 1.0, 2.0, Priority::Medium, at, at, at, None).unwrap()
    }

    fn planned(name: &str) -> PlannedOrder {
        PlannedOrder {
            job: job(name),
            satellite_name: "SAT-1".into(),
            ground_station_name: "GS-1".into(),
            job_begin: utc_timestamp::parse("2025-06-01T10:00:00").unwrap(),
            job_end: utc_timestamp::parse("2025-06-01T10:05:00").unwrap(),
            downlink_begin: utc_timestamp::parse("2025-06-01T11:00:00").unwrap(),
            downlink_end: utc_timestamp::parse("2025-06-01T11:02:00").unwrap(),
        }
    }

    fn output() -> ScheduleOutput {
        let mut planned_orders = BTreeMap::new();
        planned_orders.insert("SAT-1".to_string(), vec![planned("img-a")]);
        ScheduleOutput {
            input_hash: "abc".into(),
            impossible_orders: vec![job("img-b")],
            impossible_orders_from_outages: Vec::new(),
            impossible_orders_from_ground_stations: Vec::new(),
            undownlinkable_orders: Vec::new(),
            rejected_orders: vec![job("img-c")],
            planned_orders,
        }
    }

    #[test]
    fn every_job_lands_in_exactly_one_bucket() {
        let output = output();
        for name in ["img-a", "img-b", "img-c"] {
            assert_eq!(output.occurrences_of(name), 1, "job {name}");
        }
        assert_eq!(output.occurrences_of("img-unknown"), 0);
    }

    #[test]
    fn planned_order_window_ordering_holds_for_worker_output() {
        let output = output();
        for order in output.planned_orders.values().flatten() {
            assert!(order.windows_are_ordered());
        }
    }

    #[test]
    fn output_round_trips_through_json() {
        let output = output();
        let encoded = serde_json::to_string(&output).unwrap();
        let decoded: ScheduleOutput = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, output);
    }
}
