use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use crate::domain::{
    GroundStation, GroundStationOutageRequest, Job, OutageRequest, PlannedOrder, Priority,
    ScheduleOutput, ScheduleParameters, SchedulingInputOutputData, TwoLineElement,
};
use crate::orchestrator::SubmitRequest;
use crate::stores::ScheduleRecord;

use super::api::error::ErrorResponse;
use super::api::schedule::{OrphansQuery, SubmitResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::schedule::generate_schedule,
        super::api::schedule::get_schedule,
        super::api::schedule::get_schedule_output,
        super::api::schedule::get_schedules_by_mission,
        super::api::schedule::get_orphans,
    ),
    components(
        schemas(
            SubmitRequest,
            SubmitResponse,
            OrphansQuery,
            ErrorResponse,
            ScheduleRecord,
            ScheduleParameters,
            TwoLineElement,
            Job,
            Priority,
            GroundStation,
            OutageRequest,
            GroundStationOutageRequest,
            PlannedOrder,
            ScheduleOutput,
            SchedulingInputOutputData,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Sat-Sched API",
        description = "Schedule generation and result retrieval for satellite missions",
        version = "0.1.0"
    ),
    tags(
        (name = "schedule", description = "Schedule request orchestration")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
