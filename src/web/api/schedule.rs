use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::orchestrator::SubmitRequest;
use crate::stores::ScheduleRecord;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::auth::{require_permission, AuthenticatedUser};
use crate::web::config::Permission;
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitResponse {
    pub job_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/schedule/generate",
    tag = "schedule",
    request_body = SubmitRequest,
    responses(
        (status = 202, description = "Schedule request accepted; poll by job id", body = SubmitResponse),
        (status = 400, description = "Snapshot could not be built", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Insufficient permissions"),
        (status = 500, description = "Worker dispatch failed", body = ErrorResponse),
        (status = 502, description = "Artifact or metadata store unavailable", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn generate_schedule(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<SubmitRequest>,
) -> ApiResult<impl IntoResponse> {
    require_permission(&user, Permission::SubmitSchedule)?;

    let job_id = state.orchestrator.submit(&request).await?;

    Ok((StatusCode::ACCEPTED, Json(SubmitResponse { job_id })))
}

#[utoipa::path(
    get,
    path = "/api/schedule/{id}",
    tag = "schedule",
    params(("id" = Uuid, Path, description = "Job id returned by generate")),
    responses(
        (status = 200, description = "Schedule request is completed", body = ScheduleRecord),
        (status = 202, description = "Schedule request still in progress", body = ScheduleRecord),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Unknown job id", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_permission(&user, Permission::ViewSchedules)?;

    let record = state.orchestrator.get(id).await?;

    // Identical body either way; only the outer status tells them apart.
    let status = if record.status.is_terminal() {
        StatusCode::OK
    } else {
        StatusCode::ACCEPTED
    };
    Ok((status, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/schedule/output/{id}",
    tag = "schedule",
    params(("id" = Uuid, Path, description = "Job id returned by generate")),
    responses(
        (status = 200, description = "Decoded scheduling result", body = crate::domain::SchedulingInputOutputData),
        (status = 202, description = "Result not ready yet (no body)"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Unknown job id", body = ErrorResponse),
        (status = 500, description = "Stored result did not decode", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn get_schedule_output(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_permission(&user, Permission::ViewSchedules)?;

    match state.orchestrator.output(id).await? {
        Some(data) => Ok((StatusCode::OK, Json(data)).into_response()),
        None => Ok(StatusCode::ACCEPTED.into_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/schedule/mission/{id}",
    tag = "schedule",
    params(("id" = i64, Path, description = "Mission id")),
    responses(
        (status = 200, description = "All schedule requests for the mission", body = Vec<ScheduleRecord>),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("api_key" = []))
)]
pub async fn get_schedules_by_mission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    require_permission(&user, Permission::ViewSchedules)?;

    let records = state.orchestrator.by_mission(id).await?;

    Ok((StatusCode::OK, Json(records)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrphansQuery {
    /// Requests still `started` and untouched for this long are orphans.
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: i64,
}

fn default_stale_after_secs() -> i64 {
    3600
}

#[utoipa::path(
    get,
    path = "/api/schedule/orphans",
    tag = "schedule",
    params(
        ("stale_after_secs" = Option<i64>, Query, description = "Staleness threshold in seconds (default 3600)")
    ),
    responses(
        (status = 200, description = "Stale started records awaiting resubmission", body = Vec<ScheduleRecord>),
        (status = 401, description = "Missing or invalid API key"),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("api_key" = []))
)]
pub async fn get_orphans(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<OrphansQuery>,
) -> ApiResult<impl IntoResponse> {
    require_permission(&user, Permission::Maintenance)?;

    let records = state
        .orchestrator
        .find_orphans(Duration::seconds(query.stale_after_secs))
        .await?;

    Ok((StatusCode::OK, Json(records)))
}
