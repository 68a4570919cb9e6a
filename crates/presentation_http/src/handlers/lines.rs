//! Line handlers
//!
//! Registration and listing of lines, the station sequence of a line, and
//! manual reconciliation of stored aggregates.

use application::{AssignStation, LineStop, NewLine, ReconciliationReport};
use axum::extract::{Path, State};
use domain::{Line, LineAggregates, LineStationLink, LineStatus};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use super::{parse_line_id, parse_station_id};
use crate::{
    error::ApiError, middleware::ValidatedJson, response::ApiResponse, state::AppState,
};

/// Request body for registering a line
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLineRequest {
    #[validate(required(message = "is required"), length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(required(message = "is required"), length(min = 1, max = 20))]
    pub code: Option<String>,
    #[validate(length(max = 32))]
    pub color: Option<String>,
    pub status: Option<LineStatus>,
}

/// Request body for attaching a station to a line
#[derive(Debug, Deserialize, Validate)]
pub struct AssignStationRequest {
    #[validate(required(message = "is required"))]
    pub station_id: Option<String>,
    #[validate(
        required(message = "is required"),
        range(min = 1, message = "must be at least 1")
    )]
    pub sequence_position: Option<u32>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub distance_from_previous: Option<f64>,
    pub estimated_minutes_from_previous: Option<u32>,
    pub is_initial_station: Option<bool>,
    pub is_final_station: Option<bool>,
}

/// Response of a manual single-line reconciliation
#[derive(Debug, Serialize)]
pub struct RecomputeResponse {
    pub line_id: String,
    #[serde(flatten)]
    pub aggregates: LineAggregates,
}

/// List every line with its stored aggregates
#[instrument(skip(state))]
pub async fn list_lines(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Line>>, ApiError> {
    let lines = state.catalog.list_lines().await?;
    Ok(ApiResponse::list(lines))
}

/// Register a line
#[instrument(skip(state, request))]
pub async fn create_line(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateLineRequest>,
) -> Result<ApiResponse<Line>, ApiError> {
    let line = state
        .catalog
        .create_line(NewLine {
            name: request.name.unwrap_or_default(),
            code: request.code.unwrap_or_default(),
            color: request.color,
            status: request.status,
        })
        .await?;
    Ok(ApiResponse::created(line))
}

#[instrument(skip(state))]
pub async fn get_line(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Line>, ApiError> {
    let line_id = parse_line_id(&id)?;
    let line = state.catalog.get_line(line_id).await?;
    Ok(ApiResponse::ok(line))
}

/// The line's stations in traversal order
#[instrument(skip(state))]
pub async fn list_line_stations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vec<LineStop>>, ApiError> {
    let line_id = parse_line_id(&id)?;
    let stops = state.topology.list_line_stops(line_id).await?;
    Ok(ApiResponse::list(stops))
}

/// Attach a station to the line
#[instrument(skip(state, request))]
pub async fn assign_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<AssignStationRequest>,
) -> Result<ApiResponse<LineStationLink>, ApiError> {
    let line_id = parse_line_id(&id)?;
    let station_id = request
        .station_id
        .as_deref()
        .map(parse_station_id)
        .transpose()?;

    let link = state
        .topology
        .assign_station_to_line(
            line_id,
            AssignStation {
                station_id,
                sequence_position: request.sequence_position,
                distance_from_previous: request.distance_from_previous,
                estimated_minutes_from_previous: request.estimated_minutes_from_previous,
                is_initial_station: request.is_initial_station,
                is_final_station: request.is_final_station,
            },
        )
        .await?;
    Ok(ApiResponse::created(link))
}

/// Recompute one line's aggregates from its current links
#[instrument(skip(state))]
pub async fn recompute_line(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<RecomputeResponse>, ApiError> {
    let line_id = parse_line_id(&id)?;
    let aggregates = state.topology.reconcile_line(line_id).await?;
    info!(%line_id, "Line reconciled on request");
    Ok(ApiResponse::ok(RecomputeResponse {
        line_id: line_id.to_string(),
        aggregates,
    }))
}

/// Recompute the aggregates of every line
#[instrument(skip(state))]
pub async fn reconcile_lines(
    State(state): State<AppState>,
) -> Result<ApiResponse<ReconciliationReport>, ApiError> {
    let report = state.topology.reconcile_all().await?;
    Ok(ApiResponse::ok(report))
}
