//! Handlers addressing a single line-station link

use axum::extract::{Path, State};
use domain::LineStationLink;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use super::parse_link_id;
use crate::{
    error::ApiError, middleware::ValidatedJson, response::ApiResponse, state::AppState,
};

/// Request body for moving a station within its line
///
/// Omitting `distance_from_previous` keeps the stored distance.
#[derive(Debug, Deserialize, Validate)]
pub struct ReorderStationRequest {
    #[validate(
        required(message = "is required"),
        range(min = 1, message = "must be at least 1")
    )]
    pub sequence_position: Option<u32>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub distance_from_previous: Option<f64>,
}

/// Confirmation of a detach
#[derive(Debug, Serialize)]
pub struct RemovedLink {
    pub id: String,
    pub line_id: String,
}

#[instrument(skip(state, request))]
pub async fn reorder_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ReorderStationRequest>,
) -> Result<ApiResponse<LineStationLink>, ApiError> {
    let link_id = parse_link_id(&id)?;
    let link = state
        .topology
        .reorder_station(
            link_id,
            request.sequence_position,
            request.distance_from_previous,
        )
        .await?;
    Ok(ApiResponse::ok(link))
}

#[instrument(skip(state))]
pub async fn remove_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<RemovedLink>, ApiError> {
    let link_id = parse_link_id(&id)?;
    let line_id = state.topology.remove_station_from_line(link_id).await?;
    Ok(ApiResponse::ok(RemovedLink {
        id: link_id.to_string(),
        line_id: line_id.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_request_requires_position() {
        let request: ReorderStationRequest =
            serde_json::from_str(r#"{"distance_from_previous": 2.5}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sequence_position"));
    }

    #[test]
    fn reorder_request_distance_is_optional() {
        let request: ReorderStationRequest =
            serde_json::from_str(r#"{"sequence_position": 4}"#).unwrap();
        assert!(request.validate().is_ok());
    }
}
