//! Distance query handlers
//!
//! Everything here is read-only. Only `/distance` reads the stored
//! aggregates; the other queries derive their answers from the current
//! station sequence.

use application::{CumulativeStop, PairDistance};
use axum::extract::{Path, State};
use domain::{Line, LineAggregates};
use serde::Serialize;
use tracing::instrument;

use super::{parse_line_id, parse_station_id};
use crate::{error::ApiError, response::ApiResponse, state::AppState};

/// Stored aggregates of a line
#[derive(Debug, Serialize)]
pub struct LineDistanceResponse {
    pub line_id: String,
    pub name: String,
    pub code: String,
    #[serde(flatten)]
    pub aggregates: LineAggregates,
}

impl From<Line> for LineDistanceResponse {
    fn from(line: Line) -> Self {
        Self {
            line_id: line.id.to_string(),
            name: line.name,
            code: line.code,
            aggregates: line.aggregates,
        }
    }
}

#[instrument(skip(state))]
pub async fn line_distance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<LineDistanceResponse>, ApiError> {
    let line_id = parse_line_id(&id)?;
    let line = state.distances.line_distance(line_id).await?;
    Ok(ApiResponse::ok(line.into()))
}

#[instrument(skip(state))]
pub async fn cumulative_distances(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vec<CumulativeStop>>, ApiError> {
    let line_id = parse_line_id(&id)?;
    let stops = state.distances.cumulative_distances(line_id).await?;
    Ok(ApiResponse::list(stops))
}

#[instrument(skip(state))]
pub async fn distance_matrix(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vec<PairDistance>>, ApiError> {
    let line_id = parse_line_id(&id)?;
    let matrix = state.distances.matrix(line_id).await?;
    Ok(ApiResponse::list(matrix))
}

#[instrument(skip(state))]
pub async fn distance_between(
    State(state): State<AppState>,
    Path((id, origin, destination)): Path<(String, String, String)>,
) -> Result<ApiResponse<PairDistance>, ApiError> {
    let line_id = parse_line_id(&id)?;
    let origin = parse_station_id(&origin)?;
    let destination = parse_station_id(&destination)?;

    let pair = state
        .distances
        .between(line_id, origin, destination)
        .await?;
    Ok(ApiResponse::ok(pair))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_distance_flattens_aggregates() {
        let line = Line::new("Centro", "L1").unwrap();
        let json = serde_json::to_value(LineDistanceResponse::from(line)).unwrap();

        assert_eq!(json["code"], "L1");
        assert_eq!(json["station_count"], 0);
        assert_eq!(json["max_fleet_allowed"], 0);
        assert!(json.get("aggregates").is_none());
    }
}
