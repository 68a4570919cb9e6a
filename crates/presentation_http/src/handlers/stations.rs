//! Station handlers

use application::NewStation;
use axum::extract::{Path, State};
use domain::Station;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use super::parse_station_id;
use crate::{
    error::ApiError, middleware::ValidatedJson, response::ApiResponse, state::AppState,
};

/// Request body for registering a station
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStationRequest {
    #[validate(required(message = "is required"), length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(required(message = "is required"), length(min = 1, max = 20))]
    pub code: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

#[instrument(skip(state))]
pub async fn list_stations(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Station>>, ApiError> {
    let stations = state.catalog.list_stations().await?;
    Ok(ApiResponse::list(stations))
}

#[instrument(skip(state, request))]
pub async fn create_station(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateStationRequest>,
) -> Result<ApiResponse<Station>, ApiError> {
    let station = state
        .catalog
        .create_station(NewStation {
            name: request.name.unwrap_or_default(),
            code: request.code.unwrap_or_default(),
            address: request.address,
        })
        .await?;
    Ok(ApiResponse::created(station))
}

#[instrument(skip(state))]
pub async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Station>, ApiError> {
    let station_id = parse_station_id(&id)?;
    let station = state.catalog.get_station(station_id).await?;
    Ok(ApiResponse::ok(station))
}
