//! HTTP request handlers

pub mod distances;
pub mod health;
pub mod line_stations;
pub mod lines;
pub mod stations;

use domain::{LineId, LineStationId, StationId};

use crate::error::ApiError;

pub(crate) fn parse_line_id(raw: &str) -> Result<LineId, ApiError> {
    LineId::parse(raw).map_err(|e| ApiError::BadRequest(format!("Invalid line ID: {e}")))
}

pub(crate) fn parse_station_id(raw: &str) -> Result<StationId, ApiError> {
    StationId::parse(raw).map_err(|e| ApiError::BadRequest(format!("Invalid station ID: {e}")))
}

pub(crate) fn parse_link_id(raw: &str) -> Result<LineStationId, ApiError> {
    LineStationId::parse(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid line station ID: {e}")))
}
