//! Line and station catalog
//!
//! Registers the lines and stations the topology engine links together.

use std::{fmt, sync::Arc};

use domain::{DomainError, Line, LineId, LineStatus, Station, StationId};
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{LinePort, StationPort},
};

/// Input for registering a line
#[derive(Debug, Clone, Default)]
pub struct NewLine {
    pub name: String,
    pub code: String,
    pub color: Option<String>,
    pub status: Option<LineStatus>,
}

/// Input for registering a station
#[derive(Debug, Clone, Default)]
pub struct NewStation {
    pub name: String,
    pub code: String,
    pub address: Option<String>,
}

/// Service for creating and browsing lines and stations
#[derive(Clone)]
pub struct LineCatalogService {
    lines: Arc<dyn LinePort>,
    stations: Arc<dyn StationPort>,
}

impl fmt::Debug for LineCatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineCatalogService").finish_non_exhaustive()
    }
}

impl LineCatalogService {
    #[must_use]
    pub fn new(lines: Arc<dyn LinePort>, stations: Arc<dyn StationPort>) -> Self {
        Self { lines, stations }
    }

    /// Register a line with zeroed aggregates
    #[instrument(skip(self, request), fields(code = %request.code))]
    pub async fn create_line(&self, request: NewLine) -> Result<Line, ApplicationError> {
        let mut line = Line::new(request.name, request.code)?;
        if let Some(color) = request.color {
            line = line.with_color(color);
        }
        if let Some(status) = request.status {
            line = line.with_status(status);
        }

        self.lines.save(&line).await?;
        info!(line_id = %line.id, "Line created");
        Ok(line)
    }

    #[instrument(skip(self))]
    pub async fn get_line(&self, id: LineId) -> Result<Line, ApplicationError> {
        self.lines
            .get(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Line", id.to_string()).into())
    }

    #[instrument(skip(self))]
    pub async fn list_lines(&self) -> Result<Vec<Line>, ApplicationError> {
        let lines = self.lines.list().await?;
        debug!(count = lines.len(), "Listed lines");
        Ok(lines)
    }

    /// Register a station
    #[instrument(skip(self, request), fields(code = %request.code))]
    pub async fn create_station(&self, request: NewStation) -> Result<Station, ApplicationError> {
        let mut station = Station::new(request.name, request.code)?;
        if let Some(address) = request.address {
            station = station.with_address(address);
        }

        self.stations.save(&station).await?;
        info!(station_id = %station.id, "Station created");
        Ok(station)
    }

    #[instrument(skip(self))]
    pub async fn get_station(&self, id: StationId) -> Result<Station, ApplicationError> {
        self.stations
            .get(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("Station", id.to_string()).into())
    }

    #[instrument(skip(self))]
    pub async fn list_stations(&self) -> Result<Vec<Station>, ApplicationError> {
        let stations = self.stations.list().await?;
        debug!(count = stations.len(), "Listed stations");
        Ok(stations)
    }
}
