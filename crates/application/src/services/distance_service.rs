//! Distance query service
//!
//! Read-only answers over a line's current station sequence. Queries read the
//! sequence store directly and never the cached aggregates, except
//! [`DistanceService::line_distance`] which is a read-through of them.

use std::{collections::HashMap, fmt, sync::Arc};

use domain::{
    CumulativeDistance, DomainError, Line, LineId, LineStationLink, RouteProfile, Station,
    StationId, StationPairDistance,
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    error::ApplicationError,
    ports::{LinePort, LineStationPort, StationPort},
};

/// A station as it appears in a distance result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationRef {
    pub station_id: StationId,
    pub name: Option<String>,
    pub code: Option<String>,
}

/// One entry of a line's cumulative distance listing
#[derive(Debug, Clone, Serialize)]
pub struct CumulativeStop {
    #[serde(flatten)]
    pub distance: CumulativeDistance,
    pub station_name: Option<String>,
    pub station_code: Option<String>,
}

/// Distance between two stations of a line
#[derive(Debug, Clone, Serialize)]
pub struct PairDistance {
    pub origin: StationRef,
    pub destination: StationRef,
    pub distance_km: f64,
    pub intermediate_station_count: u32,
}

/// Service answering distance questions about lines
#[derive(Clone)]
pub struct DistanceService {
    lines: Arc<dyn LinePort>,
    stations: Arc<dyn StationPort>,
    links: Arc<dyn LineStationPort>,
}

impl fmt::Debug for DistanceService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceService").finish_non_exhaustive()
    }
}

impl DistanceService {
    #[must_use]
    pub fn new(
        lines: Arc<dyn LinePort>,
        stations: Arc<dyn StationPort>,
        links: Arc<dyn LineStationPort>,
    ) -> Self {
        Self {
            lines,
            stations,
            links,
        }
    }

    /// The line with its stored aggregates; nothing is recomputed
    #[instrument(skip(self))]
    pub async fn line_distance(&self, line_id: LineId) -> Result<Line, ApplicationError> {
        self.lines
            .get(&line_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Line", line_id.to_string()).into())
    }

    /// Running distance from the origin for every station in traversal order
    #[instrument(skip(self))]
    pub async fn cumulative_distances(
        &self,
        line_id: LineId,
    ) -> Result<Vec<CumulativeStop>, ApplicationError> {
        let links = self.line_links(line_id).await?;
        let directory = self.directory(&links).await?;

        let stops: Vec<CumulativeStop> = domain::cumulative_distances(&links)
            .into_iter()
            .map(|distance| {
                let station = directory.get(&distance.station_id);
                CumulativeStop {
                    distance,
                    station_name: station.map(|s| s.name.clone()),
                    station_code: station.map(|s| s.code.clone()),
                }
            })
            .collect();

        debug!(%line_id, count = stops.len(), "Computed cumulative distances");
        Ok(stops)
    }

    /// Distance between two stations of a line, in either order
    ///
    /// Fails with `NotFound` if either station is not linked to the line.
    #[instrument(skip(self))]
    pub async fn between(
        &self,
        line_id: LineId,
        origin: StationId,
        destination: StationId,
    ) -> Result<PairDistance, ApplicationError> {
        let links = self.line_links(line_id).await?;
        let profile = RouteProfile::new(&links);

        for station_id in [origin, destination] {
            if !profile.contains(station_id) {
                return Err(DomainError::not_found(
                    "Station on line",
                    format!("{station_id} on {line_id}"),
                )
                .into());
            }
        }
        let pair = profile
            .between(origin, destination)
            .ok_or_else(|| ApplicationError::Internal("route profile lost a station".into()))?;

        let directory = self.directory(&links).await?;
        debug!(%line_id, distance_km = pair.distance_km, "Computed station pair distance");
        Ok(enrich(&pair, &directory))
    }

    /// Distances between every unordered pair of stations on a line
    ///
    /// Fails with `NotFound` if the line has no stations.
    #[instrument(skip(self))]
    pub async fn matrix(&self, line_id: LineId) -> Result<Vec<PairDistance>, ApplicationError> {
        let links = self.line_links(line_id).await?;
        if links.is_empty() {
            return Err(DomainError::not_found("Stations of line", line_id.to_string()).into());
        }

        let directory = self.directory(&links).await?;
        let matrix: Vec<PairDistance> = RouteProfile::new(&links)
            .matrix()
            .iter()
            .map(|pair| enrich(pair, &directory))
            .collect();

        debug!(%line_id, pairs = matrix.len(), "Computed distance matrix");
        Ok(matrix)
    }

    async fn line_links(&self, line_id: LineId) -> Result<Vec<LineStationLink>, ApplicationError> {
        if self.lines.get(&line_id).await?.is_none() {
            return Err(DomainError::not_found("Line", line_id.to_string()).into());
        }
        self.links.list_for_line(&line_id).await
    }

    async fn directory(
        &self,
        links: &[LineStationLink],
    ) -> Result<HashMap<StationId, Station>, ApplicationError> {
        let ids: Vec<StationId> = links.iter().map(|l| l.station_id).collect();
        Ok(self
            .stations
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect())
    }
}

fn enrich(pair: &StationPairDistance, directory: &HashMap<StationId, Station>) -> PairDistance {
    let station_ref = |station_id: StationId| {
        let station = directory.get(&station_id);
        StationRef {
            station_id,
            name: station.map(|s| s.name.clone()),
            code: station.map(|s| s.code.clone()),
        }
    };

    PairDistance {
        origin: station_ref(pair.origin),
        destination: station_ref(pair.destination),
        distance_km: pair.distance_km,
        intermediate_station_count: pair.intermediate_station_count,
    }
}
