//! Topology service
//!
//! The operations that change a line's station sequence. Every mutation is
//! followed, under the same per-line lock, by a full recompute of the line's
//! aggregates from its current links. A mutation is not reported as
//! successful until that recompute has succeeded.

use std::{collections::HashMap, fmt, sync::Arc};

use domain::{
    DomainError, LineAggregates, LineId, LineStationId, LineStationLink, LinkPlacement,
    SequencePosition, Station, StationId,
};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use super::LineLocks;
use crate::{
    error::ApplicationError,
    ports::{LinePort, LineStationPort, StationPort},
};

/// Input for attaching a station to a line
///
/// Mirrors what callers may send: required fields are optional here so that
/// their absence is reported as a validation error.
#[derive(Debug, Clone, Default)]
pub struct AssignStation {
    /// Station to attach (required)
    pub station_id: Option<StationId>,
    /// Place in the traversal order (required)
    pub sequence_position: Option<u32>,
    /// Kilometers from the previous station (default 0)
    pub distance_from_previous: Option<f64>,
    /// Minutes from the previous station (default 5)
    pub estimated_minutes_from_previous: Option<u32>,
    /// Informational start flag (default false)
    pub is_initial_station: Option<bool>,
    /// Informational end flag (default false)
    pub is_final_station: Option<bool>,
}

impl AssignStation {
    /// Input for `station_id` at `position` with every optional field defaulted
    #[must_use]
    pub const fn new(station_id: StationId, position: u32) -> Self {
        Self {
            station_id: Some(station_id),
            sequence_position: Some(position),
            distance_from_previous: None,
            estimated_minutes_from_previous: None,
            is_initial_station: None,
            is_final_station: None,
        }
    }

    /// Set the distance from the previous station
    #[must_use]
    pub const fn with_distance(mut self, kilometers: f64) -> Self {
        self.distance_from_previous = Some(kilometers);
        self
    }

    fn validate(&self) -> Result<(StationId, LinkPlacement), DomainError> {
        let station_id = self
            .station_id
            .ok_or_else(|| DomainError::validation("station_id is required"))?;
        let position = self
            .sequence_position
            .ok_or_else(|| DomainError::validation("sequence_position is required"))?;

        let placement = LinkPlacement::new(SequencePosition::new(position)?)
            .with_distance(self.distance_from_previous.unwrap_or(0.0))?
            .with_minutes(
                self.estimated_minutes_from_previous
                    .unwrap_or(LinkPlacement::DEFAULT_MINUTES_FROM_PREVIOUS),
            )
            .with_endpoints(
                self.is_initial_station.unwrap_or(false),
                self.is_final_station.unwrap_or(false),
            );

        Ok((station_id, placement))
    }
}

/// A link enriched with the station's public details
#[derive(Debug, Clone, Serialize)]
pub struct LineStop {
    /// The sequence store row
    #[serde(flatten)]
    pub link: LineStationLink,
    /// Station display name
    pub station_name: Option<String>,
    /// Station public code
    pub station_code: Option<String>,
}

/// Outcome of a reconciliation pass over every line
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    /// Lines whose aggregates were recomputed
    pub recomputed: usize,
    /// Lines whose recompute failed
    pub failed: Vec<LineId>,
}

/// Service owning every change to line topology
#[derive(Clone)]
pub struct TopologyService {
    lines: Arc<dyn LinePort>,
    stations: Arc<dyn StationPort>,
    links: Arc<dyn LineStationPort>,
    locks: Arc<LineLocks>,
}

impl fmt::Debug for TopologyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopologyService")
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl TopologyService {
    /// Create a new topology service
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
            locks: Arc::new(LineLocks::new()),
        }
    }

    /// Attach a station to a line and refresh the line's aggregates
    #[instrument(skip(self, request), fields(station_id = ?request.station_id))]
    pub async fn assign_station_to_line(
        &self,
        line_id: LineId,
        request: AssignStation,
    ) -> Result<LineStationLink, ApplicationError> {
        let (station_id, placement) = request.validate()?;

        let _guard = self.locks.acquire(line_id).await;

        self.require_line(&line_id).await?;
        if self.stations.get(&station_id).await?.is_none() {
            return Err(DomainError::not_found("Station", station_id.to_string()).into());
        }
        if self.links.find(&line_id, &station_id).await?.is_some() {
            return Err(DomainError::duplicate_link(line_id, station_id).into());
        }

        let link = LineStationLink::new(line_id, station_id, placement);
        self.links.attach(&link).await?;
        info!(
            %line_id,
            link_id = %link.id,
            position = %link.sequence_position,
            "Station attached to line"
        );

        self.refresh_after_mutation(line_id).await?;
        Ok(link)
    }

    /// Detach a station from its line and refresh the line's aggregates
    ///
    /// The following station's `distance_from_previous` is left as it was.
    #[instrument(skip(self))]
    pub async fn remove_station_from_line(
        &self,
        link_id: LineStationId,
    ) -> Result<LineId, ApplicationError> {
        let link = self.require_link(&link_id).await?;
        let _guard = self.locks.acquire(link.line_id).await;

        let line_id = self.links.detach(&link_id).await?;
        info!(%line_id, %link_id, "Station detached from line");

        self.refresh_after_mutation(line_id).await?;
        Ok(line_id)
    }

    /// Move a link within its line and refresh the line's aggregates
    ///
    /// A `None` distance keeps the stored distance.
    #[instrument(skip(self))]
    pub async fn reorder_station(
        &self,
        link_id: LineStationId,
        sequence_position: Option<u32>,
        distance_from_previous: Option<f64>,
    ) -> Result<LineStationLink, ApplicationError> {
        let position = sequence_position
            .ok_or_else(|| DomainError::validation("sequence_position is required"))
            .and_then(SequencePosition::new)?;

        let mut link = self.require_link(&link_id).await?;
        let _guard = self.locks.acquire(link.line_id).await;

        link.reposition(position, distance_from_previous)?;
        let line_id = self
            .links
            .update_position(&link_id, position, distance_from_previous)
            .await?;
        info!(%line_id, %link_id, %position, "Station reordered");

        self.refresh_after_mutation(line_id).await?;
        Ok(link)
    }

    /// Rebuild a line's aggregates from its current links and store them
    ///
    /// Safe to call at any time; with no intervening mutation it always
    /// produces the same values.
    #[instrument(skip(self))]
    pub async fn recompute(&self, line_id: LineId) -> Result<LineAggregates, ApplicationError> {
        let links = self.links.list_for_line(&line_id).await?;
        let aggregates = LineAggregates::from_links(&links);
        self.lines.update_aggregates(&line_id, &aggregates).await?;

        debug!(
            %line_id,
            station_count = aggregates.station_count,
            total_distance = aggregates.total_distance,
            "Line aggregates recomputed"
        );
        Ok(aggregates)
    }

    /// Recompute one line while holding its lock
    #[instrument(skip(self))]
    pub async fn reconcile_line(
        &self,
        line_id: LineId,
    ) -> Result<LineAggregates, ApplicationError> {
        self.require_line(&line_id).await?;
        let _guard = self.locks.acquire(line_id).await;
        self.recompute(line_id).await
    }

    /// Recompute the aggregates of every line
    ///
    /// Failures are logged and reported; they do not stop the pass.
    #[instrument(skip(self))]
    pub async fn reconcile_all(&self) -> Result<ReconciliationReport, ApplicationError> {
        let lines = self.lines.list().await?;
        let mut report = ReconciliationReport::default();

        for line in lines {
            let _guard = self.locks.acquire(line.id).await;
            match self.recompute(line.id).await {
                Ok(_) => report.recomputed += 1,
                Err(e) => {
                    warn!(line_id = %line.id, error = %e, "Failed to reconcile line aggregates");
                    report.failed.push(line.id);
                },
            }
        }

        info!(
            recomputed = report.recomputed,
            failed = report.failed.len(),
            "Reconciliation pass complete"
        );
        Ok(report)
    }

    /// A line's links in traversal order with station name and code
    #[instrument(skip(self))]
    pub async fn list_line_stops(&self, line_id: LineId) -> Result<Vec<LineStop>, ApplicationError> {
        self.require_line(&line_id).await?;
        let links = self.links.list_for_line(&line_id).await?;

        let ids: Vec<StationId> = links.iter().map(|l| l.station_id).collect();
        let stations: HashMap<StationId, Station> = self
            .stations
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let stops: Vec<LineStop> = domain::traversal_order(&links)
            .into_iter()
            .map(|link| {
                let station = stations.get(&link.station_id);
                LineStop {
                    link: link.clone(),
                    station_name: station.map(|s| s.name.clone()),
                    station_code: station.map(|s| s.code.clone()),
                }
            })
            .collect();

        debug!(%line_id, count = stops.len(), "Listed line stops");
        Ok(stops)
    }

    async fn require_line(&self, line_id: &LineId) -> Result<(), ApplicationError> {
        match self.lines.get(line_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Line", line_id.to_string()).into()),
        }
    }

    async fn require_link(
        &self,
        link_id: &LineStationId,
    ) -> Result<LineStationLink, ApplicationError> {
        self.links
            .get(link_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Line station", link_id.to_string()).into())
    }

    /// Recompute after a successful link mutation
    ///
    /// Failure here leaves stale aggregates behind, so it is reported as an
    /// inconsistency rather than a plain storage error.
    async fn refresh_after_mutation(&self, line_id: LineId) -> Result<(), ApplicationError> {
        match self.recompute(line_id).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(
                    %line_id,
                    error = %e,
                    "Link mutation applied but aggregate recompute failed; line needs reconciliation"
                );
                Err(ApplicationError::AggregateInconsistency {
                    line_id,
                    reason: e.to_string(),
                })
            },
        }
    }
}
