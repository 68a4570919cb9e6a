//! Line entity - A bus route and its derived aggregate metrics

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LineStationLink;
use crate::{errors::DomainError, route, value_objects::LineId};

/// Operational state of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    /// In regular service
    #[default]
    Active,
    /// Not operated
    Inactive,
    /// Temporarily suspended for works
    Maintenance,
}

impl LineStatus {
    /// Storage representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(DomainError::validation(format!(
                "Invalid line status: {other}"
            ))),
        }
    }
}

/// Line-level values derived entirely from the line's station links
///
/// Never a source of truth: always rebuilt from the current links with
/// [`LineAggregates::from_links`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineAggregates {
    /// Number of linked stations
    pub station_count: u32,
    /// Sum of every link's distance from its predecessor, in kilometers
    pub total_distance: f64,
    /// Minimum buses required to operate the line
    pub min_fleet_required: u32,
    /// Maximum buses allowed on the line
    pub max_fleet_allowed: u32,
}

impl LineAggregates {
    /// Fleet policy: at most this many buses per station
    pub const MAX_FLEET_PER_STATION: u32 = 2;

    /// Derive the aggregates from a line's current links
    ///
    /// Distances are summed in traversal order so the total matches the last
    /// cumulative distance exactly.
    #[must_use]
    pub fn from_links(links: &[LineStationLink]) -> Self {
        let ordered = route::traversal_order(links);
        let station_count = u32::try_from(ordered.len()).unwrap_or(u32::MAX);
        let total_distance = ordered
            .iter()
            .fold(0.0, |acc, link| acc + link.distance_from_previous);

        Self {
            station_count,
            total_distance,
            min_fleet_required: station_count,
            max_fleet_allowed: station_count.saturating_mul(Self::MAX_FLEET_PER_STATION),
        }
    }
}

/// A bus route composed of an ordered sequence of stations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Unique line identifier
    pub id: LineId,
    /// Display name
    pub name: String,
    /// Short public code (e.g. "L7")
    pub code: String,
    /// Display color, free-form (usually a hex string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Operational state
    pub status: LineStatus,
    /// Cached aggregates, refreshed after every topology change
    pub aggregates: LineAggregates,
    /// When the line was created
    pub created_at: DateTime<Utc>,
    /// When the line was last updated
    pub updated_at: DateTime<Utc>,
}

impl Line {
    /// Create a new active line without stations
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if name or code is blank.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        let code = code.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if code.is_empty() {
            return Err(DomainError::validation("code is required"));
        }

        let now = Utc::now();
        Ok(Self {
            id: LineId::new(),
            name,
            code,
            color: None,
            status: LineStatus::Active,
            aggregates: LineAggregates::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Set the display color
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the operational state
    #[must_use]
    pub const fn with_status(mut self, status: LineStatus) -> Self {
        self.status = status;
        self
    }

    /// Replace the cached aggregates
    pub fn apply_aggregates(&mut self, aggregates: LineAggregates) {
        self.aggregates = aggregates;
        self.updated_at = Utc::now();
    }
}
