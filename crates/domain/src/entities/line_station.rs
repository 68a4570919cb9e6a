//! Line-station link entity - One row of a line's station sequence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{LineId, LineStationId, SequencePosition, StationId},
};

/// Where and how a station sits within a line
///
/// Carries every caller-supplied field of a link, already validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkPlacement {
    /// Place in the traversal order
    pub sequence_position: SequencePosition,
    /// Kilometers from the station at the previous position
    pub distance_from_previous: f64,
    /// Minutes from the station at the previous position
    pub estimated_minutes_from_previous: u32,
    /// Informational flag: the line starts here
    pub is_initial_station: bool,
    /// Informational flag: the line ends here
    pub is_final_station: bool,
}

impl LinkPlacement {
    /// Minutes assumed between stations when the caller gives none
    pub const DEFAULT_MINUTES_FROM_PREVIOUS: u32 = 5;

    /// Placement at `position` with zero distance and default travel time
    #[must_use]
    pub const fn new(sequence_position: SequencePosition) -> Self {
        Self {
            sequence_position,
            distance_from_previous: 0.0,
            estimated_minutes_from_previous: Self::DEFAULT_MINUTES_FROM_PREVIOUS,
            is_initial_station: false,
            is_final_station: false,
        }
    }

    /// Set the distance from the previous station
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for negative or non-finite values.
    pub fn with_distance(mut self, kilometers: f64) -> Result<Self, DomainError> {
        self.distance_from_previous = validate_distance(kilometers)?;
        Ok(self)
    }

    /// Set the travel time from the previous station
    #[must_use]
    pub const fn with_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes_from_previous = minutes;
        self
    }

    /// Set the endpoint flags
    #[must_use]
    pub const fn with_endpoints(mut self, is_initial: bool, is_final: bool) -> Self {
        self.is_initial_station = is_initial;
        self.is_final_station = is_final;
        self
    }
}

/// Check that a distance increment is a usable number of kilometers
///
/// # Errors
///
/// Returns `DomainError::ValidationError` for negative, NaN or infinite values.
pub fn validate_distance(kilometers: f64) -> Result<f64, DomainError> {
    if !kilometers.is_finite() || kilometers < 0.0 {
        return Err(DomainError::validation(format!(
            "distance_from_previous must be a non-negative number, got {kilometers}"
        )));
    }
    Ok(kilometers)
}

/// A station's membership in one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStationLink {
    /// Unique link identifier
    pub id: LineStationId,
    /// Owning line
    pub line_id: LineId,
    /// Linked station
    pub station_id: StationId,
    /// Place in the traversal order
    pub sequence_position: SequencePosition,
    /// Kilometers from the station at the previous position
    pub distance_from_previous: f64,
    /// Minutes from the station at the previous position
    pub estimated_minutes_from_previous: u32,
    /// Informational flag: the line starts here
    pub is_initial_station: bool,
    /// Informational flag: the line ends here
    pub is_final_station: bool,
    /// When the link was created
    pub created_at: DateTime<Utc>,
    /// When the link was last updated
    pub updated_at: DateTime<Utc>,
}

impl LineStationLink {
    /// Create a new link from a validated placement
    #[must_use]
    pub fn new(line_id: LineId, station_id: StationId, placement: LinkPlacement) -> Self {
        let now = Utc::now();
        Self {
            id: LineStationId::new(),
            line_id,
            station_id,
            sequence_position: placement.sequence_position,
            distance_from_previous: placement.distance_from_previous,
            estimated_minutes_from_previous: placement.estimated_minutes_from_previous,
            is_initial_station: placement.is_initial_station,
            is_final_station: placement.is_final_station,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the link and optionally change its distance increment
    ///
    /// A `None` distance keeps the current value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the distance is invalid.
    pub fn reposition(
        &mut self,
        position: SequencePosition,
        distance_from_previous: Option<f64>,
    ) -> Result<(), DomainError> {
        if let Some(distance) = distance_from_previous {
            self.distance_from_previous = validate_distance(distance)?;
        }
        self.sequence_position = position;
        self.updated_at = Utc::now();
        Ok(())
    }
}
