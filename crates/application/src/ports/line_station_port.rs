//! Station sequence storage port
//!
//! Persists the ordered association between a line and its stations.
//! Implementations never touch line aggregates: callers recompute them
//! after every mutation.

use async_trait::async_trait;
use domain::{LineId, LineStationId, LineStationLink, SequencePosition, StationId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for line-station link persistence operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LineStationPort: Send + Sync {
    /// All links of a line in traversal order; empty for a line without stations
    async fn list_for_line(
        &self,
        line_id: &LineId,
    ) -> Result<Vec<LineStationLink>, ApplicationError>;

    /// Get a link by ID
    async fn get(&self, id: &LineStationId) -> Result<Option<LineStationLink>, ApplicationError>;

    /// Find the link of a station within a line
    async fn find(
        &self,
        line_id: &LineId,
        station_id: &StationId,
    ) -> Result<Option<LineStationLink>, ApplicationError>;

    /// Insert a link
    ///
    /// Fails with `DomainError::DuplicateLink` if the station is already on the
    /// line. Positions are not checked for uniqueness.
    async fn attach(&self, link: &LineStationLink) -> Result<LineStationId, ApplicationError>;

    /// Delete a link and return the line it belonged to
    ///
    /// Fails with `NotFound` if the link does not exist.
    async fn detach(&self, id: &LineStationId) -> Result<LineId, ApplicationError>;

    /// Change the ordering fields of one link and return its line
    ///
    /// A `None` distance keeps the stored value. Fails with `NotFound` if the
    /// link does not exist.
    async fn update_position(
        &self,
        id: &LineStationId,
        position: SequencePosition,
        distance_from_previous: Option<f64>,
    ) -> Result<LineId, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn LineStationPort>();
    }
}
