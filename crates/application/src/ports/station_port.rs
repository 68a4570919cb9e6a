//! Station storage port

use async_trait::async_trait;
use domain::{Station, StationId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for station persistence operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StationPort: Send + Sync {
    /// Save a new station
    async fn save(&self, station: &Station) -> Result<(), ApplicationError>;

    /// Get a station by ID
    async fn get(&self, id: &StationId) -> Result<Option<Station>, ApplicationError>;

    /// List all stations ordered by code
    async fn list(&self) -> Result<Vec<Station>, ApplicationError>;

    /// Get every station whose ID is in `ids`; unknown IDs are skipped
    async fn get_many(&self, ids: &[StationId]) -> Result<Vec<Station>, ApplicationError>;
}
