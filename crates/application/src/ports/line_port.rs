//! Line storage port
//!
//! Defines the interface for persisting lines and their cached aggregates.

use async_trait::async_trait;
use domain::{Line, LineAggregates, LineId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for line persistence operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LinePort: Send + Sync {
    /// Save a new line
    async fn save(&self, line: &Line) -> Result<(), ApplicationError>;

    /// Get a line by ID
    async fn get(&self, id: &LineId) -> Result<Option<Line>, ApplicationError>;

    /// List all lines ordered by code
    async fn list(&self) -> Result<Vec<Line>, ApplicationError>;

    /// Overwrite the four derived aggregate fields of a line in one update
    ///
    /// Fails with `NotFound` if the line does not exist.
    async fn update_aggregates(
        &self,
        id: &LineId,
        aggregates: &LineAggregates,
    ) -> Result<(), ApplicationError>;
}
