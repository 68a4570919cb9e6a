//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field is missing or malformed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// The station is already part of the line
    #[error("Station {station_id} is already linked to line {line_id}")]
    DuplicateLink { line_id: String, station_id: String },
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Create a duplicate link error
    pub fn duplicate_link(line_id: impl ToString, station_id: impl ToString) -> Self {
        Self::DuplicateLink {
            line_id: line_id.to_string(),
            station_id: station_id.to_string(),
        }
    }

    /// Whether this error means the referenced entity does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
