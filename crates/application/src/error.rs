//! Application-level errors

use domain::{DomainError, LineId};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request is well-formed but cannot be applied
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A link mutation succeeded but the line aggregates could not be refreshed
    ///
    /// The stored aggregates of `line_id` are stale until `recompute` succeeds.
    #[error("Aggregates of line {line_id} are stale: {reason}")]
    AggregateInconsistency { line_id: LineId, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Storage or other unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether the caller can fix the request and try again
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Domain(_) | Self::NotFound(_) | Self::InvalidOperation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_are_transparent() {
        let err = ApplicationError::from(DomainError::validation("station_id is required"));
        assert_eq!(err.to_string(), "Validation failed: station_id is required");
        assert!(err.is_client_error());
    }

    #[test]
    fn aggregate_inconsistency_names_line() {
        let line_id = LineId::new();
        let err = ApplicationError::AggregateInconsistency {
            line_id,
            reason: "database is locked".to_string(),
        };
        assert!(err.to_string().contains(&line_id.to_string()));
        assert!(!err.is_client_error());
    }

    #[test]
    fn internal_is_not_client_error() {
        assert!(!ApplicationError::Internal("boom".to_string()).is_client_error());
    }
}
