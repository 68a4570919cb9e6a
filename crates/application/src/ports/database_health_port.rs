//! Database health check port
//!
//! Lets readiness probes check the relational store without knowing which
//! engine backs it.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Result of a database health probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseHealth {
    /// Whether a trivial query succeeded
    pub reachable: bool,
    /// Engine version reported by the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Round-trip time of the probe in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl DatabaseHealth {
    /// A reachable store reporting `version`
    #[must_use]
    pub fn reachable(version: impl Into<String>) -> Self {
        Self {
            reachable: true,
            version: Some(version.into()),
            response_time_ms: None,
        }
    }

    /// An unreachable store
    #[must_use]
    pub const fn unreachable() -> Self {
        Self {
            reachable: false,
            version: None,
            response_time_ms: None,
        }
    }

    /// Record how long the probe took
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Port for database health checking operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseHealthPort: Send + Sync {
    /// Run a lightweight probe query and report the outcome
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_carries_version() {
        let health = DatabaseHealth::reachable("3.45.0").with_response_time(3);
        assert!(health.reachable);
        assert_eq!(health.version.as_deref(), Some("3.45.0"));
        assert_eq!(health.response_time_ms, Some(3));
    }

    #[test]
    fn unreachable_has_no_details() {
        let health = DatabaseHealth::unreachable();
        assert!(!health.reachable);
        assert!(health.version.is_none());
    }
}
