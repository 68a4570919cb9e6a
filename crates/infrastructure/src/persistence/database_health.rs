//! SQLite database health adapter
//!
//! Implements the `DatabaseHealthPort` over the shared sqlx pool.

use std::time::Instant;

use application::error::ApplicationError;
use application::ports::{DatabaseHealth, DatabaseHealthPort};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument, warn};

/// SQLite database health adapter
#[derive(Debug, Clone)]
pub struct SqliteDatabaseHealth {
    pool: SqlitePool,
}

impl SqliteDatabaseHealth {
    /// Create a new database health adapter with the given connection pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseHealthPort for SqliteDatabaseHealth {
    #[instrument(skip(self))]
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError> {
        let start = Instant::now();

        let version: Result<String, sqlx::Error> = sqlx::query_scalar("SELECT sqlite_version()")
            .fetch_one(&self.pool)
            .await;

        match version {
            Ok(version) => {
                // Probe round-trips are far below u64::MAX milliseconds
                #[allow(clippy::cast_possible_truncation)]
                let response_time_ms = start.elapsed().as_millis() as u64;

                debug!(%version, response_time_ms, "Database health check passed");
                Ok(DatabaseHealth::reachable(format!("SQLite {version}"))
                    .with_response_time(response_time_ms))
            },
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                Ok(DatabaseHealth::unreachable())
            },
        }
    }
}
