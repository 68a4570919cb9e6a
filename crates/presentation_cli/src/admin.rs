//! Database administration commands
//!
//! These run directly against the SQLite file, without a server.

use std::sync::Arc;

use application::{ApplicationError, ReconciliationReport, TopologyService};
use domain::{LineAggregates, LineId};
use infrastructure::{
    AsyncDatabase, AsyncDatabaseConfig, DatabaseConfig, SqliteLineStationStore, SqliteLineStore,
    SqliteStationStore,
};
use tracing::info;

/// Outcome of a `reconcile` run
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// A single line was recomputed
    Line {
        line_id: LineId,
        aggregates: LineAggregates,
    },
    /// Every line was visited
    All(ReconciliationReport),
}

impl ReconcileOutcome {
    /// Whether any line was left with stale aggregates
    pub fn has_failures(&self) -> bool {
        match self {
            Self::Line { .. } => false,
            Self::All(report) => !report.failed.is_empty(),
        }
    }
}

/// Open the configured database without applying migrations
pub async fn open(config: &DatabaseConfig) -> anyhow::Result<AsyncDatabase> {
    let db = AsyncDatabase::new(&AsyncDatabaseConfig::from(config)).await?;
    info!(path = %config.path, "Database opened");
    Ok(db)
}

/// Apply pending migrations
pub async fn migrate(db: &AsyncDatabase) -> anyhow::Result<()> {
    db.migrate().await?;
    Ok(())
}

/// Recompute stored aggregates of one line, or of all lines
pub async fn reconcile(
    db: &AsyncDatabase,
    line: Option<LineId>,
) -> Result<ReconcileOutcome, ApplicationError> {
    let pool = db.pool().clone();
    let topology = TopologyService::new(
        Arc::new(SqliteLineStore::new(pool.clone())),
        Arc::new(SqliteStationStore::new(pool.clone())),
        Arc::new(SqliteLineStationStore::new(pool)),
    );

    match line {
        Some(line_id) => {
            let aggregates = topology.reconcile_line(line_id).await?;
            Ok(ReconcileOutcome::Line {
                line_id,
                aggregates,
            })
        },
        None => Ok(ReconcileOutcome::All(topology.reconcile_all().await?)),
    }
}
