//! Application state shared across handlers

use std::{fmt, sync::Arc};

use application::{DatabaseHealthPort, DistanceService, LineCatalogService, TopologyService};
use infrastructure::{
    AppConfig,
    persistence::{
        AsyncDatabase, SqliteDatabaseHealth, SqliteLineStationStore, SqliteLineStore,
        SqliteStationStore,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Station sequence mutations and aggregate maintenance
    pub topology: Arc<TopologyService>,
    /// Read-only distance queries
    pub distances: Arc<DistanceService>,
    /// Line and station registration
    pub catalog: Arc<LineCatalogService>,
    /// Database probe for readiness checks
    pub database_health: Arc<dyn DatabaseHealthPort>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire every service to the sqlx stores of `db`
    ///
    /// All services share one topology service instance so that its per-line
    /// locks cover every mutation made through this state.
    #[must_use]
    pub fn from_database(db: &AsyncDatabase, config: AppConfig) -> Self {
        let pool = db.pool().clone();
        let lines = Arc::new(SqliteLineStore::new(pool.clone()));
        let stations = Arc::new(SqliteStationStore::new(pool.clone()));
        let links = Arc::new(SqliteLineStationStore::new(pool.clone()));

        Self {
            topology: Arc::new(TopologyService::new(
                lines.clone(),
                stations.clone(),
                links.clone(),
            )),
            distances: Arc::new(DistanceService::new(lines.clone(), stations.clone(), links)),
            catalog: Arc::new(LineCatalogService::new(lines, stations)),
            database_health: Arc::new(SqliteDatabaseHealth::new(pool)),
            config: Arc::new(config),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("topology", &self.topology)
            .field("environment", &self.config.environment)
            .finish_non_exhaustive()
    }
}
