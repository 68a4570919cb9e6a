//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of SQLite (sqlx) and provides
//! configuration loading and logging setup shared by the binaries.

pub mod config;
pub mod persistence;
pub mod telemetry;

pub use config::{AppConfig, DatabaseConfig, Environment, LogFormat, ServerConfig};
pub use persistence::{
    AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError, SqliteDatabaseHealth,
    SqliteLineStationStore, SqliteLineStore, SqliteStationStore,
};
pub use telemetry::{LoggingError, init_logging};
