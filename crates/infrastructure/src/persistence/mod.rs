//! Persistence module
//!
//! SQLite storage for lines, stations, and the station sequence of each line.

pub mod async_connection;
pub mod database_health;
pub mod error;
pub mod line_station_store;
pub mod line_store;
pub mod station_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use database_health::SqliteDatabaseHealth;
pub use error::map_sqlx_error;
pub use line_station_store::SqliteLineStationStore;
pub use line_store::SqliteLineStore;
pub use station_store::SqliteStationStore;
