//! Database (SQLite) configuration.
//!
//! `path` is either a file path or the literal `:memory:`. An in-memory
//! database lives inside a single connection, so the pool built from it is
//! pinned to one connection regardless of `max_connections`; a second
//! connection would see an empty schema with no lines or stations.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Path value selecting an in-memory database
const MEMORY_PATH: &str = ":memory:";

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum number of concurrent database connections (file databases only)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds a writer waits for a locked database before failing
    ///
    /// Mutations on different lines run concurrently and contend for the
    /// SQLite write lock.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,

    /// Whether to run pending migrations on startup (default: true)
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// Whether this configuration selects an in-memory database
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }
}

fn default_db_path() -> String {
    "busline.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_busy_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout_secs(),
            run_migrations: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_path_is_detected() {
        let config = DatabaseConfig {
            path: MEMORY_PATH.to_string(),
            ..Default::default()
        };
        assert!(config.is_in_memory());
        assert!(!DatabaseConfig::default().is_in_memory());
    }

    #[test]
    fn file_named_like_memory_is_a_file() {
        let config = DatabaseConfig {
            path: "data/:memory:.db".to_string(),
            ..Default::default()
        };
        assert!(!config.is_in_memory());
    }
}
