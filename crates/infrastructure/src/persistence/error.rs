//! Shared error mapping and column helpers for the sqlx persistence layer

use application::error::ApplicationError;
use chrono::{DateTime, SecondsFormat, Utc};

/// Map a sqlx error to an application-layer error
pub fn map_sqlx_error(e: sqlx::Error) -> ApplicationError {
    match e {
        sqlx::Error::RowNotFound => {
            ApplicationError::NotFound("Database record not found".to_string())
        },
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ApplicationError::InvalidOperation(format!("Record already exists: {db_err}"))
        },
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            ApplicationError::NotFound(format!("Referenced record does not exist: {db_err}"))
        },
        sqlx::Error::Database(db_err) => {
            ApplicationError::Internal(format!("Database error: {db_err}"))
        },
        other => ApplicationError::Internal(format!("Database error: {other}")),
    }
}

/// Whether a sqlx error is a unique constraint violation
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Fixed-width RFC3339 so that text ordering matches time ordering
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse an RFC3339 datetime string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, ApplicationError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApplicationError::Internal(format!("Invalid datetime: {e}")))
}

/// Convert a stored count column
pub fn count_from_i64(column: &str, value: i64) -> Result<u32, ApplicationError> {
    u32::try_from(value)
        .map_err(|_| ApplicationError::Internal(format!("Invalid {column}: {value}")))
}
