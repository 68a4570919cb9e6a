//! SQLite station sequence store using sqlx
//!
//! Rows are returned in traversal order: ascending `sequence_position`, ties
//! broken by creation time. This store never touches line aggregates.

use application::{error::ApplicationError, ports::LineStationPort};
use async_trait::async_trait;
use chrono::Utc;
use domain::{
    DomainError, LineId, LineStationId, LineStationLink, SequencePosition, StationId,
};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::{
    count_from_i64, format_datetime, is_unique_violation, map_sqlx_error, parse_datetime,
};

const SELECT_LINKS: &str = r"
    SELECT id, line_id, station_id, sequence_position, distance_from_previous,
           estimated_minutes_from_previous, is_initial_station, is_final_station,
           created_at, updated_at
    FROM line_stations";

/// Line-station link persistence backed by the `line_stations` table
#[derive(Debug, Clone)]
pub struct SqliteLineStationStore {
    pool: SqlitePool,
}

impl SqliteLineStationStore {
    /// Create a new station sequence store
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn owning_line(&self, id: &LineStationId) -> Result<LineId, ApplicationError> {
        let line_id: Option<String> =
            sqlx::query_scalar("SELECT line_id FROM line_stations WHERE id = $1")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        let line_id = line_id
            .ok_or_else(|| DomainError::not_found("Line station", id.to_string()))?;
        parse_line_id(&line_id)
    }
}

#[async_trait]
impl LineStationPort for SqliteLineStationStore {
    #[instrument(skip(self), fields(line_id = %line_id))]
    async fn list_for_line(
        &self,
        line_id: &LineId,
    ) -> Result<Vec<LineStationLink>, ApplicationError> {
        let rows: Vec<LinkRow> = sqlx::query_as(&format!(
            "{SELECT_LINKS} WHERE line_id = $1 ORDER BY sequence_position ASC, created_at ASC, id ASC"
        ))
        .bind(line_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(count = rows.len(), "Loaded line stations");
        rows.into_iter().map(LinkRow::into_link).collect()
    }

    #[instrument(skip(self), fields(link_id = %id))]
    async fn get(&self, id: &LineStationId) -> Result<Option<LineStationLink>, ApplicationError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!("{SELECT_LINKS} WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(LinkRow::into_link).transpose()
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        line_id: &LineId,
        station_id: &StationId,
    ) -> Result<Option<LineStationLink>, ApplicationError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            "{SELECT_LINKS} WHERE line_id = $1 AND station_id = $2"
        ))
        .bind(line_id.to_string())
        .bind(station_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(LinkRow::into_link).transpose()
    }

    #[instrument(skip(self, link), fields(link_id = %link.id, line_id = %link.line_id))]
    async fn attach(&self, link: &LineStationLink) -> Result<LineStationId, ApplicationError> {
        sqlx::query(
            r"
            INSERT INTO line_stations (
                id, line_id, station_id, sequence_position, distance_from_previous,
                estimated_minutes_from_previous, is_initial_station, is_final_station,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(link.id.to_string())
        .bind(link.line_id.to_string())
        .bind(link.station_id.to_string())
        .bind(i64::from(link.sequence_position))
        .bind(link.distance_from_previous)
        .bind(i64::from(link.estimated_minutes_from_previous))
        .bind(link.is_initial_station)
        .bind(link.is_final_station)
        .bind(format_datetime(&link.created_at))
        .bind(format_datetime(&link.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::duplicate_link(link.line_id, link.station_id).into()
            } else {
                map_sqlx_error(e)
            }
        })?;

        debug!("Line station attached");
        Ok(link.id)
    }

    #[instrument(skip(self), fields(link_id = %id))]
    async fn detach(&self, id: &LineStationId) -> Result<LineId, ApplicationError> {
        let line_id: Option<String> =
            sqlx::query_scalar("DELETE FROM line_stations WHERE id = $1 RETURNING line_id")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        let line_id = line_id
            .ok_or_else(|| DomainError::not_found("Line station", id.to_string()))?;

        debug!("Line station detached");
        parse_line_id(&line_id)
    }

    #[instrument(skip(self), fields(link_id = %id))]
    async fn update_position(
        &self,
        id: &LineStationId,
        position: SequencePosition,
        distance_from_previous: Option<f64>,
    ) -> Result<LineId, ApplicationError> {
        let line_id = self.owning_line(id).await?;

        let result = sqlx::query(
            r"
            UPDATE line_stations SET
                sequence_position = $1,
                distance_from_previous = COALESCE($2, distance_from_previous),
                updated_at = $3
            WHERE id = $4
            ",
        )
        .bind(i64::from(position))
        .bind(distance_from_previous)
        .bind(format_datetime(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Line station", id.to_string()).into());
        }

        debug!(%position, "Line station repositioned");
        Ok(line_id)
    }
}

fn parse_line_id(s: &str) -> Result<LineId, ApplicationError> {
    LineId::parse(s).map_err(|e| ApplicationError::Internal(format!("Invalid line ID: {e}")))
}

/// Row type for line station queries
#[derive(sqlx::FromRow)]
struct LinkRow {
    id: String,
    line_id: String,
    station_id: String,
    sequence_position: i64,
    distance_from_previous: Option<f64>,
    estimated_minutes_from_previous: i64,
    is_initial_station: bool,
    is_final_station: bool,
    created_at: String,
    updated_at: String,
}

impl LinkRow {
    fn into_link(self) -> Result<LineStationLink, ApplicationError> {
        let id = LineStationId::parse(&self.id)
            .map_err(|e| ApplicationError::Internal(format!("Invalid line station ID: {e}")))?;
        let station_id = StationId::parse(&self.station_id)
            .map_err(|e| ApplicationError::Internal(format!("Invalid station ID: {e}")))?;

        Ok(LineStationLink {
            id,
            line_id: parse_line_id(&self.line_id)?,
            station_id,
            sequence_position: SequencePosition::from_i64(self.sequence_position)?,
            // Missing increments count as zero
            distance_from_previous: self.distance_from_previous.unwrap_or(0.0),
            estimated_minutes_from_previous: count_from_i64(
                "estimated_minutes_from_previous",
                self.estimated_minutes_from_previous,
            )?,
            is_initial_station: self.is_initial_station,
            is_final_station: self.is_final_station,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}
