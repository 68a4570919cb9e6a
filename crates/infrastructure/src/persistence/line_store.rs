//! SQLite line store using sqlx

use application::{error::ApplicationError, ports::LinePort};
use async_trait::async_trait;
use chrono::Utc;
use domain::{Line, LineAggregates, LineId, LineStatus};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::{count_from_i64, format_datetime, map_sqlx_error, parse_datetime};

/// Line persistence backed by the `lines` table
#[derive(Debug, Clone)]
pub struct SqliteLineStore {
    pool: SqlitePool,
}

impl SqliteLineStore {
    /// Create a new line store
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinePort for SqliteLineStore {
    #[instrument(skip(self, line), fields(line_id = %line.id))]
    async fn save(&self, line: &Line) -> Result<(), ApplicationError> {
        sqlx::query(
            r"
            INSERT INTO lines (
                id, name, code, color, status,
                station_count, total_distance, min_fleet_required, max_fleet_allowed,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(line.id.to_string())
        .bind(&line.name)
        .bind(&line.code)
        .bind(&line.color)
        .bind(line.status.as_str())
        .bind(i64::from(line.aggregates.station_count))
        .bind(line.aggregates.total_distance)
        .bind(i64::from(line.aggregates.min_fleet_required))
        .bind(i64::from(line.aggregates.max_fleet_allowed))
        .bind(format_datetime(&line.created_at))
        .bind(format_datetime(&line.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Line saved");
        Ok(())
    }

    #[instrument(skip(self), fields(line_id = %id))]
    async fn get(&self, id: &LineId) -> Result<Option<Line>, ApplicationError> {
        let row: Option<LineRow> = sqlx::query_as(
            r"
            SELECT id, name, code, color, status,
                   station_count, total_distance, min_fleet_required, max_fleet_allowed,
                   created_at, updated_at
            FROM lines WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(LineRow::into_line).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Line>, ApplicationError> {
        let rows: Vec<LineRow> = sqlx::query_as(
            r"
            SELECT id, name, code, color, status,
                   station_count, total_distance, min_fleet_required, max_fleet_allowed,
                   created_at, updated_at
            FROM lines ORDER BY code ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(LineRow::into_line).collect()
    }

    #[instrument(skip(self, aggregates), fields(line_id = %id))]
    async fn update_aggregates(
        &self,
        id: &LineId,
        aggregates: &LineAggregates,
    ) -> Result<(), ApplicationError> {
        let result = sqlx::query(
            r"
            UPDATE lines SET
                station_count = $1,
                total_distance = $2,
                min_fleet_required = $3,
                max_fleet_allowed = $4,
                updated_at = $5
            WHERE id = $6
            ",
        )
        .bind(i64::from(aggregates.station_count))
        .bind(aggregates.total_distance)
        .bind(i64::from(aggregates.min_fleet_required))
        .bind(i64::from(aggregates.max_fleet_allowed))
        .bind(format_datetime(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(ApplicationError::NotFound(format!("Line {id} not found")));
        }

        debug!(
            station_count = aggregates.station_count,
            total_distance = aggregates.total_distance,
            "Line aggregates stored"
        );
        Ok(())
    }
}

/// Row type for line queries
#[derive(sqlx::FromRow)]
struct LineRow {
    id: String,
    name: String,
    code: String,
    color: Option<String>,
    status: String,
    station_count: i64,
    total_distance: f64,
    min_fleet_required: i64,
    max_fleet_allowed: i64,
    created_at: String,
    updated_at: String,
}

impl LineRow {
    fn into_line(self) -> Result<Line, ApplicationError> {
        let id = LineId::parse(&self.id)
            .map_err(|e| ApplicationError::Internal(format!("Invalid line ID: {e}")))?;
        let status: LineStatus = self.status.parse()?;

        Ok(Line {
            id,
            name: self.name,
            code: self.code,
            color: self.color,
            status,
            aggregates: LineAggregates {
                station_count: count_from_i64("station_count", self.station_count)?,
                total_distance: self.total_distance,
                min_fleet_required: count_from_i64("min_fleet_required", self.min_fleet_required)?,
                max_fleet_allowed: count_from_i64("max_fleet_allowed", self.max_fleet_allowed)?,
            },
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::AsyncDatabase;

    async fn setup() -> (AsyncDatabase, SqliteLineStore) {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let store = SqliteLineStore::new(db.pool().clone());
        (db, store)
    }

    #[tokio::test]
    async fn save_and_get_line() {
        let (_db, store) = setup().await;
        let line = Line::new("Centro - Norte", "L1")
            .unwrap()
            .with_color("#00AA55")
            .with_status(LineStatus::Maintenance);

        store.save(&line).await.unwrap();
        let loaded = store.get(&line.id).await.unwrap().unwrap();

        assert_eq!(loaded.code, "L1");
        assert_eq!(loaded.color.as_deref(), Some("#00AA55"));
        assert_eq!(loaded.status, LineStatus::Maintenance);
        assert_eq!(loaded.created_at, line.created_at);
    }

    #[tokio::test]
    async fn duplicate_code_is_rejected() {
        let (_db, store) = setup().await;
        store.save(&Line::new("A", "L1").unwrap()).await.unwrap();

        let result = store.save(&Line::new("B", "L1").unwrap()).await;

        assert!(matches!(result, Err(ApplicationError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn update_aggregates_overwrites_all_four() {
        let (_db, store) = setup().await;
        let line = Line::new("Circular", "L7").unwrap();
        store.save(&line).await.unwrap();

        let aggregates = LineAggregates {
            station_count: 3,
            total_distance: 8.5,
            min_fleet_required: 3,
            max_fleet_allowed: 6,
        };
        store.update_aggregates(&line.id, &aggregates).await.unwrap();

        let loaded = store.get(&line.id).await.unwrap().unwrap();
        assert_eq!(loaded.aggregates, aggregates);
    }

    #[tokio::test]
    async fn update_aggregates_of_missing_line_is_not_found() {
        let (_db, store) = setup().await;
        let result = store
            .update_aggregates(&LineId::new(), &LineAggregates::default())
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_is_ordered_by_code() {
        let (_db, store) = setup().await;
        store.save(&Line::new("Sur", "L3").unwrap()).await.unwrap();
        store.save(&Line::new("Norte", "L1").unwrap()).await.unwrap();

        let codes: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(codes, vec!["L1", "L3"]);
    }
}
