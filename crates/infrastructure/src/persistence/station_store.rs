//! SQLite station store using sqlx

use application::{error::ApplicationError, ports::StationPort};
use async_trait::async_trait;
use domain::{Station, StationId};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument};

use super::error::{format_datetime, map_sqlx_error, parse_datetime};

const SELECT_STATIONS: &str =
    "SELECT id, name, code, address, created_at, updated_at FROM stations";

/// Station persistence backed by the `stations` table
#[derive(Debug, Clone)]
pub struct SqliteStationStore {
    pool: SqlitePool,
}

impl SqliteStationStore {
    /// Create a new station store
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StationPort for SqliteStationStore {
    #[instrument(skip(self, station), fields(station_id = %station.id))]
    async fn save(&self, station: &Station) -> Result<(), ApplicationError> {
        sqlx::query(
            r"
            INSERT INTO stations (id, name, code, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(station.id.to_string())
        .bind(&station.name)
        .bind(&station.code)
        .bind(&station.address)
        .bind(format_datetime(&station.created_at))
        .bind(format_datetime(&station.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Station saved");
        Ok(())
    }

    #[instrument(skip(self), fields(station_id = %id))]
    async fn get(&self, id: &StationId) -> Result<Option<Station>, ApplicationError> {
        let row: Option<StationRow> = sqlx::query_as(&format!("{SELECT_STATIONS} WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(StationRow::into_station).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Station>, ApplicationError> {
        let rows: Vec<StationRow> = sqlx::query_as(&format!("{SELECT_STATIONS} ORDER BY code ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(StationRow::into_station).collect()
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_many(&self, ids: &[StationId]) -> Result<Vec<Station>, ApplicationError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("{SELECT_STATIONS} WHERE id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let rows: Vec<StationRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(StationRow::into_station).collect()
    }
}

/// Row type for station queries
#[derive(sqlx::FromRow)]
struct StationRow {
    id: String,
    name: String,
    code: String,
    address: Option<String>,
    created_at: String,
    updated_at: String,
}

impl StationRow {
    fn into_station(self) -> Result<Station, ApplicationError> {
        let id = StationId::parse(&self.id)
            .map_err(|e| ApplicationError::Internal(format!("Invalid station ID: {e}")))?;

        Ok(Station {
            id,
            name: self.name,
            code: self.code,
            address: self.address,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::AsyncDatabase;

    async fn setup() -> (AsyncDatabase, SqliteStationStore) {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let store = SqliteStationStore::new(db.pool().clone());
        (db, store)
    }

    #[tokio::test]
    async fn save_and_get_station() {
        let (_db, store) = setup().await;
        let station = Station::new("Plaza Mayor", "PM")
            .unwrap()
            .with_address("Av. Principal 100");

        store.save(&station).await.unwrap();
        let loaded = store.get(&station.id).await.unwrap().unwrap();

        assert_eq!(loaded.name, "Plaza Mayor");
        assert_eq!(loaded.address.as_deref(), Some("Av. Principal 100"));
    }

    #[tokio::test]
    async fn get_missing_station_returns_none() {
        let (_db, store) = setup().await;
        assert!(store.get(&StationId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_many_skips_unknown_ids() {
        let (_db, store) = setup().await;
        let a = Station::new("Alameda", "A").unwrap();
        let b = Station::new("Bellavista", "B").unwrap();
        store.save(&a).await.unwrap();
        store.save(&b).await.unwrap();

        let found = store
            .get_many(&[a.id, StationId::new(), b.id])
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert!(store.get_many(&[]).await.unwrap().is_empty());
    }
}
