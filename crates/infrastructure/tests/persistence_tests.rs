//! Integration tests for the topology engine over in-memory SQLite
//!
//! These tests drive the real application services through the sqlx stores.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use application::{
    ApplicationError, AssignStation, DistanceService, LineCatalogService, NewLine, NewStation,
    TopologyService,
    ports::{LinePort, LineStationPort},
};
use domain::{DomainError, Line, LineAggregates, Station, StationId};
use infrastructure::persistence::{
    AsyncDatabase, SqliteLineStationStore, SqliteLineStore, SqliteStationStore,
};

// ============================================================================
// Test Helpers
// ============================================================================

async fn create_test_db() -> AsyncDatabase {
    let db = AsyncDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Failed to run migrations");
    db
}

struct Engine {
    _db: AsyncDatabase,
    lines: Arc<SqliteLineStore>,
    links: Arc<SqliteLineStationStore>,
    catalog: LineCatalogService,
    topology: TopologyService,
    distances: DistanceService,
}

async fn create_engine() -> Engine {
    let db = create_test_db().await;
    let lines = Arc::new(SqliteLineStore::new(db.pool().clone()));
    let stations = Arc::new(SqliteStationStore::new(db.pool().clone()));
    let links = Arc::new(SqliteLineStationStore::new(db.pool().clone()));

    Engine {
        catalog: LineCatalogService::new(lines.clone(), stations.clone()),
        topology: TopologyService::new(lines.clone(), stations.clone(), links.clone()),
        distances: DistanceService::new(lines.clone(), stations, links.clone()),
        lines,
        links,
        _db: db,
    }
}

async fn create_line(engine: &Engine, code: &str) -> Line {
    engine
        .catalog
        .create_line(NewLine {
            name: format!("Line {code}"),
            code: code.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create line")
}

async fn create_station(engine: &Engine, code: &str) -> Station {
    engine
        .catalog
        .create_station(NewStation {
            name: format!("Station {code}"),
            code: code.to_string(),
            address: None,
        })
        .await
        .expect("Failed to create station")
}

async fn stored_aggregates(engine: &Engine, line: &Line) -> LineAggregates {
    engine
        .lines
        .get(&line.id)
        .await
        .expect("Failed to get line")
        .expect("Line missing")
        .aggregates
}

/// Line L1 with A(pos 1, 0 km), B(pos 2, 5 km), C(pos 3, 3.5 km)
async fn sample_line(engine: &Engine) -> (Line, [StationId; 3]) {
    let line = create_line(engine, "L1").await;
    let mut ids = Vec::new();
    for (code, position, km) in [("A", 1, 0.0), ("B", 2, 5.0), ("C", 3, 3.5)] {
        let station = create_station(engine, code).await;
        engine
            .topology
            .assign_station_to_line(
                line.id,
                AssignStation::new(station.id, position).with_distance(km),
            )
            .await
            .expect("Failed to assign station");
        ids.push(station.id);
    }
    (line, [ids[0], ids[1], ids[2]])
}

// ============================================================================
// Aggregate maintenance
// ============================================================================

mod aggregate_tests {
    use super::*;

    #[tokio::test]
    async fn test_assign_updates_aggregates() {
        let engine = create_engine().await;
        let (line, _) = sample_line(&engine).await;

        let aggregates = stored_aggregates(&engine, &line).await;
        assert_eq!(aggregates.station_count, 3);
        assert!((aggregates.total_distance - 8.5).abs() < 1e-9);
        assert_eq!(aggregates.min_fleet_required, 3);
        assert_eq!(aggregates.max_fleet_allowed, 6);
    }

    #[tokio::test]
    async fn test_detach_keeps_following_distance() {
        let engine = create_engine().await;
        let (line, [_, b, _]) = sample_line(&engine).await;

        let link = engine
            .links
            .find(&line.id, &b)
            .await
            .expect("Failed to query")
            .expect("Link missing");
        let owner = engine
            .topology
            .remove_station_from_line(link.id)
            .await
            .expect("Failed to remove");
        assert_eq!(owner, line.id);

        let aggregates = stored_aggregates(&engine, &line).await;
        assert_eq!(aggregates.station_count, 2);
        assert!((aggregates.total_distance - 3.5).abs() < 1e-9);
        assert_eq!(aggregates.max_fleet_allowed, 4);
    }

    #[tokio::test]
    async fn test_reorder_recomputes() {
        let engine = create_engine().await;
        let (line, [_, _, c]) = sample_line(&engine).await;
        let link = engine.links.find(&line.id, &c).await.unwrap().unwrap();

        engine
            .topology
            .reorder_station(link.id, Some(3), Some(10.0))
            .await
            .expect("Failed to reorder");

        let aggregates = stored_aggregates(&engine, &line).await;
        assert!((aggregates.total_distance - 15.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_duplicate_assign_has_no_side_effects() {
        let engine = create_engine().await;
        let (line, [a, _, _]) = sample_line(&engine).await;

        let result = engine
            .topology
            .assign_station_to_line(line.id, AssignStation::new(a, 9).with_distance(1.0))
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::DuplicateLink { .. }))
        ));
        assert_eq!(stored_aggregates(&engine, &line).await.station_count, 3);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let engine = create_engine().await;
        let (line, _) = sample_line(&engine).await;

        let first = engine.topology.recompute(line.id).await.unwrap();
        let second = engine.topology.recompute(line.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, stored_aggregates(&engine, &line).await);
    }

    #[tokio::test]
    async fn test_reconcile_repairs_stale_aggregates() {
        let engine = create_engine().await;
        let (line, _) = sample_line(&engine).await;
        engine
            .lines
            .update_aggregates(&line.id, &LineAggregates::default())
            .await
            .unwrap();

        let report = engine.topology.reconcile_all().await.unwrap();

        assert_eq!(report.recomputed, 1);
        assert!(report.failed.is_empty());
        assert_eq!(stored_aggregates(&engine, &line).await.station_count, 3);
    }

    #[tokio::test]
    async fn test_concurrent_assigns_leave_consistent_aggregates() {
        let engine = Arc::new(create_engine().await);
        let line = create_line(&engine, "L9").await;
        let line_id = line.id;

        let mut handles = Vec::new();
        for i in 0..8u32 {
            let station = create_station(&engine, &format!("S{i}")).await;
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                engine
                    .topology
                    .assign_station_to_line(
                        line_id,
                        AssignStation::new(station.id, i + 1).with_distance(1.5),
                    )
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().expect("Failed to assign station");
        }

        let aggregates = stored_aggregates(&engine, &line).await;
        assert_eq!(aggregates.station_count, 8);
        assert!((aggregates.total_distance - 12.0).abs() < 1e-9);
    }
}

// ============================================================================
// Distance queries
// ============================================================================

mod distance_tests {
    use super::*;

    #[tokio::test]
    async fn test_cumulative_distances() {
        let engine = create_engine().await;
        let (line, _) = sample_line(&engine).await;

        let stops = engine.distances.cumulative_distances(line.id).await.unwrap();

        let totals: Vec<f64> = stops
            .iter()
            .map(|s| s.distance.distance_from_origin)
            .collect();
        assert_eq!(totals, vec![0.0, 5.0, 8.5]);
        assert_eq!(stops[2].station_code.as_deref(), Some("C"));
    }

    #[tokio::test]
    async fn test_between_and_matrix_agree() {
        let engine = create_engine().await;
        let (line, [a, b, c]) = sample_line(&engine).await;

        let matrix = engine.distances.matrix(line.id).await.unwrap();
        assert_eq!(matrix.len(), 3);

        for entry in &matrix {
            let point = engine
                .distances
                .between(line.id, entry.origin.station_id, entry.destination.station_id)
                .await
                .unwrap();
            assert!((point.distance_km - entry.distance_km).abs() < f64::EPSILON);
            assert_eq!(
                point.intermediate_station_count,
                entry.intermediate_station_count
            );
        }

        let ids: Vec<(StationId, StationId)> = matrix
            .iter()
            .map(|e| (e.origin.station_id, e.destination.station_id))
            .collect();
        assert_eq!(ids, vec![(a, b), (a, c), (b, c)]);
    }

    #[tokio::test]
    async fn test_distances_after_detach() {
        let engine = create_engine().await;
        let (line, [a, b, c]) = sample_line(&engine).await;
        let link = engine.links.find(&line.id, &b).await.unwrap().unwrap();
        engine
            .topology
            .remove_station_from_line(link.id)
            .await
            .unwrap();

        let pair = engine.distances.between(line.id, a, c).await.unwrap();

        assert!((pair.distance_km - 3.5).abs() < f64::EPSILON);
        assert_eq!(pair.intermediate_station_count, 1);
    }

    #[tokio::test]
    async fn test_list_line_stops_is_ordered() {
        let engine = create_engine().await;
        let (line, [a, _, c]) = sample_line(&engine).await;

        let stops = engine.topology.list_line_stops(line.id).await.unwrap();

        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].link.station_id, a);
        assert_eq!(stops[2].link.station_id, c);
        assert_eq!(stops[0].station_name.as_deref(), Some("Station A"));
    }
}
