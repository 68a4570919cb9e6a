//! Route definitions

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{handlers, middleware::propagate_request_id, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Catalog
        .route(
            "/lines",
            get(handlers::lines::list_lines).post(handlers::lines::create_line),
        )
        .route("/lines/reconcile", post(handlers::lines::reconcile_lines))
        .route("/lines/{id}", get(handlers::lines::get_line))
        .route(
            "/stations",
            get(handlers::stations::list_stations).post(handlers::stations::create_station),
        )
        .route("/stations/{id}", get(handlers::stations::get_station))
        // Station sequence of a line
        .route(
            "/lines/{id}/stations",
            get(handlers::lines::list_line_stations).post(handlers::lines::assign_station),
        )
        .route(
            "/line-stations/{id}",
            put(handlers::line_stations::reorder_station)
                .delete(handlers::line_stations::remove_station),
        )
        // Distances
        .route("/lines/{id}/distance", get(handlers::distances::line_distance))
        .route(
            "/lines/{id}/distance/recompute",
            post(handlers::lines::recompute_line),
        )
        .route(
            "/lines/{id}/distances",
            get(handlers::distances::cumulative_distances),
        )
        .route(
            "/lines/{id}/distances/matrix",
            get(handlers::distances::distance_matrix),
        )
        .route(
            "/lines/{id}/distances/between/{station_a}/{station_b}",
            get(handlers::distances::distance_between),
        )
        .layer(middleware::from_fn(propagate_request_id))
        // Attach state
        .with_state(state)
}
