//! Busline HTTP Server
//!
//! Main entry point for the line topology API.

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use infrastructure::{AppConfig, AsyncDatabase, AsyncDatabaseConfig, init_logging};
use presentation_http::{AppState, routes, set_expose_internal_errors};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

const DEFAULT_LOG_FILTER: &str = "busline_server=info,presentation_http=info,application=info,\
                                  infrastructure=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging is configured from the file, so config errors are reported after init
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(config.server.log_format, DEFAULT_LOG_FILTER)?;
    if let Some(e) = config_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Busline server starting"
    );

    set_expose_internal_errors(!config.is_production());

    let db = AsyncDatabase::new(&AsyncDatabaseConfig::from(&config.database)).await?;
    if config.database.run_migrations {
        db.migrate().await?;
    }

    info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.path,
        "Configuration loaded"
    );

    let cors_enabled = config.server.cors_enabled;
    let cors_layer = if config.server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    };
    let body_limit = RequestBodyLimitLayer::new(config.server.max_body_size_json_bytes);
    let addr = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let state = AppState::from_database(&db, config);
    let mut app = routes::create_router(state)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http());
    if cors_enabled {
        app = app.layer(cors_layer);
    }

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await;
    if let Err(e) = &served {
        error!(error = %e, "Server stopped with error");
    }

    db.close().await;
    info!("Server shutdown complete");

    served?;
    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    info!("Waiting up to {:?} for connections to close", timeout);
}
