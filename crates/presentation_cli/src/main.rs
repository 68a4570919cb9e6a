//! Busline CLI
//!
//! Command-line interface for database administration and health checks.

#![allow(clippy::print_stdout)]

mod admin;
mod probe;

use clap::{Parser, Subcommand};
use domain::LineId;
use infrastructure::AppConfig;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{admin::ReconcileOutcome, probe::Readiness};

/// Busline CLI
#[derive(Parser)]
#[command(name = "busline-cli")]
#[command(author, version, about = "Busline line topology administration", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file, without extension
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Database file, overriding the configuration
    #[arg(short, long, env = "BUSLINE_DATABASE__PATH")]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Recompute stored line aggregates from the current station links
    ///
    /// Repairs lines left stale by a failed recompute. Safe to run at any time.
    /// Example: busline-cli reconcile --line 0190f6a4-...
    Reconcile {
        /// Only this line (default: every line)
        #[arg(short, long)]
        line: Option<String>,
    },

    /// Check server readiness (used by Docker healthcheck)
    Health {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(
            cli.verbose,
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = AppConfig::load_from(&cli.config).unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    if let Some(path) = cli.database {
        config.database.path = path;
    }

    match cli.command {
        Commands::Migrate => {
            let db = admin::open(&config.database).await?;
            admin::migrate(&db).await?;
            db.close().await;
            println!("✅ Migrations applied to {}", config.database.path);
        },

        Commands::Reconcile { line } => {
            let line = line
                .as_deref()
                .map(LineId::parse)
                .transpose()
                .map_err(|e| anyhow::anyhow!("Invalid line ID: {e}"))?;

            let db = admin::open(&config.database).await?;
            let outcome = admin::reconcile(&db, line).await;
            db.close().await;
            let outcome = outcome?;

            match &outcome {
                ReconcileOutcome::Line {
                    line_id,
                    aggregates,
                } => {
                    println!("✅ Line {line_id} reconciled");
                    println!("{}", serde_json::to_string_pretty(aggregates)?);
                },
                ReconcileOutcome::All(report) => {
                    println!("✅ {} line(s) reconciled", report.recomputed);
                    for line_id in &report.failed {
                        println!("❌ Line {line_id} could not be reconciled");
                    }
                },
            }
            if outcome.has_failures() {
                std::process::exit(1);
            }
        },

        Commands::Health { url } => {
            match probe::check_ready(&reqwest::Client::new(), &url).await {
                Readiness::Ready => println!("✅ Healthy"),
                Readiness::NotReady(status) => {
                    println!("❌ Unhealthy: HTTP {status}");
                    std::process::exit(1);
                },
                Readiness::Unreachable(e) => {
                    println!("❌ Unhealthy: {e}");
                    std::process::exit(1);
                },
            }
        },
    }

    Ok(())
}
