//! Harvest Insights Platform - Backend Server

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use harvest_insights_backend::{
    clock::SystemClock,
    config::Config,
    create_app,
    stores::{InMemoryRecordStore, JsonFileAuditLog, PgRecordStore, RecordStore},
    AppState, HarvestPipeline,
};
use shared::InsightEngine;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = Config::load()?;
    let offset = config.utc_offset()?;

    tracing::info!("Starting Harvest Insights Server");
    tracing::info!("Environment: {}", config.environment);

    let records: Arc<dyn RecordStore> = match &config.database.url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(config.database.acquire_timeout())
                .connect(url)
                .await
                .context("failed to connect to the database")?;
            tracing::info!("Database connection established");

            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations").run(&db_pool).await?;
                tracing::info!("Migrations completed");
            }

            Arc::new(PgRecordStore::new(db_pool, offset))
        }
        None => {
            tracing::warn!("No database configured; harvest records are kept in memory only");
            Arc::new(InMemoryRecordStore::new())
        }
    };

    let audit_log = Arc::new(JsonFileAuditLog::new(config.storage.audit_log_path.clone()));
    tracing::info!(path = %audit_log.path().display(), "Audit log enabled");

    let pipeline = HarvestPipeline::new(
        InsightEngine::new(config.insights.clone()),
        audit_log,
        records,
        Arc::new(SystemClock::new(offset)),
        config.storage.operation_timeout(),
    );

    // Create application state
    let state = AppState {
        pipeline,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid server.host {:?}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing; `HARVEST_LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "harvest_server=debug,harvest_insights_backend=debug,tower_http=debug,sqlx=warn".into()
    });

    let json = std::env::var("HARVEST_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
