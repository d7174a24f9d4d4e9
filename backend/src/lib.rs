//! Harvest Insights Platform - Backend
//!
//! Evaluates sugarcane harvest events, derives efficiency metrics and
//! agronomic alerts, and records the enriched result in a JSON audit log and
//! a relational store.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod stores;

pub use config::Config;
pub use services::HarvestPipeline;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: HarvestPipeline,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Harvest Insights Platform API v1.0"
}
