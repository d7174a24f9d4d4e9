//! Route definitions for the Harvest Insights Platform

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Harvest submission and history
        .nest("/harvests", harvest_routes())
}

/// Harvest routes
fn harvest_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_harvests).post(handlers::submit_harvest),
    )
}
