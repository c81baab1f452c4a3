//! Recicla Operations Platform - Backend Library
//!
//! An operational ledger for a recycling/collection operation: per-material
//! inventory counters fed by receipts from collection staff and drained by
//! shipments to partner processing companies, with every movement validated
//! and applied atomically under per-material locking.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;

use ledger::locks::LockRegistry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub locks: LockRegistry,
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
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Recicla Operations Platform API v1.0"
}

/// Liveness endpoint
async fn health_check() -> &'static str {
    "OK"
}
