pub mod aggregate;
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod outbox;
pub mod proc;
pub mod sales_store;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::handlers::AppServices;

/// Shared application state handed to every handler.
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Self {
        let services = AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

/// Liveness probe; reports relational store reachability.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ok", "database": "up" })),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "degraded", "database": "down" })),
        ),
    }
}

/// The versioned API surface.
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/warehouses", handlers::warehouses::routes())
        .nest("/suppliers", handlers::suppliers::routes())
        .nest("/component-types", handlers::component_types::routes())
        .nest("/components", handlers::components::routes())
        .nest("/equipment-types", handlers::equipment_types::routes())
        .nest("/labor-types", handlers::labor_types::routes())
        .nest("/equipment", handlers::equipment::routes())
        .nest("/shipping-guides", handlers::shipping_guides::routes())
        .nest("/outbox", handlers::outbox::routes())
}

/// Full application router over shared state. Middleware (tracing, CORS)
/// is layered on by the binary.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
}
