//! bsnd-se library - Sound selection engine service
//!
//! Picks the intro, background, midtro, outro and ad-bracket sounds for a
//! briefing from the assets stored in `bsnd.db`.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod selection;

pub use config::RuntimeSettings;
pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Settings loaded at startup
    pub settings: RuntimeSettings,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, settings: RuntimeSettings) -> Self {
        Self { db, settings }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/internal/select-sounds", post(api::select_sounds))
        .route("/api/audit/fallbacks", get(api::get_fallback_audit))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
