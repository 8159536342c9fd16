//! Route definitions

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, index, list_features, predict, stats, AppState};

/// Create the dashboard router
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/features", get(list_features))
        .route("/api/predict", post(predict))
        .route("/api/stats", get(stats))
}
