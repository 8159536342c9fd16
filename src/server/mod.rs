//! HTTP server for the stress prediction dashboard

mod handlers;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use handlers::AppState;
pub use routes::api_routes;

/// Start the HTTP dashboard server
pub async fn start(state: Arc<AppState>, config: ServerConfig) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Dashboard listening on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /             - Dashboard page");
    tracing::info!("  GET  /health       - Health check");
    tracing::info!("  GET  /api/features - Feature definitions");
    tracing::info!("  POST /api/predict  - Run a prediction");
    tracing::info!("  GET  /api/stats    - Metrics snapshot");

    axum::serve(listener, app).await?;

    Ok(())
}
