//! Stress Prediction Dashboard - Main Entry Point
//!
//! Loads the classifier once at startup and serves the dashboard. A missing
//! or unreadable model artifact does not abort startup; the dashboard serves
//! an explicit error state until the process is restarted.

use anyhow::Result;
use std::sync::Arc;
use stress_dashboard::{
    config::AppConfig,
    metrics::{DashboardMetrics, MetricsReporter},
    models::ModelState,
    server::{self, AppState},
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stress_dashboard=info".parse()?),
        )
        .init();

    info!("Starting stress prediction dashboard");

    let config = AppConfig::load()?;
    info!(
        addr = %config.server.addr(),
        model = %config.model.path,
        "Configuration loaded"
    );

    // The model handle is initialized exactly once for the process lifetime.
    let model = ModelState::load(&config.model);
    match &model {
        ModelState::Ready(_) => info!("Classifier ready"),
        ModelState::Unavailable(reason) => {
            warn!(reason = %reason, "Predictions are blocked until restart")
        }
    }

    let metrics = Arc::new(DashboardMetrics::new());

    // Periodic metrics summary (every 5 minutes)
    let reporter_metrics = metrics.clone();
    tokio::spawn(async move {
        MetricsReporter::new(reporter_metrics, 300).start().await;
    });

    let state = Arc::new(AppState::new(model, metrics));
    server::start(state, config.server).await
}
