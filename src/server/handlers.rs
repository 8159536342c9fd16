//! HTTP request handlers

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::features::{InputVector, FEATURES};
use crate::metrics::DashboardMetrics;
use crate::models::ModelState;
use crate::types::PredictionReport;

/// Shared application state: the once-loaded model handle plus metrics.
/// Both are read-only after startup; concurrent requests share them freely.
pub struct AppState {
    pub model: ModelState,
    pub metrics: Arc<DashboardMetrics>,
}

impl AppState {
    pub fn new(model: ModelState, metrics: Arc<DashboardMetrics>) -> Self {
        Self { model, metrics }
    }
}

/// Serve the dashboard page
pub async fn index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        model_loaded: state.model.is_ready(),
    })
}

/// Enumerate all feature definitions in canonical order.
///
/// The page builds its sliders from this payload, so the UI can never
/// disagree with the table the model row is assembled from.
pub async fn list_features() -> impl IntoResponse {
    let features: Vec<FeatureEntry> = FEATURES
        .iter()
        .map(|def| FeatureEntry {
            name: def.name,
            label: def.label,
            max_val: def.max_val,
            default: def.default_value(),
        })
        .collect();

    Json(FeaturesResponse { features })
}

/// Run one prediction for a complete set of feature values
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Response {
    // Load-time fault: surfaced on every attempt until the process restarts.
    let classifier = match &state.model {
        ModelState::Ready(classifier) => classifier,
        ModelState::Unavailable(reason) => {
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "model_unavailable",
                reason,
            );
        }
    };

    let vector = match InputVector::from_map(&request.values) {
        Ok(vector) => vector,
        Err(e) => {
            state.metrics.record_rejected();
            warn!(error = %e, "Rejected prediction input");
            return error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_input",
                &e.to_string(),
            );
        }
    };

    let row = vector.to_row();
    let start = Instant::now();

    // Prediction-time faults are caught here and reported, distinct from
    // the load-time unavailable state; the session stays usable.
    match classifier.evaluate(&row) {
        Ok(prediction) => {
            let report = PredictionReport::new(&prediction);
            state.metrics.record_prediction(start.elapsed(), report.label);
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => {
            state.metrics.record_fault();
            error!(error = %e, "Inference failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "prediction_error",
                &format!("{e:#}"),
            )
        }
    }
}

/// Metrics snapshot endpoint
pub async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: ErrorDetail {
                message: message.to_string(),
                r#type: kind.to_string(),
            },
        }),
    )
        .into_response()
}

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Feature name -> value, one entry per defined feature
    pub values: HashMap<String, i64>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

#[derive(Serialize)]
pub struct FeaturesResponse {
    pub features: Vec<FeatureEntry>,
}

#[derive(Serialize)]
pub struct FeatureEntry {
    pub name: &'static str,
    pub label: &'static str,
    pub max_val: u8,
    pub default: u8,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
}
