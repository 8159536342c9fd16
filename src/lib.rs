//! Student Stress Prediction Dashboard
//!
//! Serves a slider-driven dashboard over a pre-trained 3-class stress
//! classifier (ONNX), and provisions the source dataset into S3-compatible
//! object storage.

pub mod config;
pub mod features;
pub mod metrics;
pub mod models;
pub mod server;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use features::{FeatureDef, InputVector, FEATURES, FEATURE_COUNT};
pub use metrics::DashboardMetrics;
pub use models::{ModelState, StressClassifier};
pub use types::{Prediction, PredictionReport, StressLevel};
