//! ONNX model loader

use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

use crate::config::ModelConfig;

/// Loaded ONNX classifier with resolved output names
pub struct LoadedModel {
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature row
    pub input_name: String,
    /// Output name for the predicted class label
    pub label_output: String,
    /// Output name for the class probabilities
    pub probability_output: String,
}

/// Loader for the stress classifier artifact
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Result<Self> {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load the classifier from file.
    ///
    /// sklearn-family exports carry two outputs: an integer label tensor and
    /// a probability output (tensor or seq(map) depending on the exporter).
    /// Both names are resolved here so inference never guesses.
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<LoadedModel> {
        let path = path.as_ref();

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "output_label".to_string());

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "output_probability".to_string())
            });

        info!(
            input = %input_name,
            label = %label_output,
            probability = %probability_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            session,
            input_name,
            label_output,
            probability_output,
        })
    }

    /// Load the classifier described by the model configuration
    pub fn load_from_config(config: &ModelConfig) -> Result<LoadedModel> {
        let loader = Self::with_threads(config.onnx_threads)?;
        loader.load_model(&config.path)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}
