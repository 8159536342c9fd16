//! Stress classifier inference over a loaded ONNX session

use crate::config::ModelConfig;
use crate::features::FEATURE_COUNT;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::{Prediction, CLASS_COUNT};
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::sync::RwLock;
use tracing::{debug, warn};

/// The process-wide model handle.
///
/// Initialized exactly once at startup and shared read-only afterwards.
/// There is no reload path: if the artifact changes on disk, the loaded
/// session is stale until the process restarts.
pub enum ModelState {
    /// Classifier loaded and usable
    Ready(StressClassifier),
    /// Artifact missing or unreadable; the reason blocks every prediction
    Unavailable(String),
}

impl ModelState {
    /// Load the classifier, converting any failure into the unavailable
    /// sentinel instead of propagating it. Callers must check before use.
    pub fn load(config: &ModelConfig) -> Self {
        match ModelLoader::load_from_config(config) {
            Ok(model) => ModelState::Ready(StressClassifier::new(model)),
            Err(e) => {
                warn!(path = %config.path, error = %e, "Model unavailable");
                ModelState::Unavailable(format!(
                    "model artifact could not be loaded from '{}': {e:#}",
                    config.path
                ))
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready(_))
    }
}

/// 3-class stress classifier backed by ONNX Runtime.
///
/// The session needs exclusive access to run, so the loaded model sits
/// behind an RwLock held for the duration of one inference.
pub struct StressClassifier {
    model: RwLock<LoadedModel>,
}

impl StressClassifier {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            model: RwLock::new(model),
        }
    }

    /// Predicted class id for a canonical feature row.
    pub fn predict(&self, features: &[f32]) -> Result<i64> {
        Ok(self.evaluate(features)?.class)
    }

    /// Class probability distribution for a canonical feature row.
    pub fn predict_proba(&self, features: &[f32]) -> Result<[f64; CLASS_COUNT]> {
        Ok(self.evaluate(features)?.probabilities)
    }

    /// Run the session once and extract class and probabilities together,
    /// so the two can never disagree.
    pub fn evaluate(&self, features: &[f32]) -> Result<Prediction> {
        use ort::value::Tensor;

        if features.len() != FEATURE_COUNT {
            anyhow::bail!(
                "expected a row of {} features, got {}",
                FEATURE_COUNT,
                features.len()
            );
        }

        let mut model = self
            .model
            .write()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        // Input tensor shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let input_name = model.input_name.clone();
        let label_output = model.label_output.clone();
        let probability_output = model.probability_output.clone();

        let outputs = model.session.run(ort::inputs![&input_name => input_tensor])?;

        let class = extract_class(&outputs, &label_output)?;
        let probabilities = extract_probabilities(&outputs, &probability_output)?;

        debug!(class = class, probabilities = ?probabilities, "Inference complete");

        Ok(Prediction {
            class,
            probabilities,
        })
    }
}

/// Extract the predicted class id from the label output.
fn extract_class(outputs: &ort::session::SessionOutputs, label_output: &str) -> Result<i64> {
    let output = outputs
        .get(label_output)
        .with_context(|| format!("model has no output named '{label_output}'"))?;

    let (_, data) = output
        .try_extract_tensor::<i64>()
        .context("label output is not an int64 tensor")?;

    data.first()
        .copied()
        .context("label output tensor is empty")
}

/// Extract the class probability distribution from the probability output.
///
/// Handles both tensor outputs and seq(map) outputs, the two shapes
/// sklearn-family ONNX exporters produce.
fn extract_probabilities(
    outputs: &ort::session::SessionOutputs,
    probability_output: &str,
) -> Result<[f64; CLASS_COUNT]> {
    let output = outputs
        .get(probability_output)
        .with_context(|| format!("model has no output named '{probability_output}'"))?;

    // Tensor format first: [1, num_classes] or [num_classes]
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        return probabilities_from_tensor(&dims, data);
    }

    // seq(map(int64, float)) format
    let dtype = output.dtype();
    if DynSequenceValueType::can_downcast(&dtype) {
        let pairs = extract_sequence_map_pairs(output)?;
        return probabilities_from_pairs(&pairs);
    }

    anyhow::bail!("probability output '{probability_output}' has an unsupported value type")
}

/// Pull the (class id, probability) pairs out of a seq(map) output.
fn extract_sequence_map_pairs(output: &ort::value::DynValue) -> Result<Vec<(i64, f32)>> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
    if maps.is_empty() {
        anyhow::bail!("empty probability sequence");
    }

    // Batch size is always 1, so only the first map matters
    let pairs = maps[0].try_extract_key_values::<i64, f32>()?;
    Ok(pairs)
}

/// Build the class-indexed probability triple from tensor data.
fn probabilities_from_tensor(dims: &[i64], data: &[f32]) -> Result<[f64; CLASS_COUNT]> {
    let class_count = match dims {
        [1, n] => *n as usize,
        [n] => *n as usize,
        _ => anyhow::bail!("unexpected probability tensor shape {dims:?}"),
    };

    if class_count != CLASS_COUNT || data.len() < CLASS_COUNT {
        anyhow::bail!(
            "expected {} class probabilities, got {}",
            CLASS_COUNT,
            class_count
        );
    }

    let mut probabilities = [0.0; CLASS_COUNT];
    for (slot, &p) in probabilities.iter_mut().zip(data.iter()) {
        *slot = f64::from(p);
    }
    Ok(probabilities)
}

/// Build the class-indexed probability triple from seq(map) pairs.
fn probabilities_from_pairs(pairs: &[(i64, f32)]) -> Result<[f64; CLASS_COUNT]> {
    let mut probabilities = [0.0; CLASS_COUNT];
    let mut seen = [false; CLASS_COUNT];

    for &(class_id, p) in pairs {
        match usize::try_from(class_id) {
            Ok(idx) if idx < CLASS_COUNT => {
                probabilities[idx] = f64::from(p);
                seen[idx] = true;
            }
            _ => anyhow::bail!("probability map contains unexpected class id {class_id}"),
        }
    }

    if seen.iter().any(|s| !s) {
        anyhow::bail!("probability map is missing one or more classes");
    }
    Ok(probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // End-to-end inference needs the ONNX artifact on disk; these tests
    // cover the pure extraction paths.

    #[test]
    fn test_probabilities_from_batched_tensor() {
        let probs = probabilities_from_tensor(&[1, 3], &[0.1, 0.3, 0.6]).unwrap();
        assert_relative_eq!(probs[0], 0.1, epsilon = 1e-6);
        assert_relative_eq!(probs[2], 0.6, epsilon = 1e-6);
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_probabilities_from_flat_tensor() {
        let probs = probabilities_from_tensor(&[3], &[0.25, 0.5, 0.25]).unwrap();
        assert_relative_eq!(probs[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_probabilities_from_tensor_rejects_wrong_arity() {
        assert!(probabilities_from_tensor(&[1, 2], &[0.4, 0.6]).is_err());
        assert!(probabilities_from_tensor(&[2, 3], &[0.1; 6]).is_err());
    }

    #[test]
    fn test_probabilities_from_pairs() {
        // Map order is not guaranteed by the exporter
        let pairs = vec![(2_i64, 0.7_f32), (0, 0.1), (1, 0.2)];
        let probs = probabilities_from_pairs(&pairs).unwrap();
        assert_relative_eq!(probs[0], 0.1, epsilon = 1e-6);
        assert_relative_eq!(probs[1], 0.2, epsilon = 1e-6);
        assert_relative_eq!(probs[2], 0.7, epsilon = 1e-6);
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_probabilities_from_pairs_rejects_bad_maps() {
        assert!(probabilities_from_pairs(&[(0, 0.5), (1, 0.5)]).is_err());
        assert!(probabilities_from_pairs(&[(0, 0.2), (1, 0.3), (5, 0.5)]).is_err());
    }
}
