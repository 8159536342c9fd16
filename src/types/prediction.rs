//! Stress level classification and prediction report types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of classes the stress model distinguishes.
pub const CLASS_COUNT: usize = 3;

/// Discrete stress level produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl StressLevel {
    /// All levels in class-id order (0, 1, 2).
    pub const ALL: [StressLevel; CLASS_COUNT] =
        [StressLevel::Low, StressLevel::Medium, StressLevel::High];

    /// Map a raw model class id to a level. A 3-class model should never
    /// produce anything else; `None` lets callers render "Unknown" instead
    /// of failing.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(StressLevel::Low),
            1 => Some(StressLevel::Medium),
            2 => Some(StressLevel::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StressLevel::Low => "Low",
            StressLevel::Medium => "Medium",
            StressLevel::High => "High",
        }
    }

    /// Display glyph shown next to the label.
    pub fn glyph(&self) -> &'static str {
        match self {
            StressLevel::Low => "✅",
            StressLevel::Medium => "⚠️",
            StressLevel::High => "🔴",
        }
    }
}

/// Label for a raw class id, including the out-of-range fallback.
pub fn class_label(class: i64) -> &'static str {
    StressLevel::from_class(class)
        .map(|level| level.label())
        .unwrap_or("Unknown")
}

/// Outcome of a single model invocation: predicted class plus the full
/// probability distribution, both taken from one session run.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Raw class id from the model's label output
    pub class: i64,
    /// Probability per class, indexed by class id
    pub probabilities: [f64; CLASS_COUNT],
}

impl Prediction {
    pub fn level(&self) -> Option<StressLevel> {
        StressLevel::from_class(self.class)
    }
}

/// Probability of one class, as rendered to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ClassProbability {
    pub label: &'static str,
    pub glyph: &'static str,
    pub probability: f64,
}

/// JSON report returned by the prediction endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    /// Unique report identifier
    pub prediction_id: String,
    /// Raw class id
    pub class: i64,
    /// Human-readable level label ("Unknown" for an out-of-range class)
    pub label: &'static str,
    /// Display glyph (empty for an out-of-range class)
    pub glyph: &'static str,
    /// Per-class probabilities in Low/Medium/High order
    pub probabilities: Vec<ClassProbability>,
    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl PredictionReport {
    pub fn new(prediction: &Prediction) -> Self {
        let probabilities = StressLevel::ALL
            .iter()
            .zip(prediction.probabilities.iter())
            .map(|(level, &probability)| ClassProbability {
                label: level.label(),
                glyph: level.glyph(),
                probability,
            })
            .collect();

        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            class: prediction.class,
            label: class_label(prediction.class),
            glyph: prediction
                .level()
                .map(|level| level.glyph())
                .unwrap_or(""),
            probabilities,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_label_mapping() {
        assert_eq!(class_label(0), "Low");
        assert_eq!(class_label(1), "Medium");
        assert_eq!(class_label(2), "High");
        assert_eq!(class_label(3), "Unknown");
        assert_eq!(class_label(-1), "Unknown");
    }

    #[test]
    fn test_level_glyphs() {
        assert_eq!(StressLevel::Low.glyph(), "✅");
        assert_eq!(StressLevel::Medium.glyph(), "⚠️");
        assert_eq!(StressLevel::High.glyph(), "🔴");
    }

    #[test]
    fn test_report_from_prediction() {
        let prediction = Prediction {
            class: 1,
            probabilities: [0.2, 0.7, 0.1],
        };

        let report = PredictionReport::new(&prediction);
        assert_eq!(report.label, "Medium");
        assert_eq!(report.glyph, "⚠️");
        assert_eq!(report.probabilities.len(), CLASS_COUNT);
        assert_eq!(report.probabilities[0].label, "Low");
        assert_eq!(report.probabilities[1].probability, 0.7);

        let total: f64 = report.probabilities.iter().map(|p| p.probability).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_report_for_unknown_class() {
        let prediction = Prediction {
            class: 7,
            probabilities: [0.3, 0.3, 0.4],
        };

        let report = PredictionReport::new(&prediction);
        assert_eq!(report.label, "Unknown");
        assert_eq!(report.glyph, "");
    }

    #[test]
    fn test_report_serialization() {
        let prediction = Prediction {
            class: 0,
            probabilities: [0.8, 0.15, 0.05],
        };

        let report = PredictionReport::new(&prediction);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"label\":\"Low\""));
        assert!(json.contains("\"probabilities\""));
    }
}
