//! Canonical feature definitions and input-vector assembly.
//!
//! This module is the single source of truth for the 20 risk factors the
//! classifier consumes. The table order below is the column order used when
//! the model was trained; both the UI and row assembly read from it, so the
//! two can never drift apart.

use std::collections::HashMap;

use serde::Serialize;

/// One named, bounded-integer input dimension.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureDef {
    /// Machine name, matching the training dataset column
    pub name: &'static str,
    /// Human-readable slider label
    pub label: &'static str,
    /// Inclusive upper bound of the integer domain `[0, max_val]`
    pub max_val: u8,
}

impl FeatureDef {
    /// Default control value: midpoint of the domain (integer division).
    pub fn default_value(&self) -> u8 {
        self.max_val / 2
    }
}

/// Number of features consumed by the model.
pub const FEATURE_COUNT: usize = 20;

/// The canonical feature table. Order matters: it must match the column
/// order used at model training time.
pub const FEATURES: [FeatureDef; FEATURE_COUNT] = [
    FeatureDef {
        name: "anxiety_level",
        label: "Anxiety level (0: low to 5: very high)",
        max_val: 5,
    },
    FeatureDef {
        name: "self_esteem",
        label: "Self-esteem (0: low to 5: very high)",
        max_val: 5,
    },
    FeatureDef {
        name: "mental_health_history",
        label: "Mental health history (0: no, 1: yes)",
        max_val: 1,
    },
    FeatureDef {
        name: "depression",
        label: "Depression level (0: low to 5: very high)",
        max_val: 5,
    },
    FeatureDef {
        name: "headache",
        label: "Headache frequency (0: never to 5: always)",
        max_val: 5,
    },
    FeatureDef {
        name: "blood_pressure",
        label: "Blood pressure (0: low, 1: normal, 2: high)",
        max_val: 2,
    },
    FeatureDef {
        name: "sleep_quality",
        label: "Sleep quality (0: poor to 5: excellent)",
        max_val: 5,
    },
    FeatureDef {
        name: "breathing_problem",
        label: "Breathing problems (0: never to 5: always)",
        max_val: 5,
    },
    FeatureDef {
        name: "noise_level",
        label: "Environmental noise level (0: low to 5: high)",
        max_val: 5,
    },
    FeatureDef {
        name: "living_conditions",
        label: "Living conditions (0: poor to 5: excellent)",
        max_val: 5,
    },
    FeatureDef {
        name: "safety",
        label: "Sense of safety (0: unsafe to 5: very safe)",
        max_val: 5,
    },
    FeatureDef {
        name: "basic_needs",
        label: "Basic needs met (0: no to 5: fully)",
        max_val: 5,
    },
    FeatureDef {
        name: "academic_performance",
        label: "Academic performance (0: poor to 5: excellent)",
        max_val: 5,
    },
    FeatureDef {
        name: "study_load",
        label: "Study load (0: low to 5: very high)",
        max_val: 5,
    },
    FeatureDef {
        name: "teacher_student_relationship",
        label: "Teacher-student relationship (0: poor to 5: excellent)",
        max_val: 5,
    },
    FeatureDef {
        name: "future_career_concerns",
        label: "Future career concerns (0: low to 5: high)",
        max_val: 5,
    },
    FeatureDef {
        name: "social_support",
        label: "Social support (0: low to 5: high)",
        max_val: 5,
    },
    FeatureDef {
        name: "peer_pressure",
        label: "Peer pressure (0: low to 5: high)",
        max_val: 5,
    },
    FeatureDef {
        name: "extracurricular_activities",
        label: "Extracurricular activities (0: few to 5: many)",
        max_val: 5,
    },
    FeatureDef {
        name: "bullying",
        label: "Bullying frequency (0: never to 5: always)",
        max_val: 5,
    },
];

/// Look up a feature definition by machine name.
pub fn feature(name: &str) -> Option<&'static FeatureDef> {
    FEATURES.iter().find(|f| f.name == name)
}

/// Validation failure for a user-supplied value mapping.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown feature '{0}'")]
    UnknownFeature(String),
    #[error("missing value for feature '{0}'")]
    MissingFeature(&'static str),
    #[error("value {value} for feature '{name}' is outside the domain [0, {max}]")]
    OutOfRange {
        name: &'static str,
        value: i64,
        max: u8,
    },
}

/// A complete, validated set of feature values.
///
/// Construction guarantees exactly one in-domain value per defined feature:
/// no missing keys, no extras. Built fresh per prediction request and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputVector {
    values: HashMap<&'static str, u8>,
}

impl InputVector {
    /// Validate a name -> value mapping into an input vector.
    ///
    /// Unknown keys are rejected before range checks so the caller learns
    /// about a misspelled feature rather than a spurious missing one.
    pub fn from_map(raw: &HashMap<String, i64>) -> Result<Self, InputError> {
        for key in raw.keys() {
            if feature(key).is_none() {
                return Err(InputError::UnknownFeature(key.clone()));
            }
        }

        let mut values = HashMap::with_capacity(FEATURE_COUNT);
        for def in &FEATURES {
            let value = *raw
                .get(def.name)
                .ok_or(InputError::MissingFeature(def.name))?;
            if value < 0 || value > i64::from(def.max_val) {
                return Err(InputError::OutOfRange {
                    name: def.name,
                    value,
                    max: def.max_val,
                });
            }
            values.insert(def.name, value as u8);
        }

        Ok(Self { values })
    }

    /// Input vector holding every feature's midpoint default.
    pub fn defaults() -> Self {
        let values = FEATURES
            .iter()
            .map(|def| (def.name, def.default_value()))
            .collect();
        Self { values }
    }

    /// Value for a single feature.
    pub fn get(&self, name: &str) -> Option<u8> {
        self.values.get(name).copied()
    }

    /// Assemble the model input row.
    ///
    /// Column order is forced to the canonical table order regardless of how
    /// the values were collected. A silently reordered row would be
    /// structurally valid but semantically wrong, so this step is mandatory
    /// on every call.
    pub fn to_row(&self) -> Vec<f32> {
        FEATURES
            .iter()
            .map(|def| f32::from(self.values[def.name]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map() -> HashMap<String, i64> {
        FEATURES
            .iter()
            .map(|def| (def.name.to_string(), i64::from(def.default_value())))
            .collect()
    }

    #[test]
    fn test_feature_table_shape() {
        assert_eq!(FEATURES.len(), FEATURE_COUNT);
        assert_eq!(FEATURES[0].name, "anxiety_level");
        assert_eq!(FEATURES[FEATURE_COUNT - 1].name, "bullying");

        // Names are unique
        let mut names: Vec<_> = FEATURES.iter().map(|f| f.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_midpoint_defaults() {
        assert_eq!(feature("anxiety_level").unwrap().default_value(), 2);
        assert_eq!(feature("mental_health_history").unwrap().default_value(), 0);
        assert_eq!(feature("blood_pressure").unwrap().default_value(), 1);
    }

    #[test]
    fn test_from_map_accepts_full_mapping() {
        let vector = InputVector::from_map(&full_map()).unwrap();
        assert_eq!(vector.get("blood_pressure"), Some(1));
        assert_eq!(vector.to_row().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_missing_key_rejected() {
        let mut raw = full_map();
        raw.remove("depression");

        let err = InputVector::from_map(&raw).unwrap_err();
        assert_eq!(err, InputError::MissingFeature("depression"));
    }

    #[test]
    fn test_extra_key_rejected() {
        let mut raw = full_map();
        raw.insert("caffeine_intake".to_string(), 3);

        let err = InputVector::from_map(&raw).unwrap_err();
        assert_eq!(err, InputError::UnknownFeature("caffeine_intake".to_string()));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut raw = full_map();
        raw.insert("mental_health_history".to_string(), 2);
        assert!(matches!(
            InputVector::from_map(&raw).unwrap_err(),
            InputError::OutOfRange {
                name: "mental_health_history",
                value: 2,
                max: 1,
            }
        ));

        let mut raw = full_map();
        raw.insert("anxiety_level".to_string(), -1);
        assert!(matches!(
            InputVector::from_map(&raw).unwrap_err(),
            InputError::OutOfRange { value: -1, .. }
        ));
    }

    #[test]
    fn test_row_order_is_canonical() {
        let mut raw = full_map();
        raw.insert("anxiety_level".to_string(), 5);
        raw.insert("bullying".to_string(), 1);

        let row = InputVector::from_map(&raw).unwrap().to_row();
        assert_eq!(row[0], 5.0); // anxiety_level is column 0
        assert_eq!(row[FEATURE_COUNT - 1], 1.0); // bullying is the last column
    }

    #[test]
    fn test_row_assembly_is_deterministic() {
        // HashMap iteration order varies between instances; the assembled
        // row must not.
        let vector = InputVector::from_map(&full_map()).unwrap();
        let expected: Vec<f32> = FEATURES
            .iter()
            .map(|def| f32::from(def.default_value()))
            .collect();

        for _ in 0..8 {
            let again = InputVector::from_map(&full_map()).unwrap();
            assert_eq!(again.to_row(), expected);
            assert_eq!(vector.to_row(), expected);
        }
    }
}
