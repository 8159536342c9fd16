//! Core data types for stress predictions

pub mod prediction;

pub use prediction::{
    class_label, ClassProbability, Prediction, PredictionReport, StressLevel, CLASS_COUNT,
};
