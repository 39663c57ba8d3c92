//! Inference module
//!
//! Turns a flat feature record into a diabetic / non-diabetic prediction
//! using the persisted classifier and, when the classifier was trained on
//! standardized inputs, the persisted scaler.

mod config;
mod engine;

pub use config::LabelFormat;
pub use engine::{FeatureRecord, Label, Prediction, PredictionValue, Predictor};
