//! Diabetes classifier - training and serving
//!
//! Trains a logistic-regression classifier on the built-in diabetes
//! progression dataset and serves predictions over HTTP.
//!
//! # Modules
//!
//! - [`dataset`] - Embedded dataset, target binarization, feature extraction
//! - [`preprocessing`] - Feature scaling
//! - [`training`] - Train/test split, logistic regression, metrics, training engine
//! - [`export`] - Persisted model artifact
//! - [`inference`] - Single-record prediction with default filling
//! - [`server`] - `POST /predict` HTTP endpoint
//! - [`cli`] - Command-line interface

pub mod error;

pub mod dataset;
pub mod preprocessing;
pub mod training;
pub mod export;
pub mod inference;

pub mod server;
pub mod cli;

pub use error::{ClassifierError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{ClassifierError, Result};
    pub use crate::dataset::{load_diabetes, FEATURE_NAMES, TARGET_COLUMN, DIABETIC_THRESHOLD};
    pub use crate::preprocessing::{Scaler, ScalerType};
    pub use crate::training::{TrainEngine, TrainingConfig, TrainingReport, LogisticRegression, TrainTestSplit};
    pub use crate::export::ModelArtifact;
    pub use crate::inference::{FeatureRecord, Label, LabelFormat, Prediction, Predictor};
    pub use crate::server::{AppState, ServerConfig, create_router, run_server};
}
