//! Training configuration

use crate::dataset::DIABETIC_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the training pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Target values strictly above this become the positive class
    pub threshold: f64,

    /// Fraction of rows held out for the accuracy report
    pub test_size: f64,

    /// Random seed for the train/test shuffle
    pub random_state: u64,

    /// Standardize features using training-split statistics
    pub scale_features: bool,

    /// Inverse regularization strength; the L2 penalty on the mean loss
    /// is `1 / (C * n_train)`
    pub inverse_regularization: f64,

    /// Gradient descent step size
    pub learning_rate: f64,

    /// Maximum gradient descent iterations
    pub max_iter: usize,

    /// Gradient-norm tolerance for early stop
    pub tol: f64,

    /// Where the fitted classifier is written
    pub model_path: PathBuf,

    /// Where the fitted scaler is written when `scale_features` is set
    pub scaler_path: PathBuf,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            threshold: DIABETIC_THRESHOLD,
            test_size: 0.2,
            random_state: 42,
            scale_features: true,
            inverse_regularization: 1.0,
            learning_rate: 0.5,
            max_iter: 5000,
            tol: 1e-6,
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("model.json")),
            scaler_path: std::env::var("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("scaler.json")),
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn with_scaling(mut self, scale_features: bool) -> Self {
        self.scale_features = scale_features;
        self
    }

    pub fn with_regularization(mut self, c: f64) -> Self {
        self.inverse_regularization = c;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_scaler_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scaler_path = path.into();
        self
    }
}
