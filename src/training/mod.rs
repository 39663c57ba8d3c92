//! Model training module
//!
//! Provides the training pipeline for the diabetes classifier:
//! - Seeded train/test split
//! - Optional standardization fitted on the training split
//! - Logistic regression by gradient descent
//! - Held-out accuracy and confusion counts
//! - Persistence of the fitted artifacts

mod config;
mod engine;
pub mod linear_models;
pub mod metrics;
pub mod split;

pub use config::TrainingConfig;
pub use engine::{train_and_save, TrainEngine, TrainingReport};
pub use linear_models::LogisticRegression;
pub use metrics::{accuracy_score, ConfusionMatrix};
pub use split::{SplitIndices, TrainTestSplit};
