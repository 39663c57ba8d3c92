//! Training engine implementation

use super::linear_models::LogisticRegression;
use super::metrics::{accuracy_score, ConfusionMatrix};
use super::split::TrainTestSplit;
use super::TrainingConfig;
use crate::dataset::{self, TARGET_COLUMN};
use crate::error::{ClassifierError, Result};
use crate::export::ModelArtifact;
use crate::preprocessing::{Scaler, ScalerType};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Summary of a completed training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub n_train: usize,
    pub n_test: usize,
    pub n_features: usize,
    pub scaled: bool,
    pub iterations: usize,
    pub training_time_secs: f64,
}

/// Fits the classifier (and optional scaler) on a labelled frame
pub struct TrainEngine {
    config: TrainingConfig,
    feature_names: Vec<String>,
    artifact: Option<ModelArtifact>,
    scaler: Option<Scaler>,
    report: Option<TrainingReport>,
}

impl TrainEngine {
    /// Create an engine over the built-in feature schema
    pub fn new(config: TrainingConfig) -> Self {
        Self::with_features(config, dataset::feature_names())
    }

    /// Create an engine over a custom feature schema
    pub fn with_features(config: TrainingConfig, feature_names: Vec<String>) -> Self {
        Self {
            config,
            feature_names,
            artifact: None,
            scaler: None,
            report: None,
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn artifact(&self) -> Option<&ModelArtifact> {
        self.artifact.as_ref()
    }

    pub fn scaler(&self) -> Option<&Scaler> {
        self.scaler.as_ref()
    }

    pub fn report(&self) -> Option<&TrainingReport> {
        self.report.as_ref()
    }

    /// Split, scale, fit and evaluate on `df`, which must hold every feature
    /// column plus the continuous target
    pub fn fit(&mut self, df: &DataFrame) -> Result<&TrainingReport> {
        let start = Instant::now();

        let (train_df, test_df) = TrainTestSplit::new(self.config.test_size)
            .with_random_state(self.config.random_state)
            .split_frame(df)?;
        debug!(
            n_train = train_df.height(),
            n_test = test_df.height(),
            seed = self.config.random_state,
            "Data split"
        );

        let (train_df, test_df, scaler) = if self.config.scale_features {
            let columns: Vec<&str> = self.feature_names.iter().map(|s| s.as_str()).collect();
            let mut scaler = Scaler::new(ScalerType::Standard);
            let train_scaled = scaler.fit_transform(&train_df, &columns)?;
            let test_scaled = scaler.transform(&test_df)?;
            (train_scaled, test_scaled, Some(scaler))
        } else {
            (train_df, test_df, None)
        };

        let x_train = dataset::feature_matrix(&train_df, &self.feature_names)?;
        let y_train = dataset::binarize_target(&train_df, TARGET_COLUMN, self.config.threshold)?;
        let x_test = dataset::feature_matrix(&test_df, &self.feature_names)?;
        let y_test = dataset::binarize_target(&test_df, TARGET_COLUMN, self.config.threshold)?;

        if self.config.inverse_regularization <= 0.0 {
            return Err(ClassifierError::InvalidParameter {
                name: "inverse_regularization".to_string(),
                value: self.config.inverse_regularization.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        let alpha = 1.0 / (self.config.inverse_regularization * x_train.nrows() as f64);

        let mut model = LogisticRegression::new()
            .with_alpha(alpha)
            .with_learning_rate(self.config.learning_rate)
            .with_max_iter(self.config.max_iter)
            .with_tol(self.config.tol);
        model.fit(&x_train, &y_train)?;

        if model.n_iter >= self.config.max_iter {
            warn!(max_iter = self.config.max_iter, "Gradient descent hit max_iter before converging");
        }

        let y_pred = model.predict(&x_test)?;
        let accuracy = accuracy_score(&y_test, &y_pred)?;
        let confusion = ConfusionMatrix::from_predictions(&y_test, &y_pred)?;

        let report = TrainingReport {
            accuracy,
            confusion,
            n_train: x_train.nrows(),
            n_test: x_test.nrows(),
            n_features: self.feature_names.len(),
            scaled: scaler.is_some(),
            iterations: model.n_iter,
            training_time_secs: start.elapsed().as_secs_f64(),
        };

        info!(
            accuracy = format!("{:.4}", accuracy),
            n_train = report.n_train,
            n_test = report.n_test,
            iterations = report.iterations,
            scaled = report.scaled,
            "Training complete"
        );

        self.artifact = Some(ModelArtifact::new(
            self.feature_names.clone(),
            model,
            scaler.is_some(),
            self.config.threshold,
            accuracy,
        )?);
        self.scaler = scaler;

        Ok(&*self.report.insert(report))
    }

    /// Write the classifier and, if used, the scaler to the configured paths.
    /// A scaler file left over from an earlier scaled run is removed when
    /// the current model is unscaled.
    pub fn save(&self) -> Result<()> {
        let artifact = self.artifact.as_ref().ok_or(ClassifierError::ModelNotFitted)?;
        artifact.save(&self.config.model_path)?;

        match &self.scaler {
            Some(scaler) => {
                scaler.save(&self.config.scaler_path)?;
                info!(path = %self.config.scaler_path.display(), "Scaler saved");
            }
            None => {
                if self.config.scaler_path.exists() {
                    std::fs::remove_file(&self.config.scaler_path)?;
                    info!(path = %self.config.scaler_path.display(), "Removed stale scaler");
                }
            }
        }

        Ok(())
    }
}

/// Train on the built-in dataset and persist the artifacts
pub fn train_and_save(config: TrainingConfig) -> Result<TrainingReport> {
    let df = dataset::load_diabetes()?;
    info!(rows = df.height(), cols = df.width(), "Dataset loaded");

    let mut engine = TrainEngine::new(config);
    let report = engine.fit(&df)?.clone();
    engine.save()?;
    Ok(report)
}
