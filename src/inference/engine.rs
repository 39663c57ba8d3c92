//! Inference engine implementation

use super::LabelFormat;
use crate::dataset;
use crate::error::{ClassifierError, Result};
use crate::export::ModelArtifact;
use crate::preprocessing::Scaler;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// A flat record of feature name to value; absent features read as zero
pub type FeatureRecord = HashMap<String, f64>;

/// Binary outcome of the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    NonDiabetic,
    Diabetic,
}

impl Label {
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(Label::NonDiabetic),
            1 => Some(Label::Diabetic),
            _ => None,
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Label::NonDiabetic => 0,
            Label::Diabetic => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Label::NonDiabetic => "Non-Diabetic",
            Label::Diabetic => "Diabetic",
        }
    }
}

/// Rendered prediction, serialized bare as `0` / `1` or as a label string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PredictionValue {
    Class(u8),
    Name(&'static str),
}

/// Result of a single prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Label,
    /// Probability of the positive class
    pub probability: f64,
}

impl Prediction {
    pub fn render(&self, format: LabelFormat) -> PredictionValue {
        match format {
            LabelFormat::Class => PredictionValue::Class(self.label.class()),
            LabelFormat::Name => PredictionValue::Name(self.label.name()),
        }
    }
}

/// Loaded classifier plus optional scaler; immutable once built
#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: ModelArtifact,
    scaler: Option<Scaler>,
}

impl Predictor {
    /// Pair a classifier with its scaler, checking they belong together
    pub fn new(artifact: ModelArtifact, scaler: Option<Scaler>) -> Result<Self> {
        artifact.validate()?;

        let scaler = match (artifact.scaled, scaler) {
            (true, None) => {
                return Err(ClassifierError::ArtifactError(
                    "model was trained on scaled features but no scaler was provided".to_string(),
                ))
            }
            (true, Some(scaler)) => {
                if !scaler.is_fitted() {
                    return Err(ClassifierError::ModelNotFitted);
                }
                if let Some(missing) = artifact.feature_names.iter().find(|f| !scaler.covers(f)) {
                    return Err(ClassifierError::ArtifactError(format!(
                        "scaler has no parameters for feature '{}'",
                        missing
                    )));
                }
                Some(scaler)
            }
            (false, Some(_)) => {
                warn!("Ignoring scaler: model was trained on unscaled features");
                None
            }
            (false, None) => None,
        };

        Ok(Self { artifact, scaler })
    }

    /// Load the classifier and, if the model needs one, the scaler
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(model_path: P, scaler_path: Option<Q>) -> Result<Self> {
        let model_path = model_path.as_ref();
        let artifact = ModelArtifact::load(model_path)?;

        let scaler_path: Option<&Path> = scaler_path.as_ref().map(|p| p.as_ref());
        let scaler = match scaler_path {
            Some(path) if path.exists() => Some(Scaler::load(path)?),
            Some(path) => {
                debug!(path = %path.display(), "No scaler file present");
                None
            }
            None => None,
        };

        let predictor = Self::new(artifact, scaler)?;
        info!(
            model = %model_path.display(),
            features = predictor.feature_names().len(),
            scaled = predictor.is_scaled(),
            trained_at = %predictor.artifact.trained_at.to_rfc3339(),
            test_accuracy = predictor.artifact.test_accuracy,
            "Predictor loaded"
        );
        Ok(predictor)
    }

    /// Expected feature names, in model column order
    pub fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    pub fn is_scaled(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Build the single-row frame the classifier sees: every schema column
    /// present, absent ones filled with `0.0`. Names outside the schema are
    /// rejected.
    pub fn feature_frame(&self, record: &FeatureRecord) -> Result<DataFrame> {
        let mut unknown: Vec<&String> = record
            .keys()
            .filter(|k| !self.artifact.feature_names.contains(*k))
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(ClassifierError::UnknownFeature(unknown[0].clone()));
        }

        let columns: Vec<Column> = self
            .feature_names()
            .iter()
            .map(|name| {
                let value = record.get(name).copied().unwrap_or(0.0);
                Series::new(name.as_str().into(), &[value]).into()
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    /// Predict a single record
    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction> {
        let frame = self.feature_frame(record)?;
        let frame = match &self.scaler {
            Some(scaler) => scaler.transform(&frame)?,
            None => frame,
        };

        let x = dataset::feature_matrix(&frame, self.feature_names())?;
        let proba = self.artifact.model.predict_proba(&x)?;
        let probability = proba
            .first()
            .copied()
            .ok_or_else(|| ClassifierError::InferenceError("empty prediction".to_string()))?;

        let label = if probability >= 0.5 {
            Label::Diabetic
        } else {
            Label::NonDiabetic
        };

        debug!(
            provided = record.len(),
            defaulted = self.feature_names().len() - record.len(),
            probability,
            class = label.class(),
            "Prediction"
        );

        Ok(Prediction { label, probability })
    }
}
