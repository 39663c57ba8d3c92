//! Persisted classifier artifact

use crate::error::{ClassifierError, Result};
use crate::training::LogisticRegression;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// A fitted classifier together with the schema it was trained on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Feature names in the column order the coefficients expect
    pub feature_names: Vec<String>,
    /// Fitted classifier
    pub model: LogisticRegression,
    /// Whether inputs must go through the persisted scaler first
    pub scaled: bool,
    /// Label threshold used on the continuous target
    pub threshold: f64,
    /// Held-out accuracy at training time
    pub test_accuracy: f64,
    pub trained_at: DateTime<Utc>,
}

impl ModelArtifact {
    pub fn new(
        feature_names: Vec<String>,
        model: LogisticRegression,
        scaled: bool,
        threshold: f64,
        test_accuracy: f64,
    ) -> Result<Self> {
        let artifact = Self {
            feature_names,
            model,
            scaled,
            threshold,
            test_accuracy,
            trained_at: Utc::now(),
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check that the classifier is fitted and agrees with the schema
    pub fn validate(&self) -> Result<()> {
        if !self.model.is_fitted {
            return Err(ClassifierError::ModelNotFitted);
        }

        let n_coef = self.model.n_features().unwrap_or(0);
        if n_coef != self.feature_names.len() {
            return Err(ClassifierError::ArtifactError(format!(
                "model has {} coefficients but schema lists {} features",
                n_coef,
                self.feature_names.len()
            )));
        }

        let mut seen = HashSet::new();
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(ClassifierError::ArtifactError(format!(
                    "duplicate feature name '{}'",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Save the artifact as pretty-printed JSON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), features = self.feature_names.len(), "Model artifact saved");
        Ok(())
    }

    /// Load and validate an artifact
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::ArtifactError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let artifact: Self = serde_json::from_str(&json)?;
        artifact.validate()?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fitted() -> LogisticRegression {
        let mut model = LogisticRegression::new();
        model
            .fit(&array![[0.0, 1.0], [1.0, 0.0]], &array![0.0, 1.0])
            .unwrap();
        model
    }

    #[test]
    fn test_new_rejects_schema_mismatch() {
        let err = ModelArtifact::new(vec!["a".into()], fitted(), false, 140.0, 1.0).unwrap_err();
        assert!(matches!(err, ClassifierError::ArtifactError(_)));
    }

    #[test]
    fn test_new_rejects_unfitted() {
        let err = ModelArtifact::new(vec![], LogisticRegression::new(), false, 140.0, 1.0)
            .unwrap_err();
        assert!(matches!(err, ClassifierError::ModelNotFitted));
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let err = ModelArtifact::new(vec!["a".into(), "a".into()], fitted(), false, 140.0, 1.0)
            .unwrap_err();
        assert!(matches!(err, ClassifierError::ArtifactError(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");

        let artifact =
            ModelArtifact::new(vec!["a".into(), "b".into()], fitted(), true, 140.0, 0.5).unwrap();
        artifact.save(&path).unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.feature_names, artifact.feature_names);
        assert_eq!(loaded.model.coefficients, artifact.model.coefficients);
        assert!(loaded.scaled);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelArtifact::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ClassifierError::ArtifactError(_)));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ModelArtifact::load(&path),
            Err(ClassifierError::SerializationError(_))
        ));
    }
}
