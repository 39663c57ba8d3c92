//! Inference configuration

use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a predicted class is rendered in responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFormat {
    /// Integer class, `0` or `1`
    #[default]
    Class,
    /// `"Non-Diabetic"` or `"Diabetic"`
    Name,
}

impl FromStr for LabelFormat {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "class" | "int" | "integer" => Ok(LabelFormat::Class),
            "name" | "label" => Ok(LabelFormat::Name),
            other => Err(ClassifierError::InvalidParameter {
                name: "label_format".to_string(),
                value: other.to_string(),
                reason: "expected 'class' or 'name'".to_string(),
            }),
        }
    }
}
