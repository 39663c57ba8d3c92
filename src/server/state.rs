//! Application state shared across handlers

use crate::inference::Predictor;
use chrono::{DateTime, Utc};

use super::ServerConfig;

/// Loaded once at startup and never mutated afterwards
pub struct AppState {
    pub config: ServerConfig,
    pub predictor: Predictor,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, predictor: Predictor) -> Self {
        Self {
            config,
            predictor,
            started_at: Utc::now(),
        }
    }

    /// Load the predictor from the paths in `config`
    pub fn load(config: ServerConfig) -> crate::Result<Self> {
        let predictor = Predictor::load(&config.model_path, Some(&config.scaler_path))?;
        Ok(Self::new(config, predictor))
    }
}
