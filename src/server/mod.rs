//! Prediction server module
//!
//! Serves the persisted classifier behind a single `POST /predict` route.
//! Artifacts are loaded once before the listener binds and shared read-only
//! across requests.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::PredictResponse;
pub use state::AppState;

use crate::inference::LabelFormat;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub label_format: LabelFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("model.json")),
            scaler_path: std::env::var("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("scaler.json")),
            label_format: std::env::var("PREDICTION_LABELS")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(format) => Some(format),
                    Err(e) => {
                        warn!(value = %v, error = %e, "Ignoring PREDICTION_LABELS");
                        None
                    }
                })
                .unwrap_or_default(),
        }
    }
}

/// Load the artifacts and serve until ctrl+c
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    info!(
        model = %config.model_path.display(),
        scaler = %config.scaler_path.display(),
        labels = ?config.label_format,
        "Loading model artifacts"
    );

    let state = Arc::new(AppState::load(config.clone())?);
    let start_time = state.started_at;
    info!(
        features = state.predictor.feature_names().len(),
        scaled = state.predictor.is_scaled(),
        "Model ready"
    );

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        pid = std::process::id(),
        started_at = %start_time.to_rfc3339(),
        "Server listening on http://{}/predict",
        addr
    );

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install ctrl+c handler; serving until killed");
            std::future::pending::<()>().await;
        }
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        if std::env::var("API_PORT").is_err() {
            assert_eq!(config.port, 5000);
        }
        if std::env::var("MODEL_PATH").is_err() {
            assert_eq!(config.model_path, PathBuf::from("model.json"));
        }
    }
}
