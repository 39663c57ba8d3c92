//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::inference::{FeatureRecord, PredictionValue};

use super::error::{Result, ServerError};
use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: PredictionValue,
}

/// Classify one feature record; absent schema fields are treated as zero
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<FeatureRecord>, JsonRejection>,
) -> Result<Json<PredictResponse>> {
    let Json(record) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected prediction payload");
        ServerError::BadRequest(rejection.body_text())
    })?;

    let prediction = state.predictor.predict(&record)?;

    Ok(Json(PredictResponse {
        prediction: prediction.render(state.config.label_format),
    }))
}
