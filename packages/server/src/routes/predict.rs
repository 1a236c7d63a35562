use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: usize,
}

/// Classify a single feature vector.
///
/// The body is taken raw and parsed only after the model check, so a service
/// without a model answers `500` no matter what was sent.
#[tracing::instrument(name = "POST /predict", skip(state, body))]
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let predictor = state.predictor()?;
    let request: PredictRequest = serde_json::from_slice(&body)?;
    let prediction = predictor.predict_one(request.features)?;
    tracing::debug!(prediction, "Predicted class");
    Ok(Json(PredictResponse { prediction }))
}
