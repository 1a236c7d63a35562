use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub kind: String,
    pub n_features: usize,
    pub classes: Vec<usize>,
}

#[tracing::instrument(name = "GET /model", skip(state))]
pub async fn model_info(State(state): State<AppState>) -> Result<Json<ModelInfoResponse>, ApiError> {
    let predictor = state.predictor()?;
    Ok(Json(ModelInfoResponse {
        kind: predictor.kind().to_string(),
        n_features: predictor.n_features(),
        classes: predictor.classes().to_vec(),
    }))
}
