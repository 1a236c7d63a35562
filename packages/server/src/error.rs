use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clf_serve_model::ModelError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures a request can end in.
///
/// The two kinds belong to different fault domains: the service having no
/// model is a server error, anything wrong with the submitted features is a
/// client error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Model not loaded")]
    ModelUnavailable,
    #[error("{0}")]
    InvalidRequest(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn model_unavailable() -> Self {
        tracing::error!("Rejecting request: model not loaded");
        ApiError::ModelUnavailable
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Invalid request: {}", msg);
        ApiError::InvalidRequest(msg)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        Self::invalid_request(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::ModelUnavailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_model_error_maps_to_invalid_request() {
        let err: ApiError = ModelError::DimensionMismatch {
            expected: 4,
            got: 3,
        }
        .into();
        match err {
            ApiError::InvalidRequest(msg) => assert_eq!(msg, "expected 4 features, got 3"),
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_unavailable_detail() {
        assert_eq!(ApiError::ModelUnavailable.to_string(), "Model not loaded");
    }
}
