//! Axum routes for the inference service

use crate::error::ApiError;
use crate::routes::{health, model, predict};
use crate::state::ServiceState;
use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Construct the service router with all endpoints
pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/predict", post(predict::predict))
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/model", get(model::model_info))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

/// A panic inside a handler fails only its own request.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = err.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = err.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "Unhandled error while processing request".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);
    ApiError::invalid_request(detail).into_response()
}
