//! clf-serve inference service
//!
//! Serves one fitted classifier over HTTP. The model artifact is loaded once
//! into a [`ServiceState`]; every request handler reads that state through the
//! axum router and never mutates it.
//!
//! ## Endpoints
//!
//! - `POST /predict` classifies one feature vector
//! - `GET /health` liveness, always `200`, reports whether a model is loaded
//! - `GET /ready` readiness, `503` while no model is loaded
//! - `GET /model` describes the loaded model
//!
//! ```rust,ignore
//! use clf_serve_server::{ServiceState, router};
//!
//! let state = ServiceState::load("/mnt/data/model.clf");
//! let app = router(state);
//! ```

pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use router::router;
pub use state::{AppState, ServiceState};
