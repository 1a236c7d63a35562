use crate::error::ApiError;
use clf_serve_model::{Predictor, read_artifact};
use std::path::Path;
use std::sync::Arc;

pub type AppState = Arc<ServiceState>;

/// Process-wide serving state, fixed once at startup.
///
/// Either a predictor is present for the rest of the process lifetime or it
/// never will be; there is no reload.
#[derive(Clone, Default)]
pub struct ServiceState {
    predictor: Option<Arc<dyn Predictor>>,
}

impl ServiceState {
    pub fn new(predictor: Option<Arc<dyn Predictor>>) -> Self {
        Self { predictor }
    }

    pub fn with_predictor(predictor: impl Predictor + 'static) -> Self {
        Self::new(Some(Arc::new(predictor)))
    }

    pub fn unavailable() -> Self {
        Self::new(None)
    }

    /// Load the artifact at `path`.
    ///
    /// Any failure is logged and leaves the state without a predictor so the
    /// service can still come up and report itself as degraded.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        tracing::info!("Loading model from {}", path.display());
        match read_artifact(path) {
            Ok(model) => {
                tracing::info!(
                    model = %model,
                    n_features = model.n_features(),
                    "Model loaded successfully"
                );
                Self::with_predictor(model)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading model");
                Self::unavailable()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.is_some()
    }

    pub fn predictor(&self) -> Result<&Arc<dyn Predictor>, ApiError> {
        self.predictor.as_ref().ok_or_else(ApiError::model_unavailable)
    }
}

impl std::fmt::Debug for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceState")
            .field("model", &self.predictor.as_ref().map(|p| p.kind().to_string()))
            .finish()
    }
}
