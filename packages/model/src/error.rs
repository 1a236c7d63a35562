use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ModelError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ModelError {
    /// Reading or writing the artifact file failed
    #[error("failed to access model artifact `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode model: {0}")]
    Encode(String),
    #[error("failed to decode model: {0}")]
    Decode(String),
    #[error("unsupported model artifact version: {0}")]
    UnsupportedVersion(u8),
    #[error("invalid feature shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
    /// Input width does not match the dimensionality the model was fitted on
    #[error("expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("model returned {0} predictions for a single sample")]
    PredictionCount(usize),
    #[error("failed to fit model: {0}")]
    Fit(String),
    #[error("invalid dataset: {0}")]
    Dataset(String),
}

impl ModelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ModelError::Io {
            path: path.into(),
            source,
        }
    }
}
