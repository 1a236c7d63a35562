//! Fitted classifiers for clf-serve
//!
//! This crate owns everything on the model side of the artifact boundary:
//! the [`MLModel`] enum over [`linfa`] classifiers, the [`Predictor`] seam the
//! inference service calls into, feature shaping, artifact encoding and the
//! training helpers used by the trainer binary.

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod features;
pub mod ml;
pub mod train;

#[cfg(test)]
mod tests;

pub use artifact::{read_artifact, write_artifact};
pub use dataset::Dataset;
pub use error::{ModelError, Result};
pub use features::shape_features;
pub use ml::{MLModel, ModelWithMeta, Predictor};
pub use train::{AccuracyMetrics, Algorithm, TrainOptions, accuracy, fit};
