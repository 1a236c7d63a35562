//! Unified model type over the [`linfa`] classifiers clf-serve can serve.
//!
//! A trained model is persisted as a Fory envelope carrying a MessagePack
//! encoding of [`MLModel`]. The envelope holds a format version and the model
//! type so a reader can reject artifacts it does not understand before it
//! touches the payload.

use crate::error::{ModelError, Result};
use crate::features::shape_features;
use fory::{Fory, ForyObject};
use linfa::DatasetBase;
use linfa::traits::Predict;
use linfa_bayes::GaussianNb;
use linfa_logistic::FittedLogisticRegression;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Binary format version written by [`MLModel::to_fory_vec`]
pub const ARTIFACT_VERSION: u8 = 1;

#[derive(ForyObject)]
struct ArtifactEnvelope {
    version: u8,
    model_type: String,
    msgpack_payload: Vec<u8>,
}

fn envelope_codec() -> std::result::Result<Fory, String> {
    let mut fory = Fory::default().compatible(true);
    fory.register::<ArtifactEnvelope>(1)
        .map_err(|e| format!("failed to register artifact envelope: {}", e))?;
    Ok(fory)
}

/// Wrap an already encoded payload into the artifact envelope.
pub(crate) fn seal(version: u8, model_type: &str, msgpack_payload: Vec<u8>) -> Result<Vec<u8>> {
    let envelope = ArtifactEnvelope {
        version,
        model_type: model_type.to_string(),
        msgpack_payload,
    };
    let fory = envelope_codec().map_err(ModelError::Encode)?;
    fory.serialize(&envelope)
        .map_err(|e| ModelError::Encode(format!("Fory serialization failed: {}", e)))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "unknown panic".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
/// # Linfa model together with what the serving side needs to know about it
pub struct ModelWithMeta<M> {
    pub model: M,
    /// Number of columns the model was fitted on
    pub n_features: usize,
    /// Distinct training labels, ascending
    #[serde(default)]
    pub classes: Vec<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
/// # Fitted classifiers that can be stored in an artifact
pub enum MLModel {
    LogisticRegression(ModelWithMeta<FittedLogisticRegression<f64, usize>>),
    DecisionTree(ModelWithMeta<DecisionTree<f64, usize>>),
    GaussianNaiveBayes(ModelWithMeta<GaussianNb<f64, usize>>),
}

impl fmt::Display for MLModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MLModel::LogisticRegression(_) => write!(f, "Logistic Regression Classification"),
            MLModel::DecisionTree(_) => write!(f, "Decision Tree Classification"),
            MLModel::GaussianNaiveBayes(_) => write!(f, "Gaussian Naive Bayes Classification"),
        }
    }
}

impl MLModel {
    /// Discriminator stored in the artifact envelope.
    pub fn model_type(&self) -> &'static str {
        match self {
            MLModel::LogisticRegression(_) => "LogisticRegression",
            MLModel::DecisionTree(_) => "DecisionTree",
            MLModel::GaussianNaiveBayes(_) => "GaussianNaiveBayes",
        }
    }

    fn meta_n_features(&self) -> usize {
        match self {
            MLModel::LogisticRegression(m) => m.n_features,
            MLModel::DecisionTree(m) => m.n_features,
            MLModel::GaussianNaiveBayes(m) => m.n_features,
        }
    }

    fn meta_classes(&self) -> &[usize] {
        match self {
            MLModel::LogisticRegression(m) => &m.classes,
            MLModel::DecisionTree(m) => &m.classes,
            MLModel::GaussianNaiveBayes(m) => &m.classes,
        }
    }

    /// Serialize the model to the artifact binary format.
    pub fn to_fory_vec(&self) -> Result<Vec<u8>> {
        let msgpack_payload = rmp_serde::to_vec_named(self)
            .map_err(|e| ModelError::Encode(format!("MessagePack serialization failed: {}", e)))?;
        seal(ARTIFACT_VERSION, self.model_type(), msgpack_payload)
    }

    /// Deserialize a model from the artifact binary format.
    pub fn from_fory_slice(bytes: &[u8]) -> Result<Self> {
        let fory = envelope_codec().map_err(ModelError::Decode)?;
        // fory indexes past the end of truncated input instead of returning an error
        let envelope: ArtifactEnvelope = panic::catch_unwind(AssertUnwindSafe(|| {
            fory.deserialize(bytes)
                .map_err(|e| ModelError::Decode(format!("Fory deserialization failed: {}", e)))
        }))
        .map_err(|payload| {
            ModelError::Decode(format!(
                "Fory deserialization panicked: {}",
                panic_message(payload.as_ref())
            ))
        })??;

        if envelope.version != ARTIFACT_VERSION {
            return Err(ModelError::UnsupportedVersion(envelope.version));
        }

        let model: MLModel = rmp_serde::from_slice(&envelope.msgpack_payload).map_err(|e| {
            ModelError::Decode(format!("MessagePack deserialization failed: {}", e))
        })?;

        if model.model_type() != envelope.model_type {
            return Err(ModelError::Decode(format!(
                "artifact declares `{}` but contains `{}`",
                envelope.model_type,
                model.model_type()
            )));
        }
        Ok(model)
    }
}

/// Anything that maps a feature matrix to one class label per row.
///
/// The inference service only talks to this trait, which keeps handlers
/// testable with hand-written predictors.
pub trait Predictor: Send + Sync {
    /// Model family, e.g. `LogisticRegression`
    fn kind(&self) -> &str;

    /// Number of columns every input row must have
    fn n_features(&self) -> usize;

    fn classes(&self) -> &[usize];

    fn predict(&self, records: Array2<f64>) -> Result<Array1<usize>>;

    /// Predict the label of exactly one sample.
    fn predict_one(&self, features: Vec<f64>) -> Result<usize> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(ModelError::DimensionMismatch {
                expected,
                got: features.len(),
            });
        }

        let records = shape_features(features)?;
        let predictions = self.predict(records)?;
        match predictions.as_slice() {
            Some([label]) => Ok(*label),
            _ => Err(ModelError::PredictionCount(predictions.len())),
        }
    }
}

impl Predictor for MLModel {
    fn kind(&self) -> &str {
        self.model_type()
    }

    fn n_features(&self) -> usize {
        self.meta_n_features()
    }

    fn classes(&self) -> &[usize] {
        self.meta_classes()
    }

    fn predict(&self, records: Array2<f64>) -> Result<Array1<usize>> {
        // linfa indexes columns without bounds checks against the fitted width
        let expected = self.meta_n_features();
        if records.ncols() != expected {
            return Err(ModelError::DimensionMismatch {
                expected,
                got: records.ncols(),
            });
        }

        let dataset = DatasetBase::from(records);
        let predictions: Array1<usize> = match self {
            MLModel::LogisticRegression(model) => model.model.predict(&dataset),
            MLModel::DecisionTree(model) => model.model.predict(&dataset),
            MLModel::GaussianNaiveBayes(model) => model.model.predict(&dataset),
        };
        Ok(predictions)
    }
}
