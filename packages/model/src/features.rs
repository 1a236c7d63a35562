//! Shaping of a single feature vector into the matrix layout linfa expects.

use crate::error::Result;
use ndarray::Array2;

/// Interpret `features` as exactly one sample and reshape it into a 1×N matrix.
///
/// No dimensionality check happens here; see [`crate::Predictor::predict_one`].
pub fn shape_features(features: Vec<f64>) -> Result<Array2<f64>> {
    let n = features.len();
    Ok(Array2::from_shape_vec((1, n), features)?)
}
