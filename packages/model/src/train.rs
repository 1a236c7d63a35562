//! Fitting the classifiers [`MLModel`] can hold.

use crate::dataset::Dataset;
use crate::error::{ModelError, Result};
use crate::ml::{MLModel, ModelWithMeta, Predictor};
use linfa::prelude::Records;
use linfa::traits::Fit;
use linfa_bayes::GaussianNb;
use linfa_logistic::LogisticRegression;
use linfa_trees::DecisionTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    LogisticRegression,
    DecisionTree,
    #[serde(rename = "gaussian-nb")]
    GaussianNaiveBayes,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::LogisticRegression,
        Algorithm::DecisionTree,
        Algorithm::GaussianNaiveBayes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::LogisticRegression => "logistic-regression",
            Algorithm::DecisionTree => "decision-tree",
            Algorithm::GaussianNaiveBayes => "gaussian-nb",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Algorithm::ALL.iter().map(|a| a.as_str()).collect();
                format!("unknown algorithm `{s}`, expected one of: {}", valid.join(", "))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainOptions {
    pub algorithm: Algorithm,
    /// Solver iterations for logistic regression
    pub max_iterations: u64,
    /// Depth limit for decision trees, unlimited when `None`
    pub max_depth: Option<usize>,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            max_iterations: 100,
            max_depth: None,
        }
    }
}

/// Fit the configured classifier on `dataset`.
pub fn fit(dataset: &Dataset, options: &TrainOptions) -> Result<MLModel> {
    let n_features = dataset.nfeatures();
    if dataset.nsamples() == 0 || n_features == 0 {
        return Err(ModelError::Dataset(format!(
            "cannot fit on a {}x{} dataset",
            dataset.nsamples(),
            n_features
        )));
    }

    let mut classes: Vec<usize> = dataset.targets().iter().copied().collect();
    classes.sort_unstable();
    classes.dedup();

    let t0 = std::time::Instant::now();
    let model = match options.algorithm {
        Algorithm::LogisticRegression => {
            if classes.len() != 2 {
                return Err(ModelError::Fit(format!(
                    "logistic regression needs exactly two classes, got {}",
                    classes.len()
                )));
            }
            let model = LogisticRegression::<f64>::default()
                .max_iterations(options.max_iterations)
                .fit(dataset)
                .map_err(|e| ModelError::Fit(e.to_string()))?;
            MLModel::LogisticRegression(ModelWithMeta {
                model,
                n_features,
                classes,
            })
        }
        Algorithm::DecisionTree => {
            let model = DecisionTree::params()
                .max_depth(options.max_depth)
                .fit(dataset)
                .map_err(|e| ModelError::Fit(e.to_string()))?;
            MLModel::DecisionTree(ModelWithMeta {
                model,
                n_features,
                classes,
            })
        }
        Algorithm::GaussianNaiveBayes => {
            let model = GaussianNb::params()
                .fit(dataset)
                .map_err(|e| ModelError::Fit(e.to_string()))?;
            MLModel::GaussianNaiveBayes(ModelWithMeta {
                model,
                n_features,
                classes,
            })
        }
    };
    tracing::debug!(elapsed = ?t0.elapsed(), model = %model, "Fit model");

    Ok(model)
}

/// Classification accuracy metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Accuracy score (0.0 to 1.0)
    pub accuracy: f64,
    pub correct_count: usize,
    pub total_count: usize,
}

/// Score `model` against the labels of `dataset`.
pub fn accuracy(model: &dyn Predictor, dataset: &Dataset) -> Result<AccuracyMetrics> {
    let predictions = model.predict(dataset.records().to_owned())?;
    let total_count = predictions.len();
    if total_count == 0 {
        return Err(ModelError::Dataset("no records to score".to_string()));
    }

    let correct_count = predictions
        .iter()
        .zip(dataset.targets().iter())
        .filter(|(predicted, actual)| predicted == actual)
        .count();

    Ok(AccuracyMetrics {
        accuracy: correct_count as f64 / total_count as f64,
        correct_count,
        total_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert!("random-forest".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_algorithm_serde_matches_cli_names() {
        let json = serde_json::to_string(&Algorithm::GaussianNaiveBayes).unwrap();
        assert_eq!(json, "\"gaussian-nb\"");
        let json = serde_json::to_string(&Algorithm::LogisticRegression).unwrap();
        assert_eq!(json, "\"logistic-regression\"");
    }

    #[test]
    fn test_default_options() {
        let options = TrainOptions::default();
        assert_eq!(options.algorithm, Algorithm::LogisticRegression);
        assert_eq!(options.max_iterations, 100);
        assert!(options.max_depth.is_none());
    }
}
