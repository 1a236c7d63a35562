//! Tests for fitting, persisting and predicting with MLModels

#[cfg(test)]
mod tests {
    use crate::dataset::make_classification;
    use crate::ml::{ARTIFACT_VERSION, seal};
    use crate::{
        Algorithm, MLModel, ModelError, Predictor, TrainOptions, accuracy, fit, read_artifact,
        write_artifact,
    };

    fn train(algorithm: Algorithm) -> MLModel {
        let dataset = make_classification(100, 4, 42).unwrap();
        let options = TrainOptions {
            algorithm,
            ..Default::default()
        };
        fit(&dataset, &options).unwrap()
    }

    // ============================================================================
    // Fitting
    // ============================================================================

    #[test]
    fn test_fit_all_algorithms() {
        let dataset = make_classification(100, 4, 42).unwrap();
        for algorithm in Algorithm::ALL {
            let model = train(algorithm);
            assert_eq!(model.n_features(), 4);
            assert_eq!(model.classes(), &[0, 1]);

            let metrics = accuracy(&model, &dataset).unwrap();
            assert_eq!(metrics.total_count, 100);
            assert!(
                metrics.accuracy >= 0.8,
                "{algorithm} only reached {:.2} training accuracy",
                metrics.accuracy
            );
        }
    }

    #[test]
    fn test_logistic_regression_needs_two_classes() {
        let dataset = make_classification(10, 2, 1).unwrap();
        let single_class = dataset.map_targets(|_| 0usize);
        let err = fit(&single_class, &TrainOptions::default()).unwrap_err();
        assert!(matches!(err, ModelError::Fit(_)));
    }

    #[test]
    fn test_model_display() {
        let model = train(Algorithm::LogisticRegression);
        assert!(format!("{}", model).contains("Logistic Regression"));
        assert_eq!(model.kind(), "LogisticRegression");
    }

    // ============================================================================
    // Prediction
    // ============================================================================

    #[test]
    fn test_predict_one_is_binary_and_deterministic() {
        for algorithm in Algorithm::ALL {
            let model = train(algorithm);
            let first = model.predict_one(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
            let second = model.predict_one(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
            assert!(first == 0 || first == 1);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_predict_one_dimension_mismatch() {
        let model = train(Algorithm::DecisionTree);
        let err = model.predict_one(vec![0.1, 0.2]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::DimensionMismatch {
                expected: 4,
                got: 2
            }
        ));
        assert_eq!(err.to_string(), "expected 4 features, got 2");
    }

    #[test]
    fn test_predict_one_empty_input() {
        let model = train(Algorithm::GaussianNaiveBayes);
        let err = model.predict_one(vec![]).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { got: 0, .. }));
    }

    #[test]
    fn test_predict_batch_rejects_wrong_width() {
        let model = train(Algorithm::LogisticRegression);
        let records = ndarray::Array2::<f64>::zeros((3, 5));
        assert!(model.predict(records).is_err());
    }

    // ============================================================================
    // Artifact round trips
    // ============================================================================

    #[test]
    fn test_artifact_round_trip_preserves_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.clf");
        let dataset = make_classification(100, 4, 42).unwrap();

        for algorithm in Algorithm::ALL {
            let model = train(algorithm);
            write_artifact(&model, &path).unwrap();
            let restored = read_artifact(&path).unwrap();

            assert_eq!(restored.model_type(), model.model_type());
            assert_eq!(restored.n_features(), 4);
            assert_eq!(
                restored.predict(dataset.records().to_owned()).unwrap(),
                model.predict(dataset.records().to_owned()).unwrap()
            );
        }
        assert!(!dir.path().join("nested").join("model.clf.tmp").exists());
    }

    #[test]
    fn test_artifact_overwrites_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.clf");

        write_artifact(&train(Algorithm::DecisionTree), &path).unwrap();
        write_artifact(&train(Algorithm::GaussianNaiveBayes), &path).unwrap();

        let restored = read_artifact(&path).unwrap();
        assert!(matches!(restored, MLModel::GaussianNaiveBayes(_)));
    }

    #[test]
    fn test_unsupported_envelope_version() {
        let model = train(Algorithm::DecisionTree);
        let payload = rmp_serde::to_vec_named(&model).unwrap();
        let bytes = seal(ARTIFACT_VERSION + 1, model.model_type(), payload).unwrap();

        let err = MLModel::from_fory_slice(&bytes).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedVersion(v) if v == ARTIFACT_VERSION + 1));
    }

    #[test]
    fn test_envelope_type_mismatch() {
        let model = train(Algorithm::DecisionTree);
        let payload = rmp_serde::to_vec_named(&model).unwrap();
        let bytes = seal(ARTIFACT_VERSION, "LogisticRegression", payload).unwrap();

        let err = MLModel::from_fory_slice(&bytes).unwrap_err();
        assert!(matches!(err, ModelError::Decode(_)));
    }

    #[test]
    fn test_garbage_payload() {
        let bytes = seal(ARTIFACT_VERSION, "DecisionTree", vec![0xc1, 0x00, 0xff]).unwrap();
        assert!(matches!(
            MLModel::from_fory_slice(&bytes),
            Err(ModelError::Decode(_))
        ));
    }

    #[test]
    fn test_truncated_artifact_is_decode_error() {
        for algorithm in Algorithm::ALL {
            let bytes = train(algorithm).to_fory_vec().unwrap();
            for len in 0..bytes.len() {
                assert!(
                    matches!(
                        MLModel::from_fory_slice(&bytes[..len]),
                        Err(ModelError::Decode(_))
                    ),
                    "{algorithm}: prefix of {len}/{} bytes decoded",
                    bytes.len()
                );
            }
        }
    }
}
