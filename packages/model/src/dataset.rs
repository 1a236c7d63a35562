//! Labeled datasets for the trainer: seeded synthesis or CSV files.

use crate::error::{ModelError, Result};
use linfa::DatasetBase;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// Labeled samples with one class label per row
pub type Dataset = DatasetBase<Array2<f64>, Array1<usize>>;

/// Generate a reproducible two-class dataset.
///
/// Class 0 is centred on a random vertex of the `[-1, 1]` hypercube and class 1
/// on its mirror image; every feature gets uniform noise in `[-1, 1)`. Labels
/// alternate so the classes stay balanced, then rows are shuffled.
pub fn make_classification(
    n_samples: usize,
    n_features: usize,
    seed: u64,
) -> Result<Dataset> {
    if n_samples < 2 {
        return Err(ModelError::Dataset(format!(
            "need at least 2 samples for two classes, got {n_samples}"
        )));
    }
    if n_features == 0 {
        return Err(ModelError::Dataset("need at least 1 feature".to_string()));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let vertex: Vec<f64> = (0..n_features)
        .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
        .collect();

    let mut rows: Vec<(Vec<f64>, usize)> = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let label = i % 2;
        let sign = if label == 0 { 1.0 } else { -1.0 };
        let mut row = Vec::with_capacity(n_features);
        for center in &vertex {
            row.push(sign * center + rng.gen_range(-1.0_f64..1.0));
        }
        rows.push((row, label));
    }
    rows.shuffle(&mut rng);

    let mut flat = Vec::with_capacity(n_samples * n_features);
    let mut targets = Vec::with_capacity(n_samples);
    for (row, label) in rows {
        flat.extend(row);
        targets.push(label);
    }

    let records = Array2::from_shape_vec((n_samples, n_features), flat)?;
    Ok(DatasetBase::new(records, Array1::from(targets)))
}

/// Load a dataset from CSV: numeric feature columns followed by an integer
/// label in the last column.
pub fn load_csv(path: impl AsRef<Path>, has_headers: bool) -> Result<Dataset> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ModelError::Dataset(format!("{}: {}", path.display(), e)))?;

    let mut cols: Option<usize> = None;
    let mut flat = Vec::new();
    let mut targets = Vec::new();

    for (r, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ModelError::Dataset(format!("Row {r}: {e}")))?;
        let fields: Vec<&str> = record.iter().collect();
        let Some((label, features)) = fields.split_last() else {
            continue;
        };

        if features.is_empty() {
            return Err(ModelError::Dataset(format!(
                "Row {r}: expected at least one feature column before the label"
            )));
        }
        let expected = *cols.get_or_insert(features.len());
        if features.len() != expected {
            return Err(ModelError::Dataset(format!(
                "Row {r}: inconsistent length (expected {expected}, got {})",
                features.len()
            )));
        }

        for (j, field) in features.iter().enumerate() {
            let value: f64 = field.parse().map_err(|_| {
                ModelError::Dataset(format!("Row {r}, col {j}: failed to load `{field}` as f64"))
            })?;
            flat.push(value);
        }
        let label: usize = label.parse().map_err(|_| {
            ModelError::Dataset(format!(
                "Row {r}: label `{label}` is not a non-negative integer"
            ))
        })?;
        targets.push(label);
    }

    let Some(cols) = cols else {
        return Err(ModelError::Dataset(format!(
            "{} contains no records",
            path.display()
        )));
    };

    let records = Array2::from_shape_vec((targets.len(), cols), flat)?;
    Ok(DatasetBase::new(records, Array1::from(targets)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use linfa::prelude::Records;
    use std::io::Write;

    #[test]
    fn test_make_classification_shape() {
        let ds = make_classification(100, 4, 42).unwrap();
        assert_eq!(ds.nsamples(), 100);
        assert_eq!(ds.nfeatures(), 4);
        assert_eq!(ds.targets().iter().filter(|&&l| l == 0).count(), 50);
        assert_eq!(ds.targets().iter().filter(|&&l| l == 1).count(), 50);
    }

    #[test]
    fn test_make_classification_is_seeded() {
        let a = make_classification(20, 3, 7).unwrap();
        let b = make_classification(20, 3, 7).unwrap();
        let c = make_classification(20, 3, 8).unwrap();
        assert_eq!(a.records(), b.records());
        assert_eq!(a.targets(), b.targets());
        assert_ne!(a.records(), c.records());
    }

    #[test]
    fn test_make_classification_rejects_degenerate_sizes() {
        assert!(make_classification(1, 4, 0).is_err());
        assert!(make_classification(10, 0, 0).is_err());
    }

    #[test]
    fn test_load_csv_with_headers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a,b,label").unwrap();
        writeln!(file, "1.0, 2.0, 0").unwrap();
        writeln!(file, "3.5,4.5,1").unwrap();
        file.flush().unwrap();

        let ds = load_csv(file.path(), true).unwrap();
        assert_eq!(ds.records().shape(), &[2, 2]);
        assert_eq!(ds.records()[[1, 0]], 3.5);
        assert_eq!(ds.targets().to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_load_csv_rejects_bad_label() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1.0,2.0,-1").unwrap();
        file.flush().unwrap();

        let err = load_csv(file.path(), false).unwrap_err();
        assert!(err.to_string().contains("label"));
    }

    #[test]
    fn test_load_csv_rejects_non_numeric_feature() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1.0,abc,1").unwrap();
        file.flush().unwrap();

        let err = load_csv(file.path(), false).unwrap_err();
        assert!(err.to_string().contains("col 1"));
    }

    #[test]
    fn test_load_csv_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_csv(file.path(), false).is_err());
    }
}
