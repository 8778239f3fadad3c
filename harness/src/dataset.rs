//! Per-network dataset loading.
//!
//! A network directory holds `features/` (one 1-D NPY array per feature,
//! aligned by row index) and `samples.json` (the label vector). The loader
//! filters the feature files through a feature-set predicate and
//! column-stacks the survivors into a matrix.

use linkbench_core::{FeatureSet, LinkBenchError, Result};
use ndarray::Array2;
use std::path::Path;

use crate::npy;

/// Label file name inside a network directory.
pub const LABEL_FILE: &str = "samples.json";

/// Feature subdirectory name inside a network directory.
pub const FEATURE_DIR: &str = "features";

/// Named feature columns, row-aligned with the label vector.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// Column names (the selected filenames), sorted for determinism.
    pub names: Vec<String>,
    /// Row-major sample × feature matrix.
    pub data: Array2<f64>,
}

/// A fully loaded network dataset.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub features: FeatureMatrix,
    pub labels: Vec<i64>,
}

/// Load one network directory through a feature-set predicate.
///
/// Returns `Ok(None)` when the `features/` subdirectory is absent — the
/// caller must treat this as "nothing to evaluate" and persist no result.
/// A missing network directory or label file is an error, as is any
/// feature/label length mismatch.
pub fn load_network(directory: &Path, feature_set: FeatureSet) -> Result<Option<LoadedDataset>> {
    if !directory.is_dir() {
        return Err(LinkBenchError::Data(format!(
            "missing network directory {}",
            directory.display()
        )));
    }

    let feature_dir = directory.join(FEATURE_DIR);
    if !feature_dir.is_dir() {
        tracing::debug!(directory = %directory.display(), "no feature directory, nothing to evaluate");
        return Ok(None);
    }

    let labels_path = directory.join(LABEL_FILE);
    if !labels_path.is_file() {
        return Err(LinkBenchError::Data(format!(
            "missing label file {}",
            labels_path.display()
        )));
    }

    let mut names: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(&feature_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if feature_set.selects(&name) {
            names.push(name);
        }
    }
    // Column order is not semantically significant; sort it for determinism.
    names.sort();

    for name in &names {
        tracing::debug!(feature = %name, "selected");
    }

    if names.is_empty() {
        return Err(LinkBenchError::Data(format!(
            "feature set {feature_set} selected no files in {}",
            feature_dir.display()
        )));
    }

    let labels = load_labels(&labels_path)?;

    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(names.len());
    for name in &names {
        let column = npy::read_npy_1d(&feature_dir.join(name))?;
        if column.len() != labels.len() {
            return Err(LinkBenchError::Data(format!(
                "feature {name} has {} rows but {} labels",
                column.len(),
                labels.len()
            )));
        }
        columns.push(column);
    }

    let n_rows = labels.len();
    let n_cols = columns.len();
    let mut data = Vec::with_capacity(n_rows * n_cols);
    for row in 0..n_rows {
        for column in &columns {
            data.push(column[row]);
        }
    }
    let data = Array2::from_shape_vec((n_rows, n_cols), data)
        .map_err(|e| LinkBenchError::Data(format!("feature matrix shape: {e}")))?;

    Ok(Some(LoadedDataset {
        features: FeatureMatrix { names, data },
        labels,
    }))
}

/// Read the label vector, coercing JSON numbers and booleans to integers.
fn load_labels(path: &Path) -> Result<Vec<i64>> {
    let content = std::fs::read_to_string(path)?;
    let raw: Vec<serde_json::Value> = serde_json::from_str(&content)?;
    raw.iter()
        .map(|value| match value {
            serde_json::Value::Bool(b) => Ok(i64::from(*b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(|f| f.trunc() as i64)
                .ok_or_else(|| LinkBenchError::Data(format!("non-finite label in {}", path.display()))),
            other => Err(LinkBenchError::Data(format!(
                "label entries must be numeric, got {other} in {}",
                path.display()
            ))),
        })
        .collect()
}
