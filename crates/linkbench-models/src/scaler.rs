//! Per-column standardization (zero mean, unit variance).

use ndarray::{Array2, Axis};

/// Column-wise standardizer fitted on training rows only.
///
/// Constant columns keep a scale of 1.0 so they pass through as zeros
/// instead of producing NaNs.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit per-column mean and standard deviation (population variance).
    #[must_use]
    pub fn fit(x: &Array2<f64>) -> Self {
        let n = x.nrows() as f64;
        let mut mean = Vec::with_capacity(x.ncols());
        let mut scale = Vec::with_capacity(x.ncols());

        for column in x.axis_iter(Axis(1)) {
            let m = column.sum() / n;
            let var = column.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
            let sd = var.sqrt();
            mean.push(m);
            scale.push(if sd > 0.0 { sd } else { 1.0 });
        }

        Self { mean, scale }
    }

    /// Apply the fitted transform to a matrix with the same column layout.
    #[must_use]
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = x.clone();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let m = self.mean[j];
            let s = self.scale[j];
            column.mapv_inplace(|v| (v - m) / s);
        }
        out
    }
}
