//! L2-regularized logistic regression trained by full-batch gradient descent.
//!
//! The iteration cap is deliberately generous so training runs to
//! convergence on standardized inputs, mirroring the upstream experiment
//! settings. The `n_jobs` argument of the evaluation pipeline does not apply
//! here; binary logistic fitting is single-threaded.

use ndarray::{Array2, ArrayView1};

/// Training hyperparameters.
#[derive(Debug, Clone)]
pub struct LogisticRegressionConfig {
    /// Maximum gradient-descent iterations.
    pub max_iter: usize,
    /// Step size.
    pub learning_rate: f64,
    /// L2 penalty on the weights (not the intercept).
    pub l2: f64,
    /// Stop early once the gradient max-norm falls below this.
    pub tol: f64,
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            learning_rate: 0.1,
            l2: 1e-4,
            tol: 1e-6,
        }
    }
}

/// A fitted logistic model: one weight per column plus an intercept.
#[derive(Debug, Clone)]
pub struct LogisticRegressionClassifier {
    weights: Vec<f64>,
    intercept: f64,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegressionClassifier {
    /// Fit on standardized features and 0/1 labels.
    #[must_use]
    pub fn fit(x: &Array2<f64>, y: &[i64], config: &LogisticRegressionConfig) -> Self {
        let n = x.nrows();
        let d = x.ncols();
        let inv_n = 1.0 / n.max(1) as f64;

        let mut weights = vec![0.0f64; d];
        let mut intercept = 0.0f64;

        for _ in 0..config.max_iter {
            // Residuals p - y for the current parameters
            let mut residuals = Vec::with_capacity(n);
            for i in 0..n {
                let z = dot(x.row(i), &weights) + intercept;
                residuals.push(sigmoid(z) - y[i] as f64);
            }

            let mut grad_w = vec![0.0f64; d];
            let mut grad_b = 0.0f64;
            for (i, r) in residuals.iter().enumerate() {
                grad_b += r;
                let row = x.row(i);
                for (j, g) in grad_w.iter_mut().enumerate() {
                    *g += r * row[j];
                }
            }
            grad_b *= inv_n;
            let mut max_norm = grad_b.abs();
            for (j, g) in grad_w.iter_mut().enumerate() {
                *g = *g * inv_n + config.l2 * weights[j];
                max_norm = max_norm.max(g.abs());
            }

            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= config.learning_rate * g;
            }
            intercept -= config.learning_rate * grad_b;

            if max_norm < config.tol {
                break;
            }
        }

        Self { weights, intercept }
    }

    /// Positive-class probability for each row.
    #[must_use]
    pub fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        (0..x.nrows())
            .map(|i| sigmoid(dot(x.row(i), &self.weights) + self.intercept))
            .collect()
    }
}

fn dot(row: ArrayView1<f64>, weights: &[f64]) -> f64 {
    row.iter().zip(weights).map(|(a, b)| a * b).sum()
}
