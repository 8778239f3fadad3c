//! Random forest of decision trees on bootstrap samples.
//!
//! Trees are grown concurrently on a dedicated worker pool sized from the
//! evaluation's parallelism argument (negative values select the fixed
//! [`crate::WORKER_CAP`]). Per-tree RNG streams are derived from the base
//! seed plus the tree index, so results are independent of scheduling order.

use linkbench_core::{LinkBenchError, Result};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::effective_workers;
use crate::tree::{DecisionTree, TreeParams};

/// Forest hyperparameters.
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    /// Number of trees.
    pub n_estimators: usize,
    /// Depth limit per tree; `None` grows trees fully.
    pub max_depth: Option<usize>,
    /// Minimum rows required to attempt a split.
    pub min_samples_split: usize,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// A fitted forest.
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree>,
}

impl RandomForestClassifier {
    /// Fit on raw (unscaled) features and 0/1 labels.
    ///
    /// `seed` drives bootstrap sampling and per-split feature subsampling;
    /// `n_jobs` bounds the worker pool.
    pub fn fit(
        x: &Array2<f64>,
        y: &[i64],
        config: &RandomForestConfig,
        seed: u64,
        n_jobs: i32,
    ) -> Result<Self> {
        let n = x.nrows();
        let targets: Vec<f64> = y.iter().map(|&l| l as f64).collect();

        let mtry = (x.ncols() as f64).sqrt().round().max(1.0) as usize;
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            max_features: Some(mtry.min(x.ncols())),
        };

        let workers = effective_workers(n_jobs).min(config.n_estimators).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| LinkBenchError::Config(format!("worker pool: {e}")))?;

        let trees: Vec<DecisionTree> = pool.install(|| {
            (0..config.n_estimators)
                .into_par_iter()
                .map(|t| {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(t as u64));
                    let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                    DecisionTree::fit(x, &targets, None, &rows, &params, &mut rng)
                })
                .collect()
        });

        Ok(Self { trees })
    }

    /// Positive-class probability per row: the mean leaf value across trees.
    #[must_use]
    pub fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        let n_trees = self.trees.len().max(1) as f64;
        (0..x.nrows())
            .map(|i| {
                let row = x.row(i);
                self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>() / n_trees
            })
            .collect()
    }
}
