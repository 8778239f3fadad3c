//! Classifier implementations and ranking metrics for linkbench
//!
//! Three classifier recipes, each deterministic under an explicit seed:
//!
//! - [`logistic`] — L2-regularized logistic regression trained by full-batch
//!   gradient descent, paired with [`scaler::StandardScaler`].
//! - [`forest`] — random forest of binary decision trees on bootstrap
//!   samples with sqrt-feature subsampling, built on a bounded worker pool.
//! - [`boosting`] — gradient-boosted trees with the logistic (log-loss)
//!   objective.
//!
//! [`metrics`] provides the ROC AUC computation used to score all of them.

pub mod boosting;
pub mod forest;
pub mod logistic;
pub mod metrics;
pub mod scaler;
pub mod tree;

pub use boosting::{GradientBoostingClassifier, GradientBoostingConfig};
pub use forest::{RandomForestClassifier, RandomForestConfig};
pub use logistic::{LogisticRegressionClassifier, LogisticRegressionConfig};
pub use metrics::roc_auc_score;
pub use scaler::StandardScaler;

/// Worker count used by the tree ensembles when the parallelism argument is
/// the "all cores" sentinel (any negative value).
///
/// The upstream experiments capped the sentinel at this fixed constant
/// instead of querying the actual core count; changing it would silently
/// change resource consumption on large machines, so it is kept as-is.
pub const WORKER_CAP: usize = 100;

/// Map the signed parallelism argument to an effective worker count.
///
/// Negative values select [`WORKER_CAP`]; zero is treated as one worker.
#[must_use]
pub fn effective_workers(n_jobs: i32) -> usize {
    if n_jobs < 0 {
        WORKER_CAP
    } else {
        (n_jobs as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_n_jobs_maps_to_the_cap() {
        assert_eq!(effective_workers(-1), WORKER_CAP);
        assert_eq!(effective_workers(-8), WORKER_CAP);
    }

    #[test]
    fn non_negative_n_jobs_pass_through() {
        assert_eq!(effective_workers(0), 1);
        assert_eq!(effective_workers(1), 1);
        assert_eq!(effective_workers(4), 4);
    }
}
