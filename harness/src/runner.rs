//! Batch driver: expands (network, feature-set) combinations into
//! independent units and executes them with progress reporting.
//!
//! Units share no mutable state; each loads its own data, fits its own
//! model, and writes its own artifact, so no cross-unit synchronization is
//! needed. Cancellation is not supported: a dispatched unit runs to
//! completion or returns an error, and under [`FailurePolicy::Abort`] the
//! parallel path reports the first error only after in-flight units finish.

use indicatif::ProgressBar;
use linkbench_core::{Classifier, EvalConfig, FeatureSet, LinkBenchError, Result};
use rayon::prelude::*;
use std::path::Path;

use crate::cache::{ResultCache, ResultKey};
use crate::dataset::{self, LoadedDataset};
use crate::evaluate::evaluate;

/// Where one unit's dataset comes from.
///
/// The filesystem implementation is the production path; tests substitute
/// counting or failing sources to pin caching and tolerance behavior.
pub trait DatasetSource: Sync {
    fn load(&self, directory: &Path, feature_set: FeatureSet) -> Result<Option<LoadedDataset>>;
}

/// Loads datasets from the network directory layout on disk.
pub struct FsSource;

impl DatasetSource for FsSource {
    fn load(&self, directory: &Path, feature_set: FeatureSet) -> Result<Option<LoadedDataset>> {
        dataset::load_network(directory, feature_set)
    }
}

/// What the batch does when a unit fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log a diagnostic naming the (network, feature-set) pair and continue.
    Tolerate,
    /// Stop at the first error.
    Abort,
}

/// One independent evaluation: a network crossed with a feature set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalUnit {
    pub network: u32,
    pub feature_set: FeatureSet,
}

/// How a single unit ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitStatus {
    /// Evaluated and persisted.
    Computed(f64),
    /// Artifact already present; nothing loaded or evaluated.
    SkippedCached,
    /// No feature data on disk; nothing persisted, retried on a later run.
    SkippedMissing,
}

/// Aggregate counts for a finished batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub computed: usize,
    pub skipped_cached: usize,
    pub skipped_missing: usize,
    pub failed: usize,
    pub finished_at: String,
}

/// Run one evaluation unit end to end.
///
/// The artifact check happens before any data is loaded, which is what
/// makes re-runs cheap: a present artifact short-circuits the whole unit.
pub fn run_unit(
    source: &dyn DatasetSource,
    cache: &ResultCache,
    config: &EvalConfig,
    unit: EvalUnit,
    classifier: Classifier,
    random_state: u64,
    n_jobs: i32,
) -> Result<UnitStatus> {
    let key = ResultKey {
        network: unit.network,
        feature_set: unit.feature_set,
        classifier,
    };

    let directory = config.network_dir(unit.network);
    std::fs::create_dir_all(&directory)?;

    if cache.contains(&key) {
        tracing::info!(%key, "result artifact exists, skipping");
        return Ok(UnitStatus::SkippedCached);
    }

    let Some(loaded) = source.load(&directory, unit.feature_set)? else {
        tracing::info!(%key, "no feature data, nothing persisted");
        return Ok(UnitStatus::SkippedMissing);
    };

    let auc = evaluate(
        &loaded.features.data,
        &loaded.labels,
        classifier,
        random_state,
        n_jobs,
        config.test_fraction,
    )?;
    cache.store(&key, auc)?;
    tracing::info!(%key, auc, "evaluated");
    Ok(UnitStatus::Computed(auc))
}

/// Run a batch of units with the requested parallelism and failure policy.
///
/// `n_jobs` of 0 or 1 runs sequentially; any negative value or a value
/// greater than 1 selects a bounded worker pool (negative = one worker per
/// available core). Both paths report progress per completed unit.
#[allow(clippy::too_many_arguments)]
pub fn run_batch(
    source: &dyn DatasetSource,
    cache: &ResultCache,
    config: &EvalConfig,
    units: &[EvalUnit],
    classifier: Classifier,
    random_state: u64,
    n_jobs: i32,
    policy: FailurePolicy,
) -> Result<BatchOutcome> {
    let bar = ProgressBar::new(units.len() as u64);
    let mut outcome = BatchOutcome {
        computed: 0,
        skipped_cached: 0,
        skipped_missing: 0,
        failed: 0,
        finished_at: String::new(),
    };

    let parallel = n_jobs < 0 || n_jobs > 1;
    if parallel {
        let threads = if n_jobs < 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            n_jobs as usize
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .build()
            .map_err(|e| LinkBenchError::Config(format!("worker pool: {e}")))?;

        let results: Vec<(EvalUnit, Result<UnitStatus>)> = pool.install(|| {
            units
                .par_iter()
                .map(|&unit| {
                    let result =
                        run_unit(source, cache, config, unit, classifier, random_state, n_jobs);
                    bar.inc(1);
                    (unit, result)
                })
                .collect()
        });

        for (unit, result) in results {
            match result {
                Ok(status) => tally(&mut outcome, status),
                Err(e) => {
                    if policy == FailurePolicy::Abort {
                        bar.finish_and_clear();
                        return Err(e);
                    }
                    warn_failed(unit, &e);
                    outcome.failed += 1;
                }
            }
        }
    } else {
        for &unit in units {
            let result = run_unit(source, cache, config, unit, classifier, random_state, n_jobs);
            bar.inc(1);
            match result {
                Ok(status) => tally(&mut outcome, status),
                Err(e) => {
                    if policy == FailurePolicy::Abort {
                        bar.finish_and_clear();
                        return Err(e);
                    }
                    warn_failed(unit, &e);
                    outcome.failed += 1;
                }
            }
        }
    }

    bar.finish_and_clear();
    outcome.finished_at = chrono::Utc::now().to_rfc3339();
    tracing::info!(
        computed = outcome.computed,
        skipped_cached = outcome.skipped_cached,
        skipped_missing = outcome.skipped_missing,
        failed = outcome.failed,
        finished_at = %outcome.finished_at,
        "batch finished"
    );
    Ok(outcome)
}

fn tally(outcome: &mut BatchOutcome, status: UnitStatus) {
    match status {
        UnitStatus::Computed(_) => outcome.computed += 1,
        UnitStatus::SkippedCached => outcome.skipped_cached += 1,
        UnitStatus::SkippedMissing => outcome.skipped_missing += 1,
    }
}

fn warn_failed(unit: EvalUnit, error: &LinkBenchError) {
    tracing::warn!(
        network = unit.network,
        feature_set = %unit.feature_set,
        %error,
        "could not evaluate, continuing"
    );
}
