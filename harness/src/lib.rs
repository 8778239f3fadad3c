//! linkbench evaluation harness
//!
//! Glues the core types and classifier implementations into the full
//! pipeline: load a network's precomputed feature arrays according to a
//! feature-set policy, split, fit, score held-out AUC, and persist the
//! result idempotently. The [`runner`] module expands many
//! (network, feature-set) combinations into independent units and executes
//! them sequentially or on a bounded worker pool.
//!
//! # Modules
//!
//! - [`npy`] — minimal reader/writer for 1-D NPY arrays
//! - [`dataset`] — per-network feature matrix and label loading
//! - [`split`] — seeded train/test partitioning
//! - [`evaluate`] — per-combination fit-and-score
//! - [`cache`] — idempotent result artifacts
//! - [`runner`] — batch driver with progress reporting and failure policy

pub mod cache;
pub mod dataset;
pub mod evaluate;
pub mod npy;
pub mod runner;
pub mod split;

/// Re-export commonly used types for harness consumers.
pub mod prelude {
    pub use crate::cache::{ResultCache, ResultKey};
    pub use crate::dataset::{FeatureMatrix, LoadedDataset};
    pub use crate::evaluate::evaluate;
    pub use crate::runner::{
        BatchOutcome, DatasetSource, EvalUnit, FailurePolicy, FsSource, UnitStatus,
    };
    pub use linkbench_core::{Classifier, EvalConfig, FeatureSet, LinkBenchError, Result};
}
