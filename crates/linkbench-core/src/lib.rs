//! Core types, configuration, and errors for linkbench
//!
//! This crate contains the foundational types shared across all linkbench
//! components: the feature-set selection policies, the classifier variants,
//! the evaluation configuration, and the common error type.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Feature naming convention
// ---------------------------------------------------------------------------

/// The four static structural-similarity feature files.
pub const STATIC_FEATURES: [&str; 4] = ["aa.npy", "cn.npy", "jc.npy", "pa.npy"];

/// Filename prefix marking node-activity features.
pub const NODE_ACTIVITY_PREFIX: &str = "na";

/// Filename substring marking features aggregated with the 100th percentile.
pub const QUANTILE_100_MARKER: &str = "_q100";

// ---------------------------------------------------------------------------
// Feature-set policies
// ---------------------------------------------------------------------------

/// A named policy selecting which precomputed feature arrays participate in
/// a classifier's input matrix.
///
/// Each variant maps to a filename-inclusion predicate over the fixed naming
/// convention: four static structural features ([`STATIC_FEATURES`]),
/// node-activity features (prefixed with [`NODE_ACTIVITY_PREFIX`]), and
/// quantile-100 aggregates (containing [`QUANTILE_100_MARKER`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureSet {
    /// Static structural features only.
    I,
    /// Temporal features with past-event aggregation: everything that is not
    /// a node-activity feature.
    IIA,
    /// Temporal features without past-event aggregation: static features or
    /// quantile-100 aggregates, excluding node-activity features.
    IIB,
    /// Node-activity features with past-event aggregation.
    IIIA,
    /// Node-activity features without past-event aggregation: node-activity
    /// features restricted to quantile-100 aggregates.
    IIIB,
    /// Union of I, II-A, and III-A.
    ///
    /// The third disjunct ("not node-activity") already covers the complement
    /// of the first, so this predicate accepts every filename. The upstream
    /// experiments were published with this behavior, so it is preserved
    /// exactly; see the tautology test below.
    Combined,
}

impl FeatureSet {
    /// All six policies, in their canonical order.
    pub const ALL: [FeatureSet; 6] = [
        Self::I,
        Self::IIA,
        Self::IIB,
        Self::IIIA,
        Self::IIIB,
        Self::Combined,
    ];

    /// Whether a feature file with this name participates in the matrix.
    ///
    /// Pure and total: any string maps to a boolean.
    #[must_use]
    pub fn selects(&self, filename: &str) -> bool {
        let is_static = STATIC_FEATURES.contains(&filename);
        let is_node_activity = filename.starts_with(NODE_ACTIVITY_PREFIX);
        let is_q100 = filename.contains(QUANTILE_100_MARKER);

        match self {
            Self::I => is_static,
            Self::IIA => !is_node_activity,
            Self::IIB => (is_static || is_q100) && !is_node_activity,
            Self::IIIA => is_node_activity,
            Self::IIIB => is_node_activity && is_q100,
            Self::Combined => is_node_activity || is_static || !is_node_activity,
        }
    }
}

impl std::fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::I => write!(f, "I"),
            Self::IIA => write!(f, "II-A"),
            Self::IIB => write!(f, "II-B"),
            Self::IIIA => write!(f, "III-A"),
            Self::IIIB => write!(f, "III-B"),
            Self::Combined => write!(f, "I+II-A+III-A"),
        }
    }
}

impl std::str::FromStr for FeatureSet {
    type Err = LinkBenchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "I" => Ok(Self::I),
            "II-A" => Ok(Self::IIA),
            "II-B" => Ok(Self::IIB),
            "III-A" => Ok(Self::IIIA),
            "III-B" => Ok(Self::IIIB),
            "I+II-A+III-A" => Ok(Self::Combined),
            _ => Err(LinkBenchError::Config(format!(
                "feature set not recognized: {s}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier variants
// ---------------------------------------------------------------------------

/// The classifier fitted on a feature matrix.
///
/// A closed set of variants, each with its own fixed preprocessing and
/// fitting recipe; selection is by exhaustive pattern match in the evaluator.
/// The `Display` form is part of the on-disk contract: it names the result
/// artifact for a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classifier {
    /// Standardize features (fit on train only), then an L2-regularized
    /// logistic classifier with a generous iteration cap.
    LogisticRegression,
    /// An ensemble of gini decision trees on bootstrap samples, built in
    /// parallel; no preprocessing.
    RandomForest,
    /// Gradient-boosted trees with the log-loss objective; no preprocessing.
    XGBoost,
}

impl std::fmt::Display for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LogisticRegression => write!(f, "LogisticRegression"),
            Self::RandomForest => write!(f, "RandomForest"),
            Self::XGBoost => write!(f, "XGBoost"),
        }
    }
}

impl std::str::FromStr for Classifier {
    type Err = LinkBenchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "LogisticRegression" => Ok(Self::LogisticRegression),
            "RandomForest" => Ok(Self::RandomForest),
            "XGBoost" => Ok(Self::XGBoost),
            _ => Err(LinkBenchError::Config(format!(
                "invalid classifier: {s}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Evaluation configuration.
///
/// Replaces the compiled-in path template and exclusion list of the original
/// experiments with explicit, overridable settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Root directory holding one subdirectory per network, named by
    /// zero-padded two-digit ID.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
    /// Network IDs excluded from full-batch runs.
    #[serde(default = "default_excluded_networks")]
    pub excluded_networks: Vec<u32>,
    /// The fixed list of discrete-network IDs.
    #[serde(default = "default_discrete_networks")]
    pub discrete_networks: Vec<u32>,
    /// Highest network ID considered by full-batch runs (IDs start at 1).
    #[serde(default = "default_max_network")]
    pub max_network: u32,
    /// Fraction of rows held out for testing.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
}

fn default_data_root() -> PathBuf {
    PathBuf::from("./data")
}

fn default_excluded_networks() -> Vec<u32> {
    vec![5, 15, 17, 26, 27]
}

fn default_discrete_networks() -> Vec<u32> {
    vec![18, 20, 21, 9, 4, 8, 24, 16, 11, 10]
}

fn default_max_network() -> u32 {
    30
}

fn default_test_fraction() -> f64 {
    0.25
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            excluded_networks: default_excluded_networks(),
            discrete_networks: default_discrete_networks(),
            max_network: default_max_network(),
            test_fraction: default_test_fraction(),
        }
    }
}

impl EvalConfig {
    /// Directory of one network: `<data_root>/<id:02>`.
    #[must_use]
    pub fn network_dir(&self, network: u32) -> PathBuf {
        self.data_root.join(format!("{network:02}"))
    }

    /// All network IDs covered by a full-batch run, in ascending order:
    /// `1..=max_network` minus the exclusion list.
    #[must_use]
    pub fn batch_networks(&self) -> Vec<u32> {
        (1..=self.max_network)
            .filter(|id| !self.excluded_networks.contains(id))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Core error types.
#[derive(thiserror::Error, Debug)]
pub enum LinkBenchError {
    /// Unrecognized feature set, classifier, or invalid settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or malformed on-disk data.
    #[error("Data error: {0}")]
    Data(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization / deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for `std::result::Result<T, LinkBenchError>`.
pub type Result<T> = std::result::Result<T, LinkBenchError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
