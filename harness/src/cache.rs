//! Idempotent result artifacts.
//!
//! Each (network, feature-set, classifier) combination maps to exactly one
//! file; its presence marks the combination as already evaluated, and its
//! content is the AUC as plain decimal text. Artifacts are written once and
//! never mutated.

use linkbench_core::{Classifier, FeatureSet, Result};
use std::path::PathBuf;

/// Subdirectory of a network directory that holds result artifacts.
pub const PROPERTIES_DIR: &str = "properties";

/// The key of one evaluation combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultKey {
    pub network: u32,
    pub feature_set: FeatureSet,
    pub classifier: Classifier,
}

impl ResultKey {
    /// Artifact file name: `<feature_set>_<classifier>.float`.
    #[must_use]
    pub fn artifact_name(&self) -> String {
        format!("{}_{}.float", self.feature_set, self.classifier)
    }
}

impl std::fmt::Display for ResultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "network {:02}, feature set {}, classifier {}",
            self.network, self.feature_set, self.classifier
        )
    }
}

/// Filesystem-backed result store rooted at the data directory.
#[derive(Debug, Clone)]
pub struct ResultCache {
    data_root: PathBuf,
}

impl ResultCache {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    /// Deterministic artifact path for a key:
    /// `<data_root>/<network:02>/properties/<feature_set>_<classifier>.float`.
    #[must_use]
    pub fn path(&self, key: &ResultKey) -> PathBuf {
        self.data_root
            .join(format!("{:02}", key.network))
            .join(PROPERTIES_DIR)
            .join(key.artifact_name())
    }

    /// Whether the key's artifact already exists on disk.
    #[must_use]
    pub fn contains(&self, key: &ResultKey) -> bool {
        self.path(key).is_file()
    }

    /// Persist a computed AUC, creating the properties directory on demand.
    pub fn store(&self, key: &ResultKey, auc: f64) -> Result<()> {
        let path = self.path(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, format!("{auc}"))?;
        Ok(())
    }

    /// Read a previously stored AUC, if present and parseable.
    #[must_use]
    pub fn load(&self, key: &ResultKey) -> Option<f64> {
        let content = std::fs::read_to_string(self.path(key)).ok()?;
        content.trim().parse().ok()
    }
}
