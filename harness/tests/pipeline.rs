//! End-to-end pipeline tests over synthetic network directories.

use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use linkbench_core::{Classifier, EvalConfig, FeatureSet, Result};
use linkbench_harness::cache::{ResultCache, ResultKey, PROPERTIES_DIR};
use linkbench_harness::dataset::{LoadedDataset, FEATURE_DIR, LABEL_FILE};
use linkbench_harness::npy::write_npy_1d;
use linkbench_harness::runner::{self, DatasetSource, EvalUnit, FsSource, UnitStatus};
use tempfile::TempDir;

fn config_at(root: &TempDir) -> EvalConfig {
    EvalConfig {
        data_root: root.path().to_path_buf(),
        ..EvalConfig::default()
    }
}

/// Seed a network directory with one static and one node-activity feature.
fn seed_network(config: &EvalConfig, network: u32, rows: usize) {
    let dir = config.network_dir(network);
    let features = dir.join(FEATURE_DIR);
    std::fs::create_dir_all(&features).unwrap();

    let labels: Vec<i64> = (0..rows).map(|i| (i % 2) as i64).collect();
    let aa: Vec<f64> = labels.iter().map(|&l| l as f64 * 5.0).collect();
    let na: Vec<f64> = (0..rows).map(|i| i as f64).collect();

    write_npy_1d(&features.join("aa.npy"), &aa).unwrap();
    write_npy_1d(&features.join("na_x.npy"), &na).unwrap();
    let rendered: Vec<String> = labels.iter().map(i64::to_string).collect();
    std::fs::write(dir.join(LABEL_FILE), format!("[{}]", rendered.join(", "))).unwrap();
}

/// Wraps the filesystem source, counting how many loads actually happen.
struct CountingSource {
    inner: FsSource,
    loads: AtomicUsize,
}

impl CountingSource {
    fn new() -> Self {
        Self {
            inner: FsSource,
            loads: AtomicUsize::new(0),
        }
    }
}

impl DatasetSource for CountingSource {
    fn load(&self, directory: &Path, feature_set: FeatureSet) -> Result<Option<LoadedDataset>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(directory, feature_set)
    }
}

#[test]
fn single_evaluation_writes_a_parseable_artifact() {
    let root = TempDir::new().unwrap();
    let config = config_at(&root);
    seed_network(&config, 4, 16);
    let cache = ResultCache::new(config.data_root.clone());

    let unit = EvalUnit {
        network: 4,
        feature_set: FeatureSet::IIA,
    };
    let status = runner::run_unit(
        &FsSource,
        &cache,
        &config,
        unit,
        Classifier::LogisticRegression,
        42,
        1,
    )
    .unwrap();

    let UnitStatus::Computed(auc) = status else {
        panic!("expected a computed result, got {status:?}");
    };
    assert!((0.0..=1.0).contains(&auc));

    let key = ResultKey {
        network: 4,
        feature_set: FeatureSet::IIA,
        classifier: Classifier::LogisticRegression,
    };
    let content = std::fs::read_to_string(cache.path(&key)).unwrap();
    let stored: f64 = content.parse().unwrap();
    assert_eq!(stored, auc);
}

#[test]
fn second_invocation_skips_without_reloading() {
    let root = TempDir::new().unwrap();
    let config = config_at(&root);
    seed_network(&config, 7, 16);
    let cache = ResultCache::new(config.data_root.clone());
    let source = CountingSource::new();

    let unit = EvalUnit {
        network: 7,
        feature_set: FeatureSet::IIA,
    };
    let run = || {
        runner::run_unit(
            &source,
            &cache,
            &config,
            unit,
            Classifier::LogisticRegression,
            42,
            1,
        )
    };

    assert!(matches!(run().unwrap(), UnitStatus::Computed(_)));
    let key = ResultKey {
        network: 7,
        feature_set: FeatureSet::IIA,
        classifier: Classifier::LogisticRegression,
    };
    let first_content = std::fs::read_to_string(cache.path(&key)).unwrap();

    assert_eq!(run().unwrap(), UnitStatus::SkippedCached);
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    assert_eq!(
        std::fs::read_to_string(cache.path(&key)).unwrap(),
        first_content
    );
}

#[test]
fn feature_sets_pick_the_expected_columns() {
    let root = TempDir::new().unwrap();
    let config = config_at(&root);
    seed_network(&config, 9, 8);

    let dir = config.network_dir(9);
    let ds = linkbench_harness::dataset::load_network(&dir, FeatureSet::I)
        .unwrap()
        .unwrap();
    assert_eq!(ds.features.names, vec!["aa.npy"]);

    let ds = linkbench_harness::dataset::load_network(&dir, FeatureSet::IIIA)
        .unwrap()
        .unwrap();
    assert_eq!(ds.features.names, vec!["na_x.npy"]);

    let ds = linkbench_harness::dataset::load_network(&dir, FeatureSet::Combined)
        .unwrap()
        .unwrap();
    assert_eq!(ds.features.names, vec!["aa.npy", "na_x.npy"]);
}

#[test]
fn missing_feature_directory_persists_nothing() {
    let root = TempDir::new().unwrap();
    let config = config_at(&root);
    let cache = ResultCache::new(config.data_root.clone());

    let unit = EvalUnit {
        network: 11,
        feature_set: FeatureSet::I,
    };
    let status = runner::run_unit(
        &FsSource,
        &cache,
        &config,
        unit,
        Classifier::LogisticRegression,
        42,
        1,
    )
    .unwrap();
    assert_eq!(status, UnitStatus::SkippedMissing);
    assert!(!config.network_dir(11).join(PROPERTIES_DIR).exists());
}

#[test]
fn unrecognized_feature_set_never_reaches_evaluation() {
    let root = TempDir::new().unwrap();
    let config = config_at(&root);
    seed_network(&config, 13, 8);

    // Parsing fails at the configuration boundary, so no artifact can exist.
    assert!(FeatureSet::from_str("bogus").is_err());
    assert!(!config.network_dir(13).join(PROPERTIES_DIR).exists());
}

#[test]
fn all_classifiers_produce_distinct_artifacts() {
    let root = TempDir::new().unwrap();
    let config = config_at(&root);
    seed_network(&config, 18, 16);
    let cache = ResultCache::new(config.data_root.clone());

    for classifier in [
        Classifier::LogisticRegression,
        Classifier::RandomForest,
        Classifier::XGBoost,
    ] {
        let unit = EvalUnit {
            network: 18,
            feature_set: FeatureSet::I,
        };
        let status =
            runner::run_unit(&FsSource, &cache, &config, unit, classifier, 42, 1).unwrap();
        assert!(matches!(status, UnitStatus::Computed(_)), "{classifier}");
    }

    let properties = config.network_dir(18).join(PROPERTIES_DIR);
    let mut artifacts: Vec<String> = std::fs::read_dir(&properties)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    artifacts.sort();
    assert_eq!(
        artifacts,
        vec![
            "I_LogisticRegression.float",
            "I_RandomForest.float",
            "I_XGBoost.float",
        ]
    );
}
