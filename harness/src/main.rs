//! CLI entry point for the linkbench evaluation harness.
//!
//! Subcommands mirror the experiment entry points:
//!   discrete             -- fixed discrete-network list, tolerant of failures
//!   single-all-features  -- all six feature sets for one network
//!   single               -- one combination, skipping if cached
//!   all                  -- batch over the configured network range

use clap::{Parser, Subcommand};
use linkbench_core::{Classifier, EvalConfig, FeatureSet, Result};
use linkbench_harness::cache::{ResultCache, ResultKey};
use linkbench_harness::runner::{self, EvalUnit, FailurePolicy, FsSource, UnitStatus};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::str::FromStr;

/// Evaluation seed used where a subcommand does not expose one.
const DEFAULT_RANDOM_STATE: u64 = 42;

#[derive(Parser)]
#[command(name = "linkbench", about = "Link-prediction evaluation harness")]
struct Cli {
    /// Root directory holding one subdirectory per network.
    #[arg(long, global = true, default_value = "./data")]
    data_root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate the fixed discrete-network list across feature sets,
    /// tolerating per-unit failure.
    Discrete {
        /// Feature sets to evaluate (repeatable; default: all six).
        #[arg(long = "feature-set")]
        feature_set: Vec<String>,
    },

    /// Evaluate all six feature sets for one network, one classifier.
    SingleAllFeatures {
        #[arg(long)]
        network: u32,

        #[arg(long, default_value = "LogisticRegression")]
        clf: String,

        #[arg(long, default_value_t = DEFAULT_RANDOM_STATE)]
        random_state: u64,

        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        n_jobs: i32,

        /// Continue past failing feature sets instead of aborting.
        #[arg(long)]
        keep_going: bool,
    },

    /// Evaluate one (network, feature set, classifier) combination,
    /// skipping if the result artifact already exists.
    Single {
        #[arg(long)]
        network: u32,

        #[arg(long, default_value = "LogisticRegression")]
        clf: String,

        #[arg(long, default_value = "II-A")]
        feature_set: String,

        #[arg(long, default_value_t = DEFAULT_RANDOM_STATE)]
        random_state: u64,

        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        n_jobs: i32,
    },

    /// Batch over the configured network range (or one network), with
    /// optional scheduling shuffle.
    All {
        /// Evaluate only this network instead of the full range.
        #[arg(long)]
        network: Option<u32>,

        #[arg(long, default_value = "LogisticRegression")]
        clf: String,

        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        n_jobs: i32,

        /// Restrict the batch to one feature set (default: all six).
        #[arg(long)]
        feature_set: Option<String>,

        /// Keep the configured network order instead of shuffling.
        #[arg(long)]
        no_shuffle: bool,

        /// Seed for the scheduling shuffle, independent of the evaluation
        /// random state: it affects ordering only, never results.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Continue past failing units instead of aborting.
        #[arg(long)]
        keep_going: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = EvalConfig {
        data_root: cli.data_root,
        ..EvalConfig::default()
    };
    let cache = ResultCache::new(config.data_root.clone());

    let result = match cli.command {
        Command::Discrete { feature_set } => discrete(&config, &cache, &feature_set),
        Command::SingleAllFeatures {
            network,
            clf,
            random_state,
            n_jobs,
            keep_going,
        } => single_all_features(&config, &cache, network, &clf, random_state, n_jobs, keep_going),
        Command::Single {
            network,
            clf,
            feature_set,
            random_state,
            n_jobs,
        } => single(&config, &cache, network, &clf, &feature_set, random_state, n_jobs),
        Command::All {
            network,
            clf,
            n_jobs,
            feature_set,
            no_shuffle,
            seed,
            keep_going,
        } => all(
            &config,
            &cache,
            network,
            &clf,
            n_jobs,
            feature_set.as_deref(),
            !no_shuffle,
            seed,
            keep_going,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn parse_feature_sets(ids: &[String]) -> Result<Vec<FeatureSet>> {
    if ids.is_empty() {
        return Ok(FeatureSet::ALL.to_vec());
    }
    ids.iter().map(|s| FeatureSet::from_str(s)).collect()
}

fn discrete(config: &EvalConfig, cache: &ResultCache, feature_sets: &[String]) -> Result<()> {
    let feature_sets = parse_feature_sets(feature_sets)?;

    // Sequential walk with per-pair tolerance: a malformed network must not
    // stop the rest of the list. Classifiers still get the default
    // all-workers sentinel internally.
    for &network in &config.discrete_networks {
        for &feature_set in &feature_sets {
            let unit = EvalUnit {
                network,
                feature_set,
            };
            if let Err(e) = runner::run_unit(
                &FsSource,
                cache,
                config,
                unit,
                Classifier::LogisticRegression,
                DEFAULT_RANDOM_STATE,
                -1,
            ) {
                tracing::warn!(
                    network,
                    feature_set = %feature_set,
                    error = %e,
                    "could not evaluate network, continuing"
                );
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn single_all_features(
    config: &EvalConfig,
    cache: &ResultCache,
    network: u32,
    clf: &str,
    random_state: u64,
    n_jobs: i32,
    keep_going: bool,
) -> Result<()> {
    let classifier = Classifier::from_str(clf)?;
    for feature_set in FeatureSet::ALL {
        tracing::info!(network, feature_set = %feature_set, "evaluating");
        let unit = EvalUnit {
            network,
            feature_set,
        };
        match runner::run_unit(&FsSource, cache, config, unit, classifier, random_state, n_jobs) {
            Ok(_) => {}
            Err(e) if keep_going => {
                tracing::warn!(network, feature_set = %feature_set, error = %e, "could not evaluate, continuing");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn single(
    config: &EvalConfig,
    cache: &ResultCache,
    network: u32,
    clf: &str,
    feature_set: &str,
    random_state: u64,
    n_jobs: i32,
) -> Result<()> {
    let classifier = Classifier::from_str(clf)?;
    let feature_set = FeatureSet::from_str(feature_set)?;
    let unit = EvalUnit {
        network,
        feature_set,
    };
    let status = runner::run_unit(&FsSource, cache, config, unit, classifier, random_state, n_jobs)?;
    match status {
        UnitStatus::Computed(auc) => println!("{auc}"),
        UnitStatus::SkippedCached => {
            let key = ResultKey {
                network,
                feature_set,
                classifier,
            };
            match cache.load(&key) {
                Some(auc) => println!("already evaluated: {auc}"),
                None => println!("already evaluated, skipping"),
            }
        }
        UnitStatus::SkippedMissing => println!("no feature data, nothing to evaluate"),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn all(
    config: &EvalConfig,
    cache: &ResultCache,
    network: Option<u32>,
    clf: &str,
    n_jobs: i32,
    feature_set: Option<&str>,
    shuffle: bool,
    seed: u64,
    keep_going: bool,
) -> Result<()> {
    let classifier = Classifier::from_str(clf)?;
    let feature_sets: Vec<FeatureSet> = match feature_set {
        Some(id) => vec![FeatureSet::from_str(id)?],
        None => FeatureSet::ALL.to_vec(),
    };

    let mut networks = match network {
        Some(id) => vec![id],
        None => config.batch_networks(),
    };
    if shuffle {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        networks.shuffle(&mut rng);
    }

    let units: Vec<EvalUnit> = networks
        .iter()
        .flat_map(|&network| {
            feature_sets
                .iter()
                .map(move |&feature_set| EvalUnit { network, feature_set })
        })
        .collect();

    let policy = if keep_going {
        FailurePolicy::Tolerate
    } else {
        FailurePolicy::Abort
    };
    let outcome = runner::run_batch(
        &FsSource,
        cache,
        config,
        &units,
        classifier,
        DEFAULT_RANDOM_STATE,
        n_jobs,
        policy,
    )?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &runner::BatchOutcome) {
    println!(
        "{} computed, {} cached, {} without data, {} failed",
        outcome.computed, outcome.skipped_cached, outcome.skipped_missing, outcome.failed
    );
}
