//! Fit a classifier on a seeded split and score held-out ROC AUC.

use linkbench_core::{Classifier, LinkBenchError, Result};
use linkbench_models::{
    roc_auc_score, GradientBoostingClassifier, GradientBoostingConfig,
    LogisticRegressionClassifier, LogisticRegressionConfig, RandomForestClassifier,
    RandomForestConfig, StandardScaler,
};
use ndarray::{Array2, Axis};

use crate::split::train_test_split;

/// Train the requested classifier variant and return the held-out AUC.
///
/// `random_state` seeds the split and any classifier-internal randomness;
/// `n_jobs` bounds classifier-internal parallelism (negative = the fixed
/// worker cap for the tree ensembles, passed through for the logistic
/// variant, where binary fitting is single-threaded regardless).
pub fn evaluate(
    features: &Array2<f64>,
    labels: &[i64],
    classifier: Classifier,
    random_state: u64,
    n_jobs: i32,
    test_fraction: f64,
) -> Result<f64> {
    if features.nrows() != labels.len() {
        return Err(LinkBenchError::Data(format!(
            "feature matrix has {} rows but {} labels",
            features.nrows(),
            labels.len()
        )));
    }

    let (train_idx, test_idx) = train_test_split(labels.len(), test_fraction, random_state)?;
    let x_train = features.select(Axis(0), &train_idx);
    let x_test = features.select(Axis(0), &test_idx);
    let y_train: Vec<i64> = train_idx.iter().map(|&i| labels[i]).collect();
    let y_test: Vec<i64> = test_idx.iter().map(|&i| labels[i]).collect();

    let probs = match classifier {
        Classifier::LogisticRegression => {
            let scaler = StandardScaler::fit(&x_train);
            let model = LogisticRegressionClassifier::fit(
                &scaler.transform(&x_train),
                &y_train,
                &LogisticRegressionConfig::default(),
            );
            model.predict_proba(&scaler.transform(&x_test))
        }
        Classifier::RandomForest => {
            let model = RandomForestClassifier::fit(
                &x_train,
                &y_train,
                &RandomForestConfig::default(),
                random_state,
                n_jobs,
            )?;
            model.predict_proba(&x_test)
        }
        Classifier::XGBoost => {
            let model = GradientBoostingClassifier::fit(
                &x_train,
                &y_train,
                &GradientBoostingConfig::default(),
                random_state,
                n_jobs,
            )?;
            model.predict_proba(&x_test)
        }
    };

    Ok(roc_auc_score(&y_test, &probs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn separable() -> (Array2<f64>, Vec<i64>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let label = i64::from(i % 2 == 1);
            rows.push(label as f64 * 10.0 + (i / 2) as f64 * 0.1);
            labels.push(label);
        }
        (Array2::from_shape_vec((40, 1), rows).unwrap(), labels)
    }

    #[test]
    fn all_variants_score_a_separable_problem() {
        let (x, y) = separable();
        let (_, test_idx) = crate::split::train_test_split(y.len(), 0.25, 42).unwrap();
        let test_has_both_classes = test_idx.iter().any(|&i| y[i] == 0)
            && test_idx.iter().any(|&i| y[i] == 1);

        for clf in [
            Classifier::LogisticRegression,
            Classifier::RandomForest,
            Classifier::XGBoost,
        ] {
            let auc = evaluate(&x, &y, clf, 42, 1, 0.25).unwrap();
            assert!(
                (0.0..=1.0).contains(&auc),
                "{clf}: AUC out of range: {auc}"
            );
            if test_has_both_classes {
                assert!(auc > 0.9, "{clf}: expected strong separation, got {auc}");
            } else {
                assert!((auc - 0.5).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn mismatched_lengths_error_before_fitting() {
        let (x, _) = separable();
        let short_labels = vec![0, 1, 0];
        let err = evaluate(
            &x,
            &short_labels,
            Classifier::LogisticRegression,
            42,
            1,
            0.25,
        )
        .unwrap_err();
        assert!(matches!(err, LinkBenchError::Data(_)));
    }

    #[test]
    fn evaluation_is_reproducible_for_a_seed() {
        let (x, y) = separable();
        let a = evaluate(&x, &y, Classifier::RandomForest, 7, 1, 0.25).unwrap();
        let b = evaluate(&x, &y, Classifier::RandomForest, 7, -1, 0.25).unwrap();
        assert_eq!(a, b);
    }
}
