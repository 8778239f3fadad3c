//! ROC AUC via the Wilcoxon–Mann–Whitney rank-sum statistic.
//!
//! Sorts once, assigns average ranks to tied groups, then reads the AUC off
//! the positive rank sum. O(N log N).

/// Area under the ROC curve for binary labels and positive-class scores.
///
/// `labels` holds 0/1 ground truth; `scores` holds the predicted probability
/// (or any monotone score) for the positive class. Returns 0.5 when either
/// class is absent.
///
/// # Panics
///
/// Panics if `labels` and `scores` differ in length.
#[must_use]
pub fn roc_auc_score(labels: &[i64], scores: &[f64]) -> f64 {
    assert_eq!(
        labels.len(),
        scores.len(),
        "labels and scores must have same length"
    );

    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut all: Vec<(f64, i64)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    all.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // Average rank within each tie group (1-indexed ranks)
    let n = all.len();
    let mut rank_sum_pos = 0.0f64;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && (all[j].0 - all[i].0).abs() < 1e-15 {
            j += 1;
        }
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for item in &all[i..j] {
            if item.1 == 1 {
                rank_sum_pos += avg_rank;
            }
        }
        i = j;
    }

    let p = n_pos as f64;
    let ng = n_neg as f64;
    let u = rank_sum_pos - p * (p + 1.0) / 2.0;
    (u / (p * ng)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_separation() {
        let labels = vec![1, 1, 1, 0, 0, 0];
        let scores = vec![0.8, 0.9, 1.0, 0.1, 0.2, 0.3];
        let auc = roc_auc_score(&labels, &scores);
        assert!((auc - 1.0).abs() < 1e-10, "expected 1.0, got {auc}");
    }

    #[test]
    fn no_separation_on_constant_scores() {
        let labels = vec![1, 1, 0, 0];
        let scores = vec![0.5, 0.5, 0.5, 0.5];
        let auc = roc_auc_score(&labels, &scores);
        assert!((auc - 0.5).abs() < 1e-10, "expected 0.5, got {auc}");
    }

    #[test]
    fn inverse_separation() {
        let labels = vec![1, 1, 0, 0];
        let scores = vec![0.1, 0.2, 0.8, 0.9];
        let auc = roc_auc_score(&labels, &scores);
        assert!(auc < 0.01, "expected ~0.0, got {auc}");
    }

    #[test]
    fn single_class_returns_chance() {
        assert!((roc_auc_score(&[1, 1], &[0.3, 0.9]) - 0.5).abs() < 1e-10);
        assert!((roc_auc_score(&[0, 0], &[0.3, 0.9]) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn known_value() {
        // pos scores = [3, 5], neg scores = [1, 2, 4]
        // Sorted: 1(N), 2(N), 3(P), 4(N), 5(P) -> ranks 1..5
        // rank_sum_pos = 3 + 5 = 8, U = 8 - 3 = 5, AUC = 5 / 6
        let labels = vec![1, 1, 0, 0, 0];
        let scores = vec![3.0, 5.0, 1.0, 2.0, 4.0];
        let auc = roc_auc_score(&labels, &scores);
        assert!((auc - 5.0 / 6.0).abs() < 1e-10, "got {auc}");
    }

    #[test]
    fn ties_get_average_rank() {
        // One positive tied with one negative, one clear negative below.
        // ranks: 0.1 -> 1, tie group {0.7, 0.7} -> 2.5 each
        // U = 2.5 - 1 = 1.5, AUC = 1.5 / 2 = 0.75
        let labels = vec![1, 0, 0];
        let scores = vec![0.7, 0.7, 0.1];
        let auc = roc_auc_score(&labels, &scores);
        assert!((auc - 0.75).abs() < 1e-10, "got {auc}");
    }
}
