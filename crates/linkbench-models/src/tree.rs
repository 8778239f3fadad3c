//! Binary decision trees over a column-stacked feature matrix.
//!
//! One builder serves both ensembles: splits minimize the squared error of
//! the target vector (for 0/1 targets this ranks splits identically to Gini
//! impurity), and leaf values are either the target mean (random forest) or
//! a Newton step `sum(grad) / sum(hess)` (gradient boosting).

use ndarray::{Array2, ArrayView1};
use rand_chacha::ChaCha8Rng;

/// Growth limits shared by both ensembles.
#[derive(Debug, Clone)]
pub struct TreeParams {
    /// Maximum depth; `None` grows until leaves are pure or too small.
    pub max_depth: Option<usize>,
    /// Minimum rows required to attempt a split.
    pub min_samples_split: usize,
    /// Number of candidate features per split; `None` considers all.
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
        }
    }
}

enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted binary tree.
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grow a tree over `rows` of `x`.
    ///
    /// `targets` drives split selection. When `hessians` is given, leaf
    /// values are the Newton step `sum(targets) / sum(hessians)` over the
    /// leaf rows; otherwise they are the target mean.
    #[must_use]
    pub fn fit(
        x: &Array2<f64>,
        targets: &[f64],
        hessians: Option<&[f64]>,
        rows: &[usize],
        params: &TreeParams,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build(x, targets, hessians, rows.to_vec(), params, rng, 0);
        tree
    }

    /// Value of the leaf this row falls into.
    #[must_use]
    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &mut self,
        x: &Array2<f64>,
        targets: &[f64],
        hessians: Option<&[f64]>,
        rows: Vec<usize>,
        params: &TreeParams,
        rng: &mut ChaCha8Rng,
        depth: usize,
    ) -> usize {
        let at_depth_limit = params.max_depth.is_some_and(|limit| depth >= limit);
        if rows.len() < params.min_samples_split || at_depth_limit {
            return self.push_leaf(targets, hessians, &rows);
        }

        let Some((feature, threshold, left_rows, right_rows)) =
            best_split(x, targets, &rows, params, rng)
        else {
            return self.push_leaf(targets, hessians, &rows);
        };

        // Reserve the split slot so children index past it
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf(0.0));
        let left = self.build(x, targets, hessians, left_rows, params, rng, depth + 1);
        let right = self.build(x, targets, hessians, right_rows, params, rng, depth + 1);
        self.nodes[idx] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        idx
    }

    fn push_leaf(&mut self, targets: &[f64], hessians: Option<&[f64]>, rows: &[usize]) -> usize {
        let grad_sum: f64 = rows.iter().map(|&i| targets[i]).sum();
        let value = match hessians {
            Some(h) => {
                let hess_sum: f64 = rows.iter().map(|&i| h[i]).sum();
                grad_sum / (hess_sum + 1e-16)
            }
            None => grad_sum / rows.len().max(1) as f64,
        };
        self.nodes.push(Node::Leaf(value));
        self.nodes.len() - 1
    }
}

/// Best squared-error split over a (possibly subsampled) candidate feature
/// set. Returns `None` when no split improves on the parent node.
fn best_split(
    x: &Array2<f64>,
    targets: &[f64],
    rows: &[usize],
    params: &TreeParams,
    rng: &mut ChaCha8Rng,
) -> Option<(usize, f64, Vec<usize>, Vec<usize>)> {
    let n_features = x.ncols();
    let candidates: Vec<usize> = match params.max_features {
        Some(k) if k < n_features => rand::seq::index::sample(rng, n_features, k).into_vec(),
        _ => (0..n_features).collect(),
    };

    let total_sum: f64 = rows.iter().map(|&i| targets[i]).sum();
    let n = rows.len() as f64;
    let parent_score = total_sum * total_sum / n;

    let mut best: Option<(f64, usize, f64)> = None;

    for &feature in &candidates {
        let mut ordered: Vec<(f64, f64)> = rows
            .iter()
            .map(|&i| (x[[i, feature]], targets[i]))
            .collect();
        ordered.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut left_sum = 0.0f64;
        for (k, pair) in ordered.iter().enumerate().take(ordered.len().saturating_sub(1)) {
            left_sum += pair.1;
            // Only split between distinct values
            if ordered[k + 1].0 <= pair.0 {
                continue;
            }
            let left_n = (k + 1) as f64;
            let right_n = n - left_n;
            let right_sum = total_sum - left_sum;
            let score = left_sum * left_sum / left_n + right_sum * right_sum / right_n;
            let gain = score - parent_score;
            if gain > 1e-12 && best.map_or(true, |(g, _, _)| gain > g) {
                let threshold = (pair.0 + ordered[k + 1].0) / 2.0;
                best = Some((gain, feature, threshold));
            }
        }
    }

    let (_, feature, threshold) = best?;
    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .iter()
        .copied()
        .partition(|&i| x[[i, feature]] <= threshold);
    Some((feature, threshold, left_rows, right_rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn splits_a_separable_feature() {
        let x = array![[0.0], [1.0], [2.0], [10.0], [11.0], [12.0]];
        let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let rows: Vec<usize> = (0..6).collect();
        let tree = DecisionTree::fit(&x, &y, None, &rows, &TreeParams::default(), &mut rng());

        assert!((tree.predict_row(x.row(0)) - 0.0).abs() < 1e-12);
        assert!((tree.predict_row(x.row(5)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pure_targets_become_a_single_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = vec![1.0, 1.0, 1.0];
        let rows: Vec<usize> = (0..3).collect();
        let tree = DecisionTree::fit(&x, &y, None, &rows, &TreeParams::default(), &mut rng());
        for i in 0..3 {
            assert!((tree.predict_row(x.row(i)) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn identical_feature_values_cannot_split() {
        let x = array![[5.0], [5.0], [5.0], [5.0]];
        let y = vec![0.0, 1.0, 0.0, 1.0];
        let rows: Vec<usize> = (0..4).collect();
        let tree = DecisionTree::fit(&x, &y, None, &rows, &TreeParams::default(), &mut rng());
        // Falls back to the mean leaf
        assert!((tree.predict_row(x.row(0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn depth_limit_caps_growth() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = vec![0.0, 1.0, 0.0, 1.0];
        let rows: Vec<usize> = (0..4).collect();
        let params = TreeParams {
            max_depth: Some(0),
            ..TreeParams::default()
        };
        let tree = DecisionTree::fit(&x, &y, None, &rows, &params, &mut rng());
        // Depth zero: a single mean leaf
        assert!((tree.predict_row(x.row(0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn newton_leaves_divide_by_hessian_sum() {
        let x = array![[1.0], [1.0]];
        let grad = vec![0.3, 0.3];
        let hess = vec![0.1, 0.2];
        let rows: Vec<usize> = vec![0, 1];
        let tree = DecisionTree::fit(&x, &grad, Some(&hess), &rows, &TreeParams::default(), &mut rng());
        let expected = 0.6 / 0.3;
        assert!((tree.predict_row(x.row(0)) - expected).abs() < 1e-9);
    }
}
