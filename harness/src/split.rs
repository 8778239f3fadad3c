//! Seeded train/test partitioning.

use linkbench_core::{LinkBenchError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Partition row indices into `(train, test)` by a seeded shuffle.
///
/// The test partition takes `ceil(n_rows * test_fraction)` rows, clamped so
/// neither side is empty. The same `(n_rows, test_fraction, seed)` always
/// yields the same partition.
pub fn train_test_split(
    n_rows: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(LinkBenchError::Config(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    if n_rows < 2 {
        return Err(LinkBenchError::Data(format!(
            "need at least 2 rows to split, got {n_rows}"
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n_rows as f64 * test_fraction).ceil() as usize).clamp(1, n_rows - 1);
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    Ok((train, test))
}
