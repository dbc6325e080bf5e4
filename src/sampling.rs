//! Random subsampling with an injected random source.

use rand::Rng;

/// Indices of a random subsample of `n` points with expected size `sample_size`.
///
/// Each point is kept independently with probability `sample_size / n`, so the
/// actual size varies around `sample_size`. If `n <= sample_size`, every index is kept.
pub fn bernoulli_subsample<R: Rng + ?Sized>(n: usize, sample_size: usize, rng: &mut R) -> Vec<usize> {
    if n <= sample_size {
        return (0..n).collect();
    }

    let keep = sample_size as f64 / n as f64;
    (0..n).filter(|_| rng.random::<f64>() < keep).collect()
}
