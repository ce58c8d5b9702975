use rand::Rng;
use rand::seq::SliceRandom;

/// Draws `count` distinct indices from `0..pool_size`, all different from
/// `exclude`, uniformly without replacement.
pub(crate) fn distinct_indices<R: Rng + ?Sized>(
    exclude: usize,
    count: usize,
    pool_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    debug_assert!(count <= pool_size.saturating_sub(1));
    let mut idxs: Vec<usize> = (0..pool_size).filter(|&k| k != exclude).collect();
    let (picked, _) = idxs.partial_shuffle(rng, count);
    picked.to_vec()
}
