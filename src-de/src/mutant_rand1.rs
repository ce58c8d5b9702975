use ndarray::{Array1, Array2, Zip};
use rand::Rng;

use crate::bounds::Bounds;
use crate::distinct_indices::distinct_indices;

/// DE/rand/1: `pop[r1] + f * (pop[r2] - pop[r3])` with r1, r2, r3 distinct and
/// different from `i`, clamped into `bounds`.
pub(crate) fn mutant_rand1<R: Rng + ?Sized>(
    i: usize,
    pop: &Array2<f64>,
    f: f64,
    bounds: &Bounds,
    rng: &mut R,
) -> Array1<f64> {
    let idxs = distinct_indices(i, 3, pop.nrows(), rng);
    let mut mutant = Zip::from(pop.row(idxs[0]))
        .and(pop.row(idxs[1]))
        .and(pop.row(idxs[2]))
        .map_collect(|&a, &b, &c| {
            let v = a + f * (b - c);
            // inf - inf or 0 * inf on extreme bounds; keep the base gene
            if v.is_nan() { a } else { v }
        });
    bounds.clamp_inplace(&mut mutant);
    mutant
}
