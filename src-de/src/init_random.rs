use ndarray::Array2;
use rand::Rng;

use crate::bounds::Bounds;
use crate::error::{DEError, Result};

/// Smallest population that lets DE/rand/1 pick three members besides the target.
pub const MIN_POPULATION: usize = 4;

/// Uniform random population: `npop` rows, one gene per bound, each drawn
/// independently from `U[min_d, max_d)`.
pub fn init_random<R: Rng + ?Sized>(bounds: &Bounds, npop: usize, rng: &mut R) -> Result<Array2<f64>> {
    if npop < MIN_POPULATION {
        return Err(DEError::PopulationTooSmall { pop_size: npop });
    }
    let n = bounds.dim();
    let (lower, upper) = (bounds.lower(), bounds.upper());
    let mut pop = Array2::<f64>::zeros((npop, n));
    for i in 0..npop {
        for j in 0..n {
            let u: f64 = rng.random::<f64>();
            // interpolate rather than scale the span, which overflows past f64::MAX
            pop[(i, j)] = (lower[j] * (1.0 - u) + upper[j] * u).clamp(lower[j], upper[j]);
        }
    }
    Ok(pop)
}
