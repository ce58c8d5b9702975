use ndarray::Array1;
use rand::Rng;

/// Binomial crossover.
///
/// Gene `d` comes from the mutant when a fresh `U[0,1)` draw is below `cr`,
/// otherwise from the target. When no taken gene actually differs from the
/// target, one dimension where the two vectors differ is forced to the
/// mutant's value (any dimension if they are identical), so the trial differs
/// from the target whenever the mutant does.
pub(crate) fn binomial_crossover<R: Rng + ?Sized>(
    target: &Array1<f64>,
    mutant: &Array1<f64>,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let n = target.len();
    let mut trial = target.clone();
    let mut changed = false;
    for j in 0..n {
        if rng.random::<f64>() < cr {
            trial[j] = mutant[j];
            changed |= mutant[j] != target[j];
        }
    }
    if !changed {
        let differing: Vec<usize> = (0..n).filter(|&j| mutant[j] != target[j]).collect();
        let j = if differing.is_empty() {
            rng.random_range(0..n)
        } else {
            differing[rng.random_range(0..differing.len())]
        };
        trial[j] = mutant[j];
    }
    trial
}
