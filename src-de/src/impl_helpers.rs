use log::warn;
use ndarray::Array1;
use rand::Rng;

use crate::error::{DEError, Result};
use crate::objective::Objective;
use crate::{DEReport, DifferentialEvolution};

// ------------------------------ Internal helpers ------------------------------

impl<'a, F, R> DifferentialEvolution<'a, F, R>
where
    F: Objective + ?Sized,
    R: Rng,
{
    /// Evaluates the objective, counting the call. `generation` is `None`
    /// for the initial population.
    pub(crate) fn energy(&mut self, x: &Array1<f64>, generation: Option<usize>) -> Result<f64> {
        let f = self
            .func
            .evaluate(x)
            .map_err(|source| DEError::Objective { generation, source })?;
        self.nfev += 1;
        if !f.is_finite() && !self.warned_non_finite {
            warn!("objective returned {} at x={:?}; such points never win selection", f, x.to_vec());
            self.warned_non_finite = true;
        }
        Ok(f)
    }

    pub(crate) fn finish_report(&self) -> DEReport {
        let (x, fun) = match self.best.x() {
            Some(x) => (x.clone(), self.best.fitness()),
            // every evaluation was non-finite
            None => (self.pop.row(0).to_owned(), f64::INFINITY),
        };
        DEReport {
            x,
            fun,
            history: self.history.clone(),
            nit: self.history.len(),
            nfev: self.nfev,
            accepted: self.accepted,
            population: self.pop.clone(),
            population_energies: self.energies.clone(),
            message: format!("Maximum number of generations reached ({})", self.config.maxiter),
        }
    }
}

/// Mean and standard deviation of the finite entries (`NaN` when none are finite).
pub(crate) fn finite_mean_std(values: &Array1<f64>) -> (f64, f64) {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let var = finite.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}
