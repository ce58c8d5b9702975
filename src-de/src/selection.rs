use ndarray::Array1;

use crate::objective::{Objective, ObjectiveError};

/// Greedy replacement rule: `true` when the trial replaces the target.
///
/// Ties go to the trial. A non-finite trial fitness never wins, and a finite
/// trial always beats a non-finite target.
#[inline]
pub fn trial_wins(fitness_target: f64, fitness_trial: f64) -> bool {
    fitness_trial.is_finite() && (!fitness_target.is_finite() || fitness_trial <= fitness_target)
}

/// Outcome of one target/trial competition.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub winner: Array1<f64>,
    pub fitness: f64,
    pub accepted: bool,
}

/// Evaluates both vectors and keeps the winner according to [`trial_wins`].
///
/// Standalone form of the rule. The optimizer itself caches target fitness and
/// calls [`trial_wins`] directly, so it never goes through here.
pub fn select<F: Objective + ?Sized>(
    func: &F,
    target: &Array1<f64>,
    trial: &Array1<f64>,
) -> Result<Selection, ObjectiveError> {
    let fitness_target = func.evaluate(target)?;
    let fitness_trial = func.evaluate(trial)?;
    Ok(if trial_wins(fitness_target, fitness_trial) {
        Selection { winner: trial.clone(), fitness: fitness_trial, accepted: true }
    } else {
        Selection { winner: target.clone(), fitness: fitness_target, accepted: false }
    })
}

/// Best individual seen so far and its fitness.
///
/// Starts empty at `+inf` and only moves on a finite, strictly lower fitness,
/// so the recorded fitness never increases.
#[derive(Debug, Clone, PartialEq)]
pub struct BestRecord {
    x: Option<Array1<f64>>,
    fitness: f64,
}

impl Default for BestRecord {
    fn default() -> Self {
        Self { x: None, fitness: f64::INFINITY }
    }
}

impl BestRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(&self) -> Option<&Array1<f64>> {
        self.x.as_ref()
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Offers a candidate; returns `true` if it became the new best.
    pub fn offer(&mut self, x: &Array1<f64>, fitness: f64) -> bool {
        if fitness.is_finite() && fitness < self.fitness {
            self.x = Some(x.clone());
            self.fitness = fitness;
            true
        } else {
            false
        }
    }
}
