//! Independent runs executed side by side on the rayon pool.
//!
//! Each run keeps its own RNG and evaluates sequentially; only whole runs are
//! spread over threads.

use rayon::prelude::*;
use serde::Serialize;

use crate::{Bounds, DEConfig, DEReport, DifferentialEvolution, Objective, Result};

/// Runs one optimizer per configuration and returns the reports in the same
/// order. Fails if any run fails.
pub fn run_batch<F>(func: &F, bounds: &Bounds, configs: &[DEConfig]) -> Result<Vec<DEReport>>
where
    F: Objective + ?Sized,
{
    configs
        .par_iter()
        .map(|config| DifferentialEvolution::new(func, bounds.clone(), config.clone())?.optimize())
        .collect()
}

/// Runs the same configuration once per seed.
pub fn run_seeds<F>(func: &F, bounds: &Bounds, config: &DEConfig, seeds: &[u64]) -> Result<Vec<DEReport>>
where
    F: Objective + ?Sized,
{
    let configs: Vec<DEConfig> = seeds
        .iter()
        .map(|&seed| DEConfig { seed: Some(seed), ..config.clone() })
        .collect();
    run_batch(func, bounds, &configs)
}

/// Outcome of several runs of the same problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedStatistics {
    pub runs: usize,
    /// Runs whose best fitness is below the threshold
    pub successes: usize,
    pub mean_fun: f64,
    pub min_fun: f64,
    pub max_fun: f64,
}

impl SeedStatistics {
    pub fn from_reports(reports: &[DEReport], threshold: f64) -> Self {
        let funs: Vec<f64> = reports.iter().map(|r| r.fun).collect();
        let runs = funs.len();
        Self {
            runs,
            successes: funs.iter().filter(|&&f| f < threshold).count(),
            mean_fun: if runs == 0 { f64::NAN } else { funs.iter().sum::<f64>() / runs as f64 },
            min_fun: funs.iter().copied().fold(f64::INFINITY, f64::min),
            max_fun: funs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.runs == 0 { 0.0 } else { self.successes as f64 / self.runs as f64 }
    }
}
