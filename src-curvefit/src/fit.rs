use diffevo_de::{ConvergenceHistory, DEConfig, DEConfigBuilder, differential_evolution};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::f64::consts::PI;

use crate::data::{cooling_data, sine_data};
use crate::error::{CurveFitError, Result};
use crate::models::{CoolingModel, CurveModel, SineModel};
use crate::problem::{CurveFitProblem, Penalty};

/// Outcome of a curve fit
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub model: String,
    pub parameter_names: Vec<String>,
    pub params: Vec<f64>,
    pub mse: f64,
    /// `|fit - truth| / |truth|` per parameter, when the truth is known
    pub relative_errors: Option<Vec<f64>>,
    pub residual_mean: f64,
    pub residual_std: f64,
    pub history: ConvergenceHistory,
    pub nit: usize,
    pub nfev: usize,
}

/// Fits `problem` inside `bounds` with DE.
pub fn fit_curve<M: CurveModel>(
    problem: &CurveFitProblem<M>,
    bounds: &[(f64, f64)],
    config: DEConfig,
) -> Result<FitReport> {
    let model = problem.model();
    if bounds.len() != model.n_params() {
        return Err(CurveFitError::ParameterCount {
            model: model.name().to_string(),
            expected: model.n_params(),
            got: bounds.len(),
        });
    }

    let report = differential_evolution(problem, bounds, config)?;
    let params = report.x.to_vec();
    let residuals = problem.residuals(&params);
    let relative_errors = problem.truth().map(|truth| {
        params
            .iter()
            .zip(truth)
            .map(|(fit, t)| if *t == 0.0 { (fit - t).abs() } else { ((fit - t) / t).abs() })
            .collect()
    });

    let fit = FitReport {
        model: model.name().to_string(),
        parameter_names: model.parameter_names().iter().map(|s| s.to_string()).collect(),
        mse: problem.mse(&params),
        params,
        relative_errors,
        residual_mean: residuals.mean().unwrap_or(f64::NAN),
        residual_std: residuals.std(0.0),
        history: report.history,
        nit: report.nit,
        nfev: report.nfev,
    };
    info!("{} fit: mse={:.6} after {} evaluations", fit.model, fit.mse, fit.nfev);
    Ok(fit)
}

/// Data, bounds and optimizer settings for one of the bundled fits
#[derive(Debug, Clone)]
pub struct FitSetup<M> {
    pub problem: CurveFitProblem<M>,
    pub bounds: Vec<(f64, f64)>,
    pub config: DEConfig,
}

impl FitSetup<CoolingModel> {
    /// Newton cooling with a penalty on negative rates. `seed` drives both the
    /// noise and the optimizer.
    pub fn cooling(seed: u64) -> Result<Self> {
        let data = cooling_data(&mut StdRng::seed_from_u64(seed))?;
        let problem = CurveFitProblem::from_synthetic(data, CoolingModel)?.with_penalty(Penalty::non_negative_rate());
        let config = DEConfigBuilder::new()
            .popsize(60)
            .mutation(0.8)
            .recombination(0.9)
            .maxiter(150)
            .seed(seed)
            .build()?;
        Ok(Self { problem, bounds: vec![(0.0, 50.0), (50.0, 150.0), (0.01, 1.0)], config })
    }
}

impl FitSetup<SineModel> {
    pub fn sine(seed: u64) -> Result<Self> {
        let data = sine_data(&mut StdRng::seed_from_u64(seed))?;
        let problem = CurveFitProblem::from_synthetic(data, SineModel)?;
        let config = DEConfigBuilder::new()
            .popsize(80)
            .mutation(0.8)
            .recombination(0.9)
            .maxiter(200)
            .seed(seed)
            .build()?;
        Ok(Self { problem, bounds: vec![(0.0, 10.0), (0.0, 5.0), (-PI, PI), (-5.0, 5.0)], config })
    }
}
