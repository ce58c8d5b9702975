use diffevo_de::{Objective, ObjectiveError};
use ndarray::Array1;

use crate::data::SyntheticData;
use crate::error::{CurveFitError, Result};
use crate::models::CurveModel;

/// Soft constraint: adds `weight` to the cost when `params[parameter] < min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penalty {
    pub parameter: usize,
    pub min: f64,
    pub weight: f64,
}

impl Penalty {
    /// The cooling rate must stay non-negative
    pub fn non_negative_rate() -> Self {
        Self { parameter: 2, min: 0.0, weight: 1000.0 }
    }

    fn apply(&self, params: &[f64]) -> f64 {
        match params.get(self.parameter) {
            Some(&v) if v < self.min => self.weight,
            _ => 0.0,
        }
    }
}

/// Measurements plus the model fitted to them.
///
/// The mean squared error of a parameter vector is the objective minimized by
/// the optimizer.
#[derive(Debug, Clone)]
pub struct CurveFitProblem<M> {
    x: Array1<f64>,
    y: Array1<f64>,
    model: M,
    truth: Option<Vec<f64>>,
    penalty: Option<Penalty>,
}

impl<M: CurveModel> CurveFitProblem<M> {
    pub fn new(x: Array1<f64>, y: Array1<f64>, model: M) -> Result<Self> {
        if x.len() != y.len() {
            return Err(CurveFitError::LengthMismatch { x: x.len(), y: y.len() });
        }
        if x.is_empty() {
            return Err(CurveFitError::EmptyData);
        }
        Ok(Self { x, y, model, truth: None, penalty: None })
    }

    /// Problem over synthetic data, keeping its true parameters for reporting
    pub fn from_synthetic(data: SyntheticData, model: M) -> Result<Self> {
        let truth = data.truth;
        Ok(Self::new(data.x, data.y, model)?.with_truth(truth))
    }

    pub fn with_truth(mut self, truth: Vec<f64>) -> Self {
        self.truth = Some(truth);
        self
    }

    pub fn with_penalty(mut self, penalty: Penalty) -> Self {
        self.penalty = Some(penalty);
        self
    }

    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn truth(&self) -> Option<&[f64]> {
        self.truth.as_deref()
    }

    /// Model prediction at every abscissa
    pub fn predict(&self, params: &[f64]) -> Array1<f64> {
        self.model.predict(&self.x, params)
    }

    /// Observed minus predicted
    pub fn residuals(&self, params: &[f64]) -> Array1<f64> {
        &self.y - &self.predict(params)
    }

    pub fn mse(&self, params: &[f64]) -> f64 {
        let r = self.residuals(params);
        r.dot(&r) / r.len() as f64
    }

    /// MSE plus the soft-constraint penalty, if any
    pub fn cost(&self, params: &[f64]) -> f64 {
        self.mse(params) + self.penalty.map_or(0.0, |p| p.apply(params))
    }
}

impl<M: CurveModel> Objective for CurveFitProblem<M> {
    fn evaluate(&self, x: &Array1<f64>) -> std::result::Result<f64, ObjectiveError> {
        if x.len() != self.model.n_params() {
            return Err(Box::new(CurveFitError::ParameterCount {
                model: self.model.name().to_string(),
                expected: self.model.n_params(),
                got: x.len(),
            }));
        }
        Ok(self.cost(&x.to_vec()))
    }
}
