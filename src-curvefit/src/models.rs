use ndarray::Array1;

/// Parametric model `y = f(t; params)`.
pub trait CurveModel: Sync {
    fn name(&self) -> &str;

    fn parameter_names(&self) -> &[&'static str];

    fn n_params(&self) -> usize {
        self.parameter_names().len()
    }

    /// Model value at a single abscissa
    fn eval(&self, t: f64, params: &[f64]) -> f64;

    fn predict(&self, t: &Array1<f64>, params: &[f64]) -> Array1<f64> {
        t.mapv(|ti| self.eval(ti, params))
    }
}

/// Newton cooling `T(t) = T_amb + (T_ini - T_amb) * exp(-k t)`
#[derive(Debug, Clone, Copy, Default)]
pub struct CoolingModel;

impl CurveModel for CoolingModel {
    fn name(&self) -> &str {
        "cooling"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["T_amb", "T_ini", "k"]
    }

    fn eval(&self, t: f64, params: &[f64]) -> f64 {
        let (t_amb, t_ini, k) = (params[0], params[1], params[2]);
        t_amb + (t_ini - t_amb) * (-k * t).exp()
    }
}

/// Sinusoid `y = A sin(omega x + phi) + C`
#[derive(Debug, Clone, Copy, Default)]
pub struct SineModel;

impl CurveModel for SineModel {
    fn name(&self) -> &str {
        "sine"
    }

    fn parameter_names(&self) -> &[&'static str] {
        &["A", "omega", "phi", "C"]
    }

    fn eval(&self, x: f64, params: &[f64]) -> f64 {
        let (a, omega, phi, c) = (params[0], params[1], params[2], params[3]);
        a * (omega * x + phi).sin() + c
    }
}
