//! Curve fitting with Differential Evolution
//!
//! A [`CurveFitProblem`] owns the measurements and a [`CurveModel`]; its mean
//! squared error is the objective handed to the optimizer, so the data never
//! lives in global state.
//!
//! ```rust
//! use diffevo_curvefit::{FitSetup, fit_curve};
//!
//! let setup = FitSetup::cooling(42).unwrap();
//! let report = fit_curve(&setup.problem, &setup.bounds, setup.config).unwrap();
//! assert!((report.params[2] - 0.1).abs() < 0.05);
//! ```

pub mod data;
pub mod error;
pub mod fit;
pub mod models;
pub mod problem;

pub use data::{SyntheticData, cooling_data, sine_data};
pub use error::{CurveFitError, Result};
pub use fit::{FitReport, FitSetup, fit_curve};
pub use models::{CoolingModel, CurveModel, SineModel};
pub use problem::{CurveFitProblem, Penalty};
