use ndarray::Array1;

/// Error type returned by fallible objectives.
pub type ObjectiveError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Scalar function to minimize over a bounded real vector space.
///
/// Any `Fn(&Array1<f64>) -> f64 + Sync` closure or function is an objective.
/// Objectives that can fail are wrapped in [`Fallible`]; their error is
/// returned to the caller of the optimizer unmodified.
///
/// Soft constraints are the objective's business: add a penalty to the
/// returned value when a domain rule is violated. The optimizer only enforces
/// the box bounds.
pub trait Objective: Sync {
	/// Evaluates the fitness of `x` (lower is better).
	fn evaluate(&self, x: &Array1<f64>) -> Result<f64, ObjectiveError>;
}

impl<F> Objective for F
where
	F: Fn(&Array1<f64>) -> f64 + Sync,
{
	fn evaluate(&self, x: &Array1<f64>) -> Result<f64, ObjectiveError> {
		Ok(self(x))
	}
}

/// Adapter for objectives returning `Result<f64, E>`.
///
/// ```rust
/// use diffevo_de::{Fallible, Objective};
/// use ndarray::array;
///
/// let f = Fallible(|x: &ndarray::Array1<f64>| {
///     if x[0] < 0.0 { Err("negative input") } else { Ok(x[0].sqrt()) }
/// });
/// assert_eq!(f.evaluate(&array![4.0]).unwrap(), 2.0);
/// assert!(f.evaluate(&array![-1.0]).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F, E> Objective for Fallible<F>
where
	F: Fn(&Array1<f64>) -> Result<f64, E> + Sync,
	E: Into<ObjectiveError>,
{
	fn evaluate(&self, x: &Array1<f64>) -> Result<f64, ObjectiveError> {
		(self.0)(x).map_err(Into::into)
	}
}
