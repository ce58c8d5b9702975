use crate::{Bounds, DEConfig, DEReport, DifferentialEvolution, Objective, Result};

/// Runs Differential Evolution optimization on a function.
///
/// Convenience wrapper: validates `bounds` and `config`, builds a
/// [`DifferentialEvolution`] and runs it to the end of its generation budget.
///
/// # Errors
///
/// Configuration errors are returned before any evaluation. An error from
/// the objective aborts the run and is returned as [`crate::DEError::Objective`].
///
/// # Example
///
/// ```rust
/// use diffevo_de::{differential_evolution, DEConfigBuilder};
/// use ndarray::Array1;
///
/// let result = differential_evolution(
///     &|x: &Array1<f64>| x[0].powi(2) + x[1].powi(2),
///     &[(-5.0, 5.0), (-5.0, 5.0)],
///     DEConfigBuilder::new().maxiter(50).popsize(20).seed(42).build().unwrap(),
/// )
/// .expect("optimization failed");
///
/// assert!(result.fun < 0.01);
/// ```
pub fn differential_evolution<F>(func: &F, bounds: &[(f64, f64)], config: DEConfig) -> Result<DEReport>
where
    F: Objective + ?Sized,
{
    let bounds = Bounds::new(bounds)?;
    DifferentialEvolution::new(func, bounds, config)?.optimize()
}
