//! Error types for the Differential Evolution optimizer.
//!
//! Configuration problems are reported before the first generation runs.
//! Failures of the caller's objective are carried through untouched as the
//! `source` of [`DEError::Objective`].

use thiserror::Error;

use crate::objective::ObjectiveError;

/// Errors that can occur during Differential Evolution optimization.
#[derive(Debug, Error)]
pub enum DEError {
	/// No dimension was given.
	#[error("bounds are empty: at least one (min, max) pair is required")]
	EmptyBounds,

	/// A bound pair is not strictly increasing or not finite.
	#[error("invalid bounds at index {index}: lower ({lower}) must be finite and < upper ({upper})")]
	InvalidBounds {
		/// Index of the invalid bound pair
		index: usize,
		/// The lower bound value
		lower: f64,
		/// The upper bound value
		upper: f64,
	},

	/// Population size is too small (must be >= 4).
	#[error("population size ({pop_size}) must be >= 4")]
	PopulationTooSmall {
		/// The invalid population size
		pop_size: usize,
	},

	/// Mutation factor is NaN or infinite.
	#[error("invalid mutation factor: {factor} (must be finite)")]
	InvalidMutationFactor {
		/// The invalid mutation factor
		factor: f64,
	},

	/// Crossover rate is out of valid range [0, 1].
	#[error("invalid crossover rate: {rate} (must be in [0, 1])")]
	InvalidCrossoverRate {
		/// The invalid crossover rate
		rate: f64,
	},

	/// Generation budget is zero.
	#[error("max generations ({maxiter}) must be >= 1")]
	InvalidMaxIterations {
		/// The invalid generation budget
		maxiter: usize,
	},

	/// The caller's objective function failed; the run is aborted.
	#[error("objective evaluation failed in generation {generation:?}: {source}")]
	Objective {
		/// Generation in which the failure happened (`None` for the initial population)
		generation: Option<usize>,
		/// The error returned by the objective, unmodified
		#[source]
		source: ObjectiveError,
	},

	/// The generation budget is spent; the optimizer cannot advance further.
	#[error("optimizer already terminated after {generations} generations")]
	Terminated {
		/// Number of generations that were run
		generations: usize,
	},

	/// I/O failure while exporting records or history.
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),

	/// CSV serialization failure while exporting records or history.
	#[error("csv error: {0}")]
	Csv(#[from] csv::Error),
}

/// A specialized `Result` type for DE operations.
pub type Result<T> = std::result::Result<T, DEError>;

impl DEError {
	/// Returns `true` if this is a bounds-related error.
	pub fn is_bounds_error(&self) -> bool {
		matches!(self, DEError::EmptyBounds | DEError::InvalidBounds { .. })
	}

	/// Returns `true` if this is a configuration error, i.e. anything that is
	/// rejected before a generation runs. Bounds errors are included.
	pub fn is_config_error(&self) -> bool {
		self.is_bounds_error()
			|| matches!(
				self,
				DEError::PopulationTooSmall { .. }
					| DEError::InvalidMutationFactor { .. }
					| DEError::InvalidCrossoverRate { .. }
					| DEError::InvalidMaxIterations { .. }
			)
	}

	/// Returns `true` if the caller's objective failed.
	pub fn is_objective_error(&self) -> bool {
		matches!(self, DEError::Objective { .. })
	}
}
