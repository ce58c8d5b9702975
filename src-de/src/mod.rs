//! Differential Evolution (DE) global optimizer in pure Rust using ndarray
//!
//! Classic DE/rand/1/bin for minimizing a scalar function over a box:
//! - Uniform random initialization inside the bounds
//! - DE/rand/1 mutation, mutants clamped to the bounds
//! - Binomial crossover with a forced mutant gene
//! - Greedy selection, ties go to the trial
//! - Fixed generation budget, one convergence-history entry per generation
//! - Deferred (generational) or immediate (steady-state) population updates
//!
//! The optimizer owns its random number generator: a seeded run is
//! reproducible bit for bit.
//!
//! ```rust
//! use diffevo_de::{differential_evolution, DEConfigBuilder};
//! use ndarray::Array1;
//!
//! let config = DEConfigBuilder::new().popsize(20).maxiter(100).seed(1).build().unwrap();
//! let report = differential_evolution(
//!     &|x: &Array1<f64>| x.iter().map(|v| v * v).sum::<f64>(),
//!     &[(-5.0, 5.0), (-5.0, 5.0)],
//!     config,
//! )
//! .unwrap();
//! assert!(report.fun < 1e-3);
//! assert_eq!(report.history.len(), 100);
//! ```

use std::fmt;
use std::str::FromStr;

use log::{debug, info, warn};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub mod batch;
pub mod bounds;
pub mod crossover_binomial;
pub mod differential_evolution;
pub mod distinct_indices;
pub mod error;
pub mod history;
pub mod impl_helpers;
pub mod init_random;
pub mod mutant_rand1;
pub mod objective;
pub mod observer;
pub mod recorder;
pub mod run_recorded;
pub mod selection;

#[cfg(test)]
mod de_tests;

pub use batch::{SeedStatistics, run_batch, run_seeds};
pub use bounds::Bounds;
pub use differential_evolution::differential_evolution;
pub use error::{DEError, Result};
pub use history::ConvergenceHistory;
pub use init_random::MIN_POPULATION;
pub use objective::{Fallible, Objective, ObjectiveError};
pub use observer::{DEObserver, GenerationEvent, TrialEvent};
pub use recorder::{OptimizationRecord, OptimizationRecorder};
pub use run_recorded::run_recorded_differential_evolution;
pub use selection::{BestRecord, Selection, select, trial_wins};

use crossover_binomial::binomial_crossover;
use init_random::init_random;
use mutant_rand1::mutant_rand1;

/// Population update discipline within a generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Updating {
	/// Trials are built from the frozen previous generation; the next
	/// population is swapped in once every individual has competed.
	#[default]
	Deferred,
	/// Winners are written back at once, so later individuals of the same
	/// generation already mutate from them (steady-state DE).
	Immediate,
}

impl FromStr for Updating {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"deferred" => Ok(Updating::Deferred),
			"immediate" => Ok(Updating::Immediate),
			_ => Err(format!("unknown updating mode: {} (expected deferred or immediate)", s)),
		}
	}
}

impl fmt::Display for Updating {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Updating::Deferred => write!(f, "deferred"),
			Updating::Immediate => write!(f, "immediate"),
		}
	}
}

/// Configuration for the Differential Evolution optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DEConfig {
	/// Number of generations to run (no early stopping)
	pub maxiter: usize,
	/// Total number of individuals NP (>= 4)
	pub popsize: usize,
	/// Scale factor F; any finite value, usually in (0, 2]
	pub mutation: f64,
	/// Crossover rate CR in [0, 1]
	pub recombination: f64,
	pub updating: Updating,
	/// Seed for the owned RNG; `None` seeds from the OS
	pub seed: Option<u64>,
	/// Log progress at info level
	pub disp: bool,
}

impl Default for DEConfig {
	fn default() -> Self {
		Self {
			maxiter: 100,
			popsize: 50,
			mutation: 0.8,
			recombination: 0.7,
			updating: Updating::default(),
			seed: None,
			disp: false,
		}
	}
}

impl DEConfig {
	/// Checks every parameter rule; bounds are checked by [`Bounds::new`].
	pub fn validate(&self) -> Result<()> {
		if self.popsize < MIN_POPULATION {
			return Err(DEError::PopulationTooSmall { pop_size: self.popsize });
		}
		if !self.mutation.is_finite() {
			return Err(DEError::InvalidMutationFactor { factor: self.mutation });
		}
		if !(0.0..=1.0).contains(&self.recombination) {
			return Err(DEError::InvalidCrossoverRate { rate: self.recombination });
		}
		if self.maxiter == 0 {
			return Err(DEError::InvalidMaxIterations { maxiter: self.maxiter });
		}
		Ok(())
	}
}

/// Fluent builder for `DEConfig` for ergonomic configuration.
#[derive(Debug, Clone, Default)]
pub struct DEConfigBuilder {
	cfg: DEConfig,
}

impl DEConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: DEConfig::default() }
	}
	pub fn maxiter(mut self, v: usize) -> Self {
		self.cfg.maxiter = v;
		self
	}
	pub fn popsize(mut self, v: usize) -> Self {
		self.cfg.popsize = v;
		self
	}
	pub fn mutation(mut self, v: f64) -> Self {
		self.cfg.mutation = v;
		self
	}
	pub fn recombination(mut self, v: f64) -> Self {
		self.cfg.recombination = v;
		self
	}
	pub fn updating(mut self, v: Updating) -> Self {
		self.cfg.updating = v;
		self
	}
	pub fn seed(mut self, v: u64) -> Self {
		self.cfg.seed = Some(v);
		self
	}
	pub fn disp(mut self, v: bool) -> Self {
		self.cfg.disp = v;
		self
	}
	/// Validates and returns the configuration
	pub fn build(self) -> Result<DEConfig> {
		self.cfg.validate()?;
		Ok(self.cfg)
	}
}

/// Result/Report of a DE optimization run
#[derive(Clone, Serialize)]
pub struct DEReport {
	/// Best individual found
	pub x: Array1<f64>,
	/// Its fitness
	pub fun: f64,
	/// Best fitness after each generation, `history.len() == nit`
	pub history: ConvergenceHistory,
	pub nit: usize,
	pub nfev: usize,
	/// Number of trials that replaced their target over the whole run
	pub accepted: usize,
	pub population: Array2<f64>,
	pub population_energies: Array1<f64>,
	pub message: String,
}

impl fmt::Debug for DEReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DEReport")
			.field("x", &format!("len={}", self.x.len()))
			.field("fun", &self.fun)
			.field("history", &format!("len={}", self.history.len()))
			.field("nit", &self.nit)
			.field("nfev", &self.nfev)
			.field("accepted", &self.accepted)
			.field(
				"population",
				&format!("{}x{}", self.population.nrows(), self.population.ncols()),
			)
			.field("population_energies", &format!("len={}", self.population_energies.len()))
			.field("message", &self.message)
			.finish()
	}
}

/// Lifecycle of an optimizer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Uninitialized,
	/// Population drawn and evaluated, no generation run yet
	Initialized,
	/// `generation` generations completed, budget not yet spent
	Running { generation: usize },
	Terminated,
}

/// Differential Evolution optimizer
///
/// Owns the population, the best record, the convergence history and the
/// random number generator. The objective and the bounds are read-only
/// inputs. Drive it with [`optimize`](Self::optimize), or generation by
/// generation with [`step`](Self::step).
pub struct DifferentialEvolution<'a, F, R = StdRng>
where
	F: Objective + ?Sized,
{
	func: &'a F,
	bounds: Bounds,
	config: DEConfig,
	rng: R,
	phase: Phase,
	pop: Array2<f64>,
	energies: Array1<f64>,
	best: BestRecord,
	history: ConvergenceHistory,
	nfev: usize,
	accepted: usize,
	observers: Vec<Box<dyn DEObserver + 'a>>,
	warned_non_finite: bool,
}

impl<'a, F> DifferentialEvolution<'a, F, StdRng>
where
	F: Objective + ?Sized,
{
	/// Create a new DE optimizer; the RNG is seeded from `config.seed`, or
	/// from the OS when no seed is given.
	pub fn new(func: &'a F, bounds: Bounds, config: DEConfig) -> Result<Self> {
		let rng = match config.seed {
			Some(s) => StdRng::seed_from_u64(s),
			None => {
				let mut thread_rng = rand::rng();
				StdRng::from_rng(&mut thread_rng)
			}
		};
		Self::with_rng(func, bounds, config, rng)
	}
}

impl<'a, F, R> DifferentialEvolution<'a, F, R>
where
	F: Objective + ?Sized,
	R: Rng,
{
	/// Create a new DE optimizer drawing from a caller-supplied RNG;
	/// `config.seed` is ignored.
	pub fn with_rng(func: &'a F, bounds: Bounds, config: DEConfig, rng: R) -> Result<Self> {
		config.validate()?;
		if !(config.mutation > 0.0 && config.mutation <= 2.0) {
			warn!("mutation factor F={} is outside (0, 2]", config.mutation);
		}
		let n = bounds.dim();
		Ok(Self {
			func,
			bounds,
			rng,
			phase: Phase::Uninitialized,
			pop: Array2::zeros((0, n)),
			energies: Array1::zeros(0),
			best: BestRecord::new(),
			history: ConvergenceHistory::with_capacity(config.maxiter),
			nfev: 0,
			accepted: 0,
			observers: Vec::new(),
			warned_non_finite: false,
			config,
		})
	}

	/// Attach an observer; observers are called in the order they were added.
	pub fn add_observer<O: DEObserver + 'a>(&mut self, observer: O) {
		self.observers.push(Box::new(observer));
	}

	pub fn config(&self) -> &DEConfig {
		&self.config
	}

	pub fn bounds(&self) -> &Bounds {
		&self.bounds
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Current population, one individual per row (empty before initialization)
	pub fn population(&self) -> &Array2<f64> {
		&self.pop
	}

	/// Cached fitness of each individual of [`population`](Self::population)
	pub fn energies(&self) -> &Array1<f64> {
		&self.energies
	}

	pub fn best(&self) -> &BestRecord {
		&self.best
	}

	pub fn history(&self) -> &ConvergenceHistory {
		&self.history
	}

	/// Objective evaluations so far
	pub fn nfev(&self) -> usize {
		self.nfev
	}

	/// Draw and evaluate the initial population.
	///
	/// Does nothing once initialized; fails after termination.
	pub fn initialize(&mut self) -> Result<()> {
		match self.phase {
			Phase::Uninitialized => {}
			Phase::Terminated => {
				return Err(DEError::Terminated { generations: self.history.len() });
			}
			Phase::Initialized | Phase::Running { .. } => return Ok(()),
		}

		let npop = self.config.popsize;
		if self.config.disp {
			info!(
				"DE Init: {} dimensions, population={}, maxiter={}",
				self.bounds.dim(),
				npop,
				self.config.maxiter
			);
			info!(
				"  F={:.3}, CR={:.3}, updating={}",
				self.config.mutation, self.config.recombination, self.config.updating
			);
		}

		let pop = init_random(&self.bounds, npop, &mut self.rng)?;
		let mut energies = Array1::from_elem(npop, f64::INFINITY);
		self.best = BestRecord::new();
		self.history.clear();
		for (i, row) in pop.rows().into_iter().enumerate() {
			let x = row.to_owned();
			let f = self.energy(&x, None)?;
			energies[i] = f;
			self.best.offer(&x, f);
		}
		self.pop = pop;
		self.energies = energies;
		self.phase = Phase::Initialized;
		Ok(())
	}

	/// Run one generation (initializing first if needed) and return its summary.
	pub fn step(&mut self) -> Result<GenerationEvent> {
		let generation = match self.phase {
			Phase::Uninitialized => {
				self.initialize()?;
				0
			}
			Phase::Initialized => 0,
			Phase::Running { generation } => generation,
			Phase::Terminated => {
				return Err(DEError::Terminated { generations: self.history.len() });
			}
		};

		let npop = self.pop.nrows();
		let f = self.config.mutation;
		let cr = self.config.recombination;
		let mut next_pop = self.pop.clone();
		let mut next_energies = self.energies.clone();
		let mut accepted = 0usize;

		for i in 0..npop {
			let source = match self.config.updating {
				Updating::Deferred => &self.pop,
				Updating::Immediate => &next_pop,
			};
			let mutant = mutant_rand1(i, source, f, &self.bounds, &mut self.rng);
			// slot i is only written below, so both disciplines compete against the same target
			let target = self.pop.row(i).to_owned();
			let fitness_target = self.energies[i];
			let trial = binomial_crossover(&target, &mutant, cr, &mut self.rng);
			let fitness_trial = self.energy(&trial, Some(generation))?;

			let won = trial_wins(fitness_target, fitness_trial);
			let event = TrialEvent {
				generation,
				index: i,
				target: &target,
				trial: &trial,
				fitness_target,
				fitness_trial,
				accepted: won,
			};
			for obs in self.observers.iter_mut() {
				obs.on_trial(&event);
			}

			if won {
				next_pop.row_mut(i).assign(&trial);
				next_energies[i] = fitness_trial;
				accepted += 1;
				self.best.offer(&trial, fitness_trial);
			} else {
				self.best.offer(&target, fitness_target);
			}
		}

		self.pop = next_pop;
		self.energies = next_energies;
		self.accepted += accepted;
		self.history.push(self.best.fitness());

		let completed = generation + 1;
		self.phase = if completed >= self.config.maxiter {
			Phase::Terminated
		} else {
			Phase::Running { generation: completed }
		};

		let (mean_fitness, std_fitness) = impl_helpers::finite_mean_std(&self.energies);
		let event = GenerationEvent {
			generation,
			best_x: self.best.x().cloned(),
			best_fitness: self.best.fitness(),
			accepted,
			mean_fitness,
			std_fitness,
		};
		debug!(
			"generation {}: best f(x)={:.6e}, accepted {}/{}",
			generation, event.best_fitness, accepted, npop
		);
		if self.config.disp && (generation % 10 == 0 || completed == self.config.maxiter) {
			info!(
				"Generation {:4}: best f(x) = {:.6e}, mean = {:.6e}, std = {:.3e}",
				generation, event.best_fitness, mean_fitness, std_fitness
			);
		}
		for obs in self.observers.iter_mut() {
			obs.on_generation(&event);
		}
		Ok(event)
	}

	/// Run every remaining generation and return the report.
	///
	/// Consumes the optimizer: a new run needs a new instance.
	pub fn optimize(mut self) -> Result<DEReport> {
		self.initialize_if_needed()?;
		while self.phase != Phase::Terminated {
			self.step()?;
		}
		let report = self.finish_report();
		if self.config.disp {
			info!(
				"DE done: f(x)={:.6e} after {} generations, {} evaluations, {} replacements",
				report.fun, report.nit, report.nfev, report.accepted
			);
			info!("  x = {:?}", report.x.to_vec());
		}
		Ok(report)
	}

	fn initialize_if_needed(&mut self) -> Result<()> {
		if self.phase == Phase::Uninitialized {
			self.initialize()?;
		}
		Ok(())
	}
}
