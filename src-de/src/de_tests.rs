use crate::{
	Bounds, DEConfig, DEConfigBuilder, DEError, DEObserver, DifferentialEvolution, Fallible,
	GenerationEvent, Phase, TrialEvent, Updating,
};
use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

fn sphere(x: &Array1<f64>) -> f64 {
	x.iter().map(|&xi| xi * xi).sum::<f64>()
}

fn config(popsize: usize, maxiter: usize, seed: u64) -> DEConfig {
	DEConfigBuilder::new()
		.popsize(popsize)
		.maxiter(maxiter)
		.seed(seed)
		.build()
		.expect("valid config")
}

mod config_tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let cfg = DEConfig::default();
		assert_eq!(cfg.popsize, 50);
		assert_eq!(cfg.mutation, 0.8);
		assert_eq!(cfg.recombination, 0.7);
		assert_eq!(cfg.maxiter, 100);
		assert_eq!(cfg.updating, Updating::Deferred);
		assert!(cfg.validate().is_ok());
	}

	#[test]
	fn test_validation_errors() {
		let err = DEConfigBuilder::new().popsize(3).build().unwrap_err();
		assert!(matches!(err, DEError::PopulationTooSmall { pop_size: 3 }));
		assert!(DEConfigBuilder::new().popsize(4).build().is_ok());

		assert!(matches!(
			DEConfigBuilder::new().recombination(1.5).build(),
			Err(DEError::InvalidCrossoverRate { .. })
		));
		assert!(DEConfigBuilder::new().recombination(f64::NAN).build().is_err());
		assert!(DEConfigBuilder::new().recombination(0.0).build().is_ok());
		assert!(DEConfigBuilder::new().recombination(1.0).build().is_ok());

		assert!(matches!(
			DEConfigBuilder::new().maxiter(0).build(),
			Err(DEError::InvalidMaxIterations { maxiter: 0 })
		));
		assert!(matches!(
			DEConfigBuilder::new().mutation(f64::INFINITY).build(),
			Err(DEError::InvalidMutationFactor { .. })
		));
		// discouraged but permitted
		assert!(DEConfigBuilder::new().mutation(2.5).build().is_ok());
		assert!(DEConfigBuilder::new().mutation(-0.5).build().is_ok());
	}

	#[test]
	fn test_constructor_validates() {
		let bounds = Bounds::uniform(2, -1.0, 1.0).unwrap();
		let bad = DEConfig { popsize: 3, ..DEConfig::default() };
		assert!(DifferentialEvolution::new(&sphere, bounds.clone(), bad).is_err());
		let good = DEConfig { popsize: 4, ..DEConfig::default() };
		assert!(DifferentialEvolution::new(&sphere, bounds, good).is_ok());
	}

	#[test]
	fn test_json_config() {
		let cfg: DEConfig =
			serde_json::from_str(r#"{"popsize": 20, "updating": "immediate", "seed": 7}"#).unwrap();
		assert_eq!(cfg.popsize, 20);
		assert_eq!(cfg.updating, Updating::Immediate);
		assert_eq!(cfg.seed, Some(7));
		assert_eq!(cfg.maxiter, 100);
		assert_eq!("Deferred".parse::<Updating>().unwrap(), Updating::Deferred);
		assert!("sideways".parse::<Updating>().is_err());
	}
}

mod lifecycle_tests {
	use super::*;

	#[test]
	fn test_phases() {
		let bounds = Bounds::uniform(2, -5.0, 5.0).unwrap();
		let mut de = DifferentialEvolution::new(&sphere, bounds, config(8, 3, 1)).unwrap();
		assert_eq!(de.phase(), Phase::Uninitialized);
		assert_eq!(de.population().nrows(), 0);

		de.initialize().unwrap();
		assert_eq!(de.phase(), Phase::Initialized);
		assert_eq!(de.population().dim(), (8, 2));
		assert_eq!(de.nfev(), 8);
		assert!(de.history().is_empty());
		let initial = de.population().clone();
		// second call is a no-op
		de.initialize().unwrap();
		assert_eq!(de.population(), &initial);

		let event = de.step().unwrap();
		assert_eq!(event.generation, 0);
		assert_eq!(de.phase(), Phase::Running { generation: 1 });
		de.step().unwrap();
		let event = de.step().unwrap();
		assert_eq!(event.generation, 2);
		assert_eq!(de.phase(), Phase::Terminated);
		assert_eq!(de.history().len(), 3);
		assert_eq!(de.nfev(), 8 + 3 * 8);

		assert!(matches!(de.step(), Err(DEError::Terminated { generations: 3 })));
		assert!(matches!(de.initialize(), Err(DEError::Terminated { .. })));
	}

	#[test]
	fn test_step_initializes_lazily() {
		let bounds = Bounds::uniform(1, -1.0, 1.0).unwrap();
		let mut de = DifferentialEvolution::new(&sphere, bounds, config(5, 2, 4)).unwrap();
		let event = de.step().unwrap();
		assert_eq!(event.generation, 0);
		assert_eq!(de.history().len(), 1);
	}

	#[test]
	fn test_energies_are_cached_fitness() {
		let bounds = Bounds::uniform(3, -2.0, 2.0).unwrap();
		let mut de = DifferentialEvolution::new(&sphere, bounds, config(10, 5, 9)).unwrap();
		for _ in 0..5 {
			de.step().unwrap();
			for (row, &e) in de.population().rows().into_iter().zip(de.energies().iter()) {
				assert_eq!(sphere(&row.to_owned()), e);
			}
		}
	}

	#[test]
	fn test_report_fields() {
		let bounds = Bounds::uniform(2, -5.0, 5.0).unwrap();
		let report = DifferentialEvolution::new(&sphere, bounds, config(10, 25, 2))
			.unwrap()
			.optimize()
			.unwrap();
		assert_eq!(report.nit, 25);
		assert_eq!(report.history.len(), 25);
		assert_eq!(report.nfev, 10 + 10 * 25);
		assert_eq!(report.population.dim(), (10, 2));
		assert_eq!(report.population_energies.len(), 10);
		assert_eq!(report.history.last(), Some(report.fun));
		assert_eq!(sphere(&report.x), report.fun);
		let min_energy = report.population_energies.iter().copied().fold(f64::INFINITY, f64::min);
		assert_eq!(min_energy, report.fun);
		assert!(report.accepted <= 10 * 25);
	}
}

mod observer_tests {
	use super::*;

	#[derive(Default)]
	struct Counter {
		trials: usize,
		accepted: usize,
		generations: Vec<usize>,
	}

	struct CountingObserver<'c>(&'c RefCell<Counter>);

	impl DEObserver for CountingObserver<'_> {
		fn on_trial(&mut self, event: &TrialEvent<'_>) {
			let mut c = self.0.borrow_mut();
			c.trials += 1;
			if event.accepted {
				c.accepted += 1;
				assert!(event.fitness_trial <= event.fitness_target);
			}
		}

		fn on_generation(&mut self, event: &GenerationEvent) {
			self.0.borrow_mut().generations.push(event.generation);
		}
	}

	#[test]
	fn test_observers_see_every_trial_and_generation() {
		let counter = RefCell::new(Counter::default());
		let bounds = Bounds::uniform(2, -3.0, 3.0).unwrap();
		let mut de = DifferentialEvolution::new(&sphere, bounds, config(6, 4, 5)).unwrap();
		de.add_observer(CountingObserver(&counter));
		let report = de.optimize().unwrap();
		let c = counter.into_inner();
		assert_eq!(c.trials, 6 * 4);
		assert_eq!(c.generations, vec![0, 1, 2, 3]);
		assert_eq!(c.accepted, report.accepted);
	}

	#[test]
	fn test_closure_observer() {
		let mut best = Vec::new();
		{
			let bounds = Bounds::uniform(2, -3.0, 3.0).unwrap();
			let mut de = DifferentialEvolution::new(&sphere, bounds, config(6, 10, 6)).unwrap();
			de.add_observer(|e: &GenerationEvent| best.push(e.best_fitness));
			de.optimize().unwrap();
		}
		assert_eq!(best.len(), 10);
		assert!(best.windows(2).all(|w| w[1] <= w[0]));
	}
}

mod behaviour_tests {
	use super::*;

	#[test]
	fn test_injected_rng_is_reproducible() {
		let bounds = Bounds::uniform(3, -5.0, 5.0).unwrap();
		let cfg = DEConfig { popsize: 12, maxiter: 30, ..DEConfig::default() };
		let run = |seed: u64| {
			DifferentialEvolution::with_rng(&sphere, bounds.clone(), cfg.clone(), StdRng::seed_from_u64(seed))
				.unwrap()
				.optimize()
				.unwrap()
		};
		let (a, b, c) = (run(77), run(77), run(78));
		assert_eq!(a.x, b.x);
		assert_eq!(a.fun.to_bits(), b.fun.to_bits());
		assert_eq!(a.history, b.history);
		assert_ne!(a.history, c.history);
	}

	#[test]
	fn test_immediate_updating_converges() {
		let bounds = Bounds::uniform(2, -10.0, 10.0).unwrap();
		let cfg = DEConfigBuilder::new()
			.popsize(20)
			.maxiter(50)
			.updating(Updating::Immediate)
			.seed(8)
			.build()
			.unwrap();
		let report = DifferentialEvolution::new(&sphere, bounds, cfg).unwrap().optimize().unwrap();
		assert!(report.fun < 1e-2, "f={}", report.fun);
		assert!(report.history.is_non_increasing());
	}

	#[test]
	fn test_update_disciplines_differ() {
		let bounds = Bounds::uniform(2, -10.0, 10.0).unwrap();
		let deferred = config(10, 10, 21);
		let immediate = DEConfig { updating: Updating::Immediate, ..deferred.clone() };
		let a = DifferentialEvolution::new(&sphere, bounds.clone(), deferred).unwrap().optimize().unwrap();
		let b = DifferentialEvolution::new(&sphere, bounds, immediate).unwrap().optimize().unwrap();
		// same initial population, different generations
		assert_ne!(a.population, b.population);
	}

	#[test]
	fn test_objective_error_in_initial_population() {
		let f = Fallible(|x: &Array1<f64>| {
			if x[0] > 0.0 { Err(format!("refusing x0={}", x[0])) } else { Ok(x[0] * x[0]) }
		});
		let bounds = Bounds::new(&[(-1.0, 1.0)]).unwrap();
		let err = DifferentialEvolution::new(&f, bounds, config(20, 10, 3))
			.unwrap()
			.optimize()
			.unwrap_err();
		assert!(err.is_objective_error());
		assert!(matches!(err, DEError::Objective { generation: None, .. }));
		let source = std::error::Error::source(&err).unwrap();
		assert!(source.to_string().starts_with("refusing x0="));
	}

	#[test]
	fn test_objective_error_mid_run_is_not_retried() {
		let calls = AtomicUsize::new(0);
		let f = Fallible(|x: &Array1<f64>| {
			// init is calls 1..=10, generation 0 is 11..=20, generation 1 is 21..=30
			if calls.fetch_add(1, Ordering::SeqCst) + 1 == 30 {
				Err("sensor offline")
			} else {
				Ok(sphere(x))
			}
		});
		let bounds = Bounds::uniform(2, -1.0, 1.0).unwrap();
		let err = DifferentialEvolution::new(&f, bounds, config(10, 10, 3))
			.unwrap()
			.optimize()
			.unwrap_err();
		assert!(matches!(err, DEError::Objective { generation: Some(1), .. }));
		assert_eq!(calls.load(Ordering::SeqCst), 30);
	}

	#[test]
	fn test_nan_regions_never_win() {
		// NaN outside the unit disc
		let f = |x: &Array1<f64>| {
			let r = sphere(x);
			if r > 1.0 { f64::NAN } else { r }
		};
		let bounds = Bounds::uniform(2, -2.0, 2.0).unwrap();
		let report = DifferentialEvolution::new(&f, bounds, config(20, 40, 12)).unwrap().optimize().unwrap();
		assert!(report.fun.is_finite());
		assert!(sphere(&report.x) <= 1.0);
		assert!(report.history.iter().all(|h| !h.is_nan()));
		assert!(report.history.is_non_increasing());
	}

	#[test]
	fn test_bounds_wider_than_f64_range_hold() {
		let f = |x: &Array1<f64>| (x[0] / 1e308).powi(2) + x[1].powi(2);
		for mutation in [0.0, 0.8] {
			let bounds = Bounds::new(&[(-1e308, 1e308), (-1.0, 1.0)]).unwrap();
			let cfg = DEConfig { popsize: 6, maxiter: 3, mutation, seed: Some(1), ..DEConfig::default() };
			let mut de = DifferentialEvolution::new(&f, bounds.clone(), cfg).unwrap();
			de.initialize().unwrap();
			for _ in 0..3 {
				de.step().unwrap();
				for row in de.population().rows() {
					assert!(row.iter().all(|g| g.is_finite()), "F={}: {:?}", mutation, row);
					assert!(bounds.contains(row), "F={}: {:?}", mutation, row);
				}
			}
			assert!(de.energies().iter().all(|e| e.is_finite()));
		}
	}

	#[test]
	fn test_all_non_finite_reports_infinity() {
		let f = |_: &Array1<f64>| f64::INFINITY;
		let bounds = Bounds::uniform(2, -1.0, 1.0).unwrap();
		let report = DifferentialEvolution::new(&f, bounds, config(4, 3, 1)).unwrap().optimize().unwrap();
		assert_eq!(report.fun, f64::INFINITY);
		assert_eq!(report.accepted, 0);
		assert_eq!(report.history.as_slice(), &[f64::INFINITY; 3]);
		assert_eq!(report.x.len(), 2);
	}

	#[test]
	fn test_degenerate_population_still_runs() {
		// with a constant objective every trial ties and wins
		let f = |_: &Array1<f64>| 1.0;
		let bounds = Bounds::uniform(3, 0.0, 1.0).unwrap();
		let report = DifferentialEvolution::new(&f, bounds, config(4, 5, 0)).unwrap().optimize().unwrap();
		assert_eq!(report.accepted, 4 * 5);
		assert_eq!(report.fun, 1.0);
		assert!(report.history.iter().all(|h| h == 1.0));
	}
}
