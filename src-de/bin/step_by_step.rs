//! Narrated run of DE on f(x) = x² with a handful of individuals.
//!
//! The first generations are printed trial by trial, later ones in summary.

use clap::Parser;
use diffevo_de::{
	Bounds, DEConfigBuilder, DEObserver, DifferentialEvolution, GenerationEvent, TrialEvent,
	Updating,
};
use diffevo_testfunctions::square_1d;
use log::error;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "step_by_step", about = "Watch DE minimize x² one trial at a time")]
struct Cli {
	/// Number of individuals
	#[arg(long, default_value_t = 5)]
	popsize: usize,

	/// Mutation factor F
	#[arg(long, default_value_t = 0.8)]
	mutation: f64,

	/// Crossover probability CR
	#[arg(long, default_value_t = 0.7)]
	recombination: f64,

	/// Number of generations
	#[arg(long, default_value_t = 20)]
	generations: usize,

	/// Population update discipline; the classic teaching loop updates in place
	#[arg(long, default_value = "immediate")]
	updating: Updating,

	/// Generations printed trial by trial
	#[arg(long, default_value_t = 2)]
	detail: usize,

	/// Print a summary line every N generations
	#[arg(long, default_value_t = 5)]
	summary_every: usize,

	/// Optional random seed for reproducibility
	#[arg(long)]
	seed: Option<u64>,
}

struct Narrator {
	detail: usize,
	summary_every: usize,
}

impl DEObserver for Narrator {
	fn on_trial(&mut self, e: &TrialEvent<'_>) {
		if e.generation >= self.detail {
			return;
		}
		if e.index == 0 {
			println!("{}", "=".repeat(70));
			println!("GENERATION {} - step by step", e.generation + 1);
			println!("{}", "=".repeat(70));
		}
		println!();
		println!(
			"┌─ Individual {}: x = {:6.3}, f(x) = {:7.3}",
			e.index + 1,
			e.target[0],
			e.fitness_target
		);
		println!("│  trial (mutation + crossover): x = {:6.3}, f(x) = {:7.3}", e.trial[0], e.fitness_trial);
		if e.accepted {
			println!("│  ✅ trial is not worse → replaces the individual");
		} else {
			println!("│  ❌ individual is better → kept");
		}
		let kept = if e.accepted { e.trial[0] } else { e.target[0] };
		println!("└─ Result: individual {} = {:6.3}", e.index + 1, kept);
	}

	fn on_generation(&mut self, e: &GenerationEvent) {
		let detailed = e.generation < self.detail;
		if (e.generation + 1) % self.summary_every.max(1) == 0 || detailed {
			if detailed {
				println!();
				println!("{}", "─".repeat(70));
			}
			let x = e.best_x.as_ref().map(|x| x[0]).unwrap_or(f64::NAN);
			println!(
				"📊 Generation {:2}: best x = {:7.4}, f(x) = {:8.6}, replacements = {}",
				e.generation + 1,
				x,
				e.best_fitness,
				e.accepted
			);
			if detailed {
				println!();
			}
		}
	}
}

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Cli::parse();
	if let Err(e) = run(&args) {
		error!("{e}");
		process::exit(1);
	}
}

fn run(args: &Cli) -> Result<(), Box<dyn std::error::Error>> {
	let mut builder = DEConfigBuilder::new()
		.popsize(args.popsize)
		.mutation(args.mutation)
		.recombination(args.recombination)
		.maxiter(args.generations)
		.updating(args.updating);
	if let Some(seed) = args.seed {
		builder = builder.seed(seed);
	}
	let config = builder.build()?;
	let bounds = Bounds::new(&[(-10.0, 10.0)])?;

	println!("CONFIGURATION:");
	println!("   • Population: {} individuals", config.popsize);
	println!("   • Factor F: {}", config.mutation);
	println!("   • Crossover CR: {}", config.recombination);
	println!("   • Generations: {}", config.maxiter);
	println!("   • Updating: {}", config.updating);
	println!("   • Objective: minimize f(x) = x²");
	println!();

	let mut de = DifferentialEvolution::new(&square_1d, bounds, config)?;
	de.initialize()?;

	println!("{}", "=".repeat(70));
	println!("INITIAL POPULATION:");
	println!("{}", "=".repeat(70));
	print_population(de.population().column(0).iter().copied(), de.energies().iter().copied());
	println!();

	de.add_observer(Narrator { detail: args.detail, summary_every: args.summary_every });
	let report = de.optimize()?;

	println!();
	println!("{}", "=".repeat(70));
	println!("FINAL POPULATION:");
	println!("{}", "=".repeat(70));
	print_population(
		report.population.column(0).iter().copied(),
		report.population_energies.iter().copied(),
	);

	let worst = report
		.population
		.column(0)
		.iter()
		.copied()
		.zip(report.population_energies.iter().copied())
		.fold((f64::NAN, f64::NEG_INFINITY), |acc, (x, f)| if f > acc.1 { (x, f) } else { acc });
	let mean = report.population.column(0).mean().unwrap_or(f64::NAN);
	let attempts = report.nit * report.population.nrows();

	println!();
	println!("{}", "=".repeat(70));
	println!("RESULTS:");
	println!("{}", "=".repeat(70));
	println!("✅ Best x found:        {:9.6}  →  f(x) = {:.8}", report.x[0], report.fun);
	println!("❌ Worst x remaining:   {:9.6}  →  f(x) = {:.8}", worst.0, worst.1);
	println!("📊 Population mean:     {:9.6}  →  f(x) = {:.8}", mean, square_1d(&ndarray::array![mean]));
	println!("🎯 Theoretical optimum:  0.000000  →  f(x) = 0.00000000");
	println!("📏 Absolute error:      {:.8}", report.x[0].abs());
	println!(
		"📈 Replacements: {} of {} attempts ({:.1}%)",
		report.accepted,
		attempts,
		100.0 * report.accepted as f64 / attempts as f64
	);
	Ok(())
}

fn print_population(xs: impl Iterator<Item = f64>, fs: impl Iterator<Item = f64>) {
	let rows: Vec<(f64, f64)> = xs.zip(fs).collect();
	let best = rows.iter().map(|r| r.1).fold(f64::INFINITY, f64::min);
	for (i, (x, f)) in rows.iter().enumerate() {
		let mark = if *f == best { "👑" } else { "  " };
		println!("{mark} Individual {}: x = {:8.4}  →  f(x) = {:9.6}", i + 1, x, f);
	}
}
