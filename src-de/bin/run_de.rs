use clap::Parser;
use diffevo_de::{
	Bounds, ConvergenceHistory, DEConfig, DEReport, Updating, differential_evolution, run_batch,
	run_recorded_differential_evolution,
};
use diffevo_env::{get_records_dir, output_dir_or_default};
use diffevo_testfunctions::{
	FunctionMetadata, get_function, get_function_bounds_vec, get_function_metadata,
};
use log::{error, info};
use plotly::{
	Layout, Plot, Scatter,
	common::{Mode, Title},
	layout::{Axis, AxisType},
};
use std::error::Error;
use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

/// (F, CR) pairs run side by side by `--compare`
const COMPARE_GRID: [(f64, f64); 3] = [(0.5, 0.5), (0.8, 0.7), (1.0, 0.9)];

#[derive(Parser, Debug)]
#[command(name = "run_de", about = "Minimize a benchmark function with DE/rand/1/bin")]
struct Cli {
	/// Name of the benchmark function to optimize (use --list-functions to see available options)
	#[arg(long)]
	function: Option<String>,

	/// Dimensionality of the problem (defaults to the function's recommended dimension)
	#[arg(long)]
	dim: Option<usize>,

	/// JSON file with a DE configuration; the flags below override its fields
	#[arg(long)]
	config: Option<PathBuf>,

	/// Number of generations
	#[arg(long)]
	maxiter: Option<usize>,

	/// Population size NP (>= 4)
	#[arg(long)]
	popsize: Option<usize>,

	/// Mutation factor F
	#[arg(long)]
	mutation: Option<f64>,

	/// Crossover probability CR in [0, 1]
	#[arg(long)]
	recombination: Option<f64>,

	/// Population update discipline: deferred or immediate
	#[arg(long)]
	updating: Option<Updating>,

	/// Optional random seed for reproducibility
	#[arg(long)]
	seed: Option<u64>,

	/// Log progress every 10 generations
	#[arg(long)]
	verbose: bool,

	/// Write the convergence history to this CSV file
	#[arg(long)]
	history_csv: Option<PathBuf>,

	/// Record every generation to $DIFFEVO_DIR/data_generated/records/<function>.csv
	#[arg(long)]
	record: bool,

	/// Write an HTML convergence plot to the output directory
	#[arg(long)]
	plot: bool,

	/// Run the (F, CR) grid (0.5, 0.5), (0.8, 0.7), (1.0, 0.9) and compare
	#[arg(long)]
	compare: bool,

	/// Output directory for plots (defaults to $DIFFEVO_DIR/data_generated)
	#[arg(long)]
	output_dir: Option<PathBuf>,

	/// List all available functions and exit
	#[arg(long)]
	list_functions: bool,

	/// Show metadata for the selected function before running optimization
	#[arg(long)]
	show_metadata: bool,
}

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Cli::parse();

	if args.list_functions {
		list_available_functions();
		return;
	}

	let function_name = match &args.function {
		Some(name) => name.trim().to_lowercase(),
		None => {
			eprintln!("Error: --function must be provided unless --list-functions is used.");
			process::exit(2);
		}
	};
	let Some(function) = get_function(&function_name) else {
		eprintln!(
			"Error: function '{function_name}' not found. Use --list-functions to inspect available names."
		);
		process::exit(2);
	};

	let metadata_map = get_function_metadata();
	let metadata = metadata_map.get(&function_name);
	if args.show_metadata {
		if let Some(meta) = metadata {
			print_metadata(meta);
		}
	}

	let dimension = args
		.dim
		.or_else(|| metadata.and_then(|m| m.dimensions.first().copied()))
		.unwrap_or(2);
	let bounds = get_function_bounds_vec(&function_name, dimension);

	let config = match build_config(&args) {
		Ok(c) => c,
		Err(e) => {
			eprintln!("Error: {e}");
			process::exit(2);
		}
	};

	if let Err(e) = run(&args, &function_name, function, &bounds, config) {
		error!("{e}");
		process::exit(1);
	}
}

fn build_config(args: &Cli) -> Result<DEConfig, Box<dyn Error>> {
	let mut config = match &args.config {
		Some(path) => {
			let text = std::fs::read_to_string(path)?;
			serde_json::from_str::<DEConfig>(&text)?
		}
		None => DEConfig::default(),
	};
	if let Some(v) = args.maxiter {
		config.maxiter = v;
	}
	if let Some(v) = args.popsize {
		config.popsize = v;
	}
	if let Some(v) = args.mutation {
		config.mutation = v;
	}
	if let Some(v) = args.recombination {
		config.recombination = v;
	}
	if let Some(v) = args.updating {
		config.updating = v;
	}
	if args.seed.is_some() {
		config.seed = args.seed;
	}
	config.disp |= args.verbose;
	config.validate()?;
	Ok(config)
}

fn run(
	args: &Cli,
	name: &str,
	function: fn(&ndarray::Array1<f64>) -> f64,
	bounds: &[(f64, f64)],
	config: DEConfig,
) -> Result<(), Box<dyn Error>> {
	info!(
		"Running DE on '{}' ({}D): NP={}, F={}, CR={}, {} generations, {} updating",
		name,
		bounds.len(),
		config.popsize,
		config.mutation,
		config.recombination,
		config.maxiter,
		config.updating
	);

	if args.compare {
		return compare(args, name, function, bounds, config);
	}

	let start = Instant::now();
	let report = if args.record {
		let (report, csv_path) =
			run_recorded_differential_evolution(name, &function, bounds, config, get_records_dir()?)?;
		println!("Records written to {}", csv_path.display());
		report
	} else {
		differential_evolution(&function, bounds, config)?
	};
	println!("\nOptimization completed in {:.2?}", start.elapsed());
	print_report(&report);

	if let Some(path) = &args.history_csv {
		report.history.write_csv(path)?;
		println!("History written to {}", path.display());
	}
	if args.plot {
		let dir = output_dir_or_default(args.output_dir.as_deref())?;
		let path = dir.join(format!("{name}_convergence.html"));
		write_convergence_plot(&format!("Convergence: {name}"), &[("DE".to_string(), &report.history)], &path);
		println!("Created convergence plot: {}", path.display());
	}
	Ok(())
}

fn compare(
	args: &Cli,
	name: &str,
	function: fn(&ndarray::Array1<f64>) -> f64,
	bounds: &[(f64, f64)],
	base: DEConfig,
) -> Result<(), Box<dyn Error>> {
	let configs: Vec<DEConfig> = COMPARE_GRID
		.iter()
		.map(|&(f, cr)| DEConfig { mutation: f, recombination: cr, ..base.clone() })
		.collect();
	let reports = run_batch(&function, &Bounds::new(bounds)?, &configs)?;

	println!("\n{:>6} {:>6} {:>14} {:>10}", "F", "CR", "best f(x)", "accepted");
	for (config, report) in configs.iter().zip(&reports) {
		println!(
			"{:>6.2} {:>6.2} {:>14.6e} {:>10}",
			config.mutation, config.recombination, report.fun, report.accepted
		);
	}

	if let Some(path) = &args.history_csv {
		// one file per grid point next to the requested path
		for (config, report) in configs.iter().zip(&reports) {
			let file = suffixed(path, &format!("F{}_CR{}", config.mutation, config.recombination));
			report.history.write_csv(&file)?;
			println!("History written to {}", file.display());
		}
	}
	if args.plot {
		let dir = output_dir_or_default(args.output_dir.as_deref())?;
		let path = dir.join(format!("{name}_compare.html"));
		let series: Vec<(String, &ConvergenceHistory)> = configs
			.iter()
			.zip(&reports)
			.map(|(c, r)| (format!("F={}, CR={}", c.mutation, c.recombination), &r.history))
			.collect();
		write_convergence_plot(&format!("Parameter comparison: {name}"), &series, &path);
		println!("Created comparison plot: {}", path.display());
	}
	Ok(())
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
	let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
	let ext = path.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_else(|| "csv".into());
	path.with_file_name(format!("{stem}_{suffix}.{ext}"))
}

fn print_report(report: &DEReport) {
	println!("Status: {}", report.message);
	println!(
		"Generations: {} | Evaluations: {} | Replacements: {}",
		report.nit, report.nfev, report.accepted
	);
	println!("Best objective: {:.6e}", report.fun);
	let mut best_vector = String::new();
	for (idx, value) in report.x.iter().enumerate() {
		if idx > 0 {
			best_vector.push_str(", ");
		}
		let _ = write!(&mut best_vector, "{value:.6}");
	}
	println!("Best parameters: [{}]", best_vector);
}

fn write_convergence_plot(title: &str, series: &[(String, &ConvergenceHistory)], path: &Path) {
	let mut plot = Plot::new();
	for (label, history) in series {
		let generations: Vec<usize> = (0..history.len()).collect();
		let values: Vec<f64> = history.iter().collect();
		plot.add_trace(Scatter::new(generations, values).mode(Mode::Lines).name(label.as_str()));
	}
	let layout = Layout::new()
		.title(Title::with_text(title))
		.width(1000)
		.height(600)
		.x_axis(Axis::new().title(Title::with_text("Generation")).type_(AxisType::Linear))
		.y_axis(Axis::new().title(Title::with_text("Best fitness")).type_(AxisType::Log));
	plot.set_layout(layout);
	plot.write_html(path);
}

fn list_available_functions() {
	let mut names: Vec<String> = get_function_metadata().into_keys().collect();
	names.sort();
	println!("Available test functions ({}):", names.len());
	for name in names {
		println!("- {name}");
	}
}

fn print_metadata(meta: &FunctionMetadata) {
	println!("Function metadata:");
	println!("  Name: {}", meta.name);
	println!("  Description: {}", meta.description);
	println!("  Typical dimensions: {:?}", meta.dimensions);
	println!("  Multimodal: {}", meta.multimodal);
	for (location, value) in &meta.global_minima {
		println!("  Global minimum: f({:?}) = {}", location, value);
	}
}
