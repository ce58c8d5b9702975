use clap::{Parser, ValueEnum};
use diffevo_curvefit::{CurveFitProblem, CurveModel, FitReport, FitSetup, fit_curve};
use diffevo_env::output_dir_or_default;
use log::error;
use plotly::{
    Layout, Plot, Scatter,
    common::{Mode, Title},
    layout::{Axis, AxisType},
};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelKind {
    Cooling,
    Sine,
}

#[derive(Parser, Debug)]
#[command(name = "fit_curve", about = "Fit a model to noisy synthetic data with Differential Evolution")]
struct Cli {
    /// Model to fit
    #[arg(long, value_enum, default_value = "cooling")]
    model: ModelKind,

    /// Seed for the synthetic noise and the optimizer
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Override the number of generations
    #[arg(long)]
    maxiter: Option<usize>,

    /// Output directory for plots (defaults to $DIFFEVO_DIR/data_generated)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Skip the HTML plots
    #[arg(long)]
    no_plot: bool,

    /// Print the fit report as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();
    let outcome = match args.model {
        ModelKind::Cooling => FitSetup::cooling(args.seed).map_err(Into::into).and_then(|s| run(&args, s)),
        ModelKind::Sine => FitSetup::sine(args.seed).map_err(Into::into).and_then(|s| run(&args, s)),
    };
    if let Err(e) = outcome {
        error!("{e}");
        process::exit(1);
    }
}

fn run<M: CurveModel>(args: &Cli, mut setup: FitSetup<M>) -> Result<(), Box<dyn Error>> {
    if let Some(maxiter) = args.maxiter {
        setup.config.maxiter = maxiter;
    }
    let report = fit_curve(&setup.problem, &setup.bounds, setup.config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&setup.problem, &report);
    }

    if !args.no_plot {
        let dir = output_dir_or_default(args.output_dir.as_deref())?;
        for path in write_plots(&setup.problem, &report, &dir) {
            println!("Created plot: {}", path.display());
        }
    }
    Ok(())
}

fn print_table<M: CurveModel>(problem: &CurveFitProblem<M>, report: &FitReport) {
    println!("\nModel: {}", report.model);
    println!("{:>10} {:>12} {:>12} {:>10}", "parameter", "true", "fitted", "error %");
    for (i, name) in report.parameter_names.iter().enumerate() {
        let truth = problem.truth().and_then(|t| t.get(i).copied());
        let rel = report.relative_errors.as_ref().and_then(|e| e.get(i).copied());
        println!(
            "{:>10} {:>12} {:>12.5} {:>10}",
            name,
            truth.map_or("-".to_string(), |t| format!("{t:.5}")),
            report.params[i],
            rel.map_or("-".to_string(), |r| format!("{:.2}", 100.0 * r)),
        );
    }
    println!("\nMSE: {:.6}", report.mse);
    if let Some(truth) = problem.truth() {
        println!("MSE at true parameters: {:.6}", problem.mse(truth));
    }
    println!("Residuals: mean {:.4}, std {:.4}", report.residual_mean, report.residual_std);
    println!("Generations: {} | Evaluations: {}", report.nit, report.nfev);
}

fn write_plots<M: CurveModel>(problem: &CurveFitProblem<M>, report: &FitReport, dir: &Path) -> Vec<PathBuf> {
    let x = problem.x().to_vec();
    let (lo, hi) = (x.first().copied().unwrap_or(0.0), x.last().copied().unwrap_or(1.0));
    let dense = ndarray::Array1::linspace(lo, hi, 400);

    let mut fit = Plot::new();
    fit.add_trace(Scatter::new(x.clone(), problem.y().to_vec()).mode(Mode::Markers).name("data"));
    if let Some(truth) = problem.truth() {
        let y = problem.model().predict(&dense, truth);
        fit.add_trace(Scatter::new(dense.to_vec(), y.to_vec()).mode(Mode::Lines).name("true model"));
    }
    let y = problem.model().predict(&dense, &report.params);
    fit.add_trace(Scatter::new(dense.to_vec(), y.to_vec()).mode(Mode::Lines).name("fitted model"));
    fit.set_layout(layout(&format!("{} fit (MSE {:.4})", report.model, report.mse), "x", "y", AxisType::Linear));

    let mut convergence = Plot::new();
    let generations: Vec<usize> = (0..report.history.len()).collect();
    convergence.add_trace(
        Scatter::new(generations, report.history.iter().collect::<Vec<f64>>()).mode(Mode::Lines).name("best MSE"),
    );
    convergence.set_layout(layout("Convergence", "Generation", "Best fitness", AxisType::Log));

    let mut residuals = Plot::new();
    residuals.add_trace(
        Scatter::new(x, problem.residuals(&report.params).to_vec()).mode(Mode::Markers).name("residual"),
    );
    residuals.set_layout(layout("Residuals", "x", "observed - fitted", AxisType::Linear));

    [("fit", fit), ("convergence", convergence), ("residuals", residuals)]
        .into_iter()
        .map(|(kind, plot)| {
            let path = dir.join(format!("{}_{kind}.html", report.model));
            plot.write_html(&path);
            path
        })
        .collect()
}

fn layout(title: &str, x_title: &str, y_title: &str, y_type: AxisType) -> Layout {
    Layout::new()
        .title(Title::with_text(title))
        .width(1000)
        .height(600)
        .x_axis(Axis::new().title(Title::with_text(x_title)))
        .y_axis(Axis::new().title(Title::with_text(y_title)).type_(y_type))
}
