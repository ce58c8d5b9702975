//! Recording wrapper for differential evolution, used for testing and analysis

use std::path::{Path, PathBuf};

use crate::recorder::OptimizationRecorder;
use crate::{Bounds, DEConfig, DEReport, DifferentialEvolution, Objective, Result};

/// Run differential evolution and write one CSV row per generation to
/// `<output_dir>/<function_name>.csv`.
///
/// Returns the report together with the path of the CSV file.
pub fn run_recorded_differential_evolution<F, P>(
    function_name: &str,
    func: &F,
    bounds: &[(f64, f64)],
    config: DEConfig,
    output_dir: P,
) -> Result<(DEReport, PathBuf)>
where
    F: Objective + ?Sized,
    P: AsRef<Path>,
{
    let recorder = OptimizationRecorder::new(function_name);
    let mut de = DifferentialEvolution::new(func, Bounds::new(bounds)?, config)?;
    de.add_observer(recorder.create_observer());
    let report = de.optimize()?;
    let csv_path = recorder.save_to_csv(output_dir)?;
    Ok((report, csv_path))
}
