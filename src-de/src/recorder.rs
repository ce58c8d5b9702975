use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::observer::{DEObserver, GenerationEvent};

/// Records optimization progress, one row per generation
#[derive(Debug)]
pub struct OptimizationRecorder {
    /// Function name (used for CSV filename)
    function_name: String,
    records: Arc<Mutex<Vec<OptimizationRecord>>>,
}

/// A single generation record
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRecord {
    pub generation: usize,
    /// Best x found so far (empty while no finite fitness has been seen)
    pub x: Vec<f64>,
    /// Best function result so far
    pub best_result: f64,
    /// Mean of the finite population fitness values
    pub mean: f64,
    /// Standard deviation of the finite population fitness values
    pub std: f64,
    /// Replacements made in this generation
    pub accepted: usize,
    /// Whether this generation improved the best known result
    pub is_improvement: bool,
}

/// Observer half of a recorder, attached to an optimizer.
pub struct RecordingObserver {
    records: Arc<Mutex<Vec<OptimizationRecord>>>,
    best_value: Option<f64>,
}

impl DEObserver for RecordingObserver {
    fn on_generation(&mut self, event: &GenerationEvent) {
        let is_improvement = match self.best_value {
            Some(best) => event.best_fitness < best,
            None => event.best_fitness.is_finite(),
        };
        if is_improvement {
            self.best_value = Some(event.best_fitness);
        }
        self.records.lock().push(OptimizationRecord {
            generation: event.generation,
            x: event.best_x.as_ref().map(|x| x.to_vec()).unwrap_or_default(),
            best_result: event.best_fitness,
            mean: event.mean_fitness,
            std: event.std_fitness,
            accepted: event.accepted,
            is_improvement,
        });
    }
}

impl OptimizationRecorder {
    /// Create a new optimization recorder for the given function
    pub fn new(function_name: impl Into<String>) -> Self {
        Self { function_name: function_name.into(), records: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Create an observer that appends to this recorder
    pub fn create_observer(&self) -> RecordingObserver {
        RecordingObserver { records: self.records.clone(), best_value: None }
    }

    /// Save all records to `<output_dir>/<function_name>.csv` and return the path
    pub fn save_to_csv<P: AsRef<Path>>(&self, output_dir: P) -> Result<PathBuf> {
        create_dir_all(output_dir.as_ref())?;
        let filename = output_dir.as_ref().join(format!("{}.csv", self.function_name));

        let records = self.records.lock();
        let num_dimensions = records.iter().map(|r| r.x.len()).max().unwrap_or(0);

        let mut wtr = csv::Writer::from_path(&filename)?;
        let mut header = vec!["generation".to_string()];
        header.extend((0..num_dimensions).map(|i| format!("x{}", i)));
        header.extend(["best_result", "mean", "std", "accepted", "is_improvement"].map(String::from));
        wtr.write_record(&header)?;

        for record in records.iter() {
            let mut row = vec![record.generation.to_string()];
            for i in 0..num_dimensions {
                row.push(record.x.get(i).map(|v| format!("{:.16}", v)).unwrap_or_default());
            }
            row.push(format!("{:.16}", record.best_result));
            row.push(format!("{:.16}", record.mean));
            row.push(format!("{:.16}", record.std));
            row.push(record.accepted.to_string());
            row.push(record.is_improvement.to_string());
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(filename)
    }

    /// Get a copy of all records
    pub fn get_records(&self) -> Vec<OptimizationRecord> {
        self.records.lock().clone()
    }

    pub fn num_generations(&self) -> usize {
        self.records.lock().len()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// Best solution of the last recorded generation
    pub fn get_best_solution(&self) -> Option<(Vec<f64>, f64)> {
        self.records.lock().last().map(|r| (r.x.clone(), r.best_result))
    }
}
