use ndarray::Array1;

/// One target/trial competition, reported after the replacement decision.
#[derive(Debug, Clone, Copy)]
pub struct TrialEvent<'a> {
    pub generation: usize,
    pub index: usize,
    pub target: &'a Array1<f64>,
    pub trial: &'a Array1<f64>,
    pub fitness_target: f64,
    pub fitness_trial: f64,
    pub accepted: bool,
}

/// Summary of a completed generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationEvent {
    /// Zero-based index of the generation that just completed
    pub generation: usize,
    /// Best-ever individual after this generation (`None` while every fitness is non-finite)
    pub best_x: Option<Array1<f64>>,
    pub best_fitness: f64,
    /// Replacements made in this generation
    pub accepted: usize,
    /// Mean and standard deviation of the finite fitness values of the population
    pub mean_fitness: f64,
    pub std_fitness: f64,
}

/// Progress hooks invoked by the optimizer; the core itself never prints.
///
/// Both methods default to no-ops. Any `FnMut(&GenerationEvent)` closure is
/// an observer that only listens to generations.
pub trait DEObserver {
    fn on_trial(&mut self, _event: &TrialEvent<'_>) {}

    fn on_generation(&mut self, _event: &GenerationEvent) {}
}

impl<F> DEObserver for F
where
    F: FnMut(&GenerationEvent),
{
    fn on_generation(&mut self, event: &GenerationEvent) {
        self(event)
    }
}
