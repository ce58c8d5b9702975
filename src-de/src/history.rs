use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Best fitness after each completed generation, in order.
///
/// Append-only while the optimizer runs; never read back by the algorithm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConvergenceHistory(Vec<f64>);

impl ConvergenceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    pub(crate) fn push(&mut self, best_fitness: f64) {
        self.0.push(best_fitness);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, generation: usize) -> Option<f64> {
        self.0.get(generation).copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of generations whose best fitness is strictly below the previous one.
    pub fn improvements(&self) -> usize {
        self.0.windows(2).filter(|w| w[1] < w[0]).count()
    }

    pub fn is_non_increasing(&self) -> bool {
        self.0.windows(2).all(|w| w[1] <= w[0])
    }

    /// Writes `generation,best_fitness` rows.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["generation", "best_fitness"])?;
        for (generation, value) in self.0.iter().enumerate() {
            wtr.write_record([generation.to_string(), value.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl From<ConvergenceHistory> for Vec<f64> {
    fn from(history: ConvergenceHistory) -> Self {
        history.0
    }
}

impl<'a> IntoIterator for &'a ConvergenceHistory {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
