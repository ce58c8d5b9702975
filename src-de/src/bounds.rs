use ndarray::{Array1, ArrayView1, Zip};

use crate::error::{DEError, Result};

/// Per-dimension inclusive box constraints `[min_d, max_d]`.
///
/// Validated once at construction: at least one dimension, every pair finite
/// with `min < max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
	lower: Array1<f64>,
	upper: Array1<f64>,
}

impl Bounds {
	/// Builds bounds from ordered `(min, max)` pairs.
	pub fn new(pairs: &[(f64, f64)]) -> Result<Self> {
		if pairs.is_empty() {
			return Err(DEError::EmptyBounds);
		}
		for (index, &(lower, upper)) in pairs.iter().enumerate() {
			// written so that NaN fails the check
			if !(lower.is_finite() && upper.is_finite() && lower < upper) {
				return Err(DEError::InvalidBounds { index, lower, upper });
			}
		}
		Ok(Self {
			lower: pairs.iter().map(|&(lo, _)| lo).collect(),
			upper: pairs.iter().map(|&(_, hi)| hi).collect(),
		})
	}

	/// Same bounds `(lower, upper)` repeated over `n` dimensions.
	pub fn uniform(n: usize, lower: f64, upper: f64) -> Result<Self> {
		Self::new(&vec![(lower, upper); n])
	}

	/// Number of dimensions D.
	pub fn dim(&self) -> usize {
		self.lower.len()
	}

	pub fn lower(&self) -> &Array1<f64> {
		&self.lower
	}

	pub fn upper(&self) -> &Array1<f64> {
		&self.upper
	}

	/// Bounds as `(min, max)` pairs.
	pub fn pairs(&self) -> Vec<(f64, f64)> {
		self.lower.iter().zip(self.upper.iter()).map(|(&lo, &hi)| (lo, hi)).collect()
	}

	/// Returns a copy of `x` with every gene clipped into its range.
	///
	/// Plain min/max clamping: no reflection, no wrap-around, no resampling.
	pub fn clamp(&self, x: &Array1<f64>) -> Array1<f64> {
		let mut out = x.clone();
		self.clamp_inplace(&mut out);
		out
	}

	/// Clips `x` into the box in place.
	pub fn clamp_inplace(&self, x: &mut Array1<f64>) {
		debug_assert_eq!(x.len(), self.dim());
		Zip::from(x).and(&self.lower).and(&self.upper).for_each(|xi, &lo, &hi| {
			*xi = xi.clamp(lo, hi);
		});
	}

	/// `true` when every gene of `x` lies in its closed range.
	pub fn contains(&self, x: ArrayView1<f64>) -> bool {
		x.len() == self.dim()
			&& Zip::from(&x)
				.and(&self.lower)
				.and(&self.upper)
				.all(|&xi, &lo, &hi| lo <= xi && xi <= hi)
	}
}
