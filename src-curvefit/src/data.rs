use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::error::{CurveFitError, Result};
use crate::models::{CoolingModel, CurveModel, SineModel};

/// Noisy samples of a model with known parameters.
#[derive(Debug, Clone, Serialize)]
pub struct SyntheticData {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    /// Parameters the noiseless curve was drawn from
    pub truth: Vec<f64>,
}

impl SyntheticData {
    /// Evaluates `model` at `x` and adds N(0, sigma²) noise to every sample.
    pub fn generate<M: CurveModel, R: Rng + ?Sized>(
        model: &M,
        truth: &[f64],
        x: Array1<f64>,
        sigma: f64,
        rng: &mut R,
    ) -> Result<Self> {
        // Normal::new accepts a negative std_dev
        if !(sigma.is_finite() && sigma >= 0.0) {
            return Err(CurveFitError::InvalidNoise { sigma });
        }
        let noise = Normal::new(0.0, sigma).map_err(|_| CurveFitError::InvalidNoise { sigma })?;
        if truth.len() != model.n_params() {
            return Err(CurveFitError::ParameterCount {
                model: model.name().to_string(),
                expected: model.n_params(),
                got: truth.len(),
            });
        }
        let mut y = model.predict(&x, truth);
        y.mapv_inplace(|v| v + noise.sample(&mut *rng));
        Ok(Self { x, y, truth: truth.to_vec() })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Cooling curve T = 20 + 80 exp(-0.1 t), 30 samples on [0, 30], sigma = 2
pub fn cooling_data<R: Rng + ?Sized>(rng: &mut R) -> Result<SyntheticData> {
    SyntheticData::generate(&CoolingModel, &[20.0, 100.0, 0.1], Array1::linspace(0.0, 30.0, 30), 2.0, rng)
}

/// Sinusoid y = 3 sin(2x + 0.5) + 1, 50 samples on [0, 10], sigma = 0.3
pub fn sine_data<R: Rng + ?Sized>(rng: &mut R) -> Result<SyntheticData> {
    SyntheticData::generate(&SineModel, &[3.0, 2.0, 0.5, 1.0], Array1::linspace(0.0, 10.0, 50), 0.3, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_cooling_data_shape() {
        let data = cooling_data(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(data.len(), 30);
        assert_eq!(data.x[0], 0.0);
        assert!((data.x[29] - 30.0).abs() < 1e-12);
        assert_eq!(data.truth, vec![20.0, 100.0, 0.1]);
    }

    #[test]
    fn test_noise_level() {
        let x = Array1::linspace(0.0, 10.0, 2000);
        let data = SyntheticData::generate(&SineModel, &[3.0, 2.0, 0.5, 1.0], x, 0.3, &mut StdRng::seed_from_u64(2)).unwrap();
        let clean = SineModel.predict(&data.x, &data.truth);
        let noise = &data.y - &clean;
        let std = noise.std(0.0);
        assert!((std - 0.3).abs() < 0.03, "std={}", std);
        assert!(noise.mean().unwrap().abs() < 0.03);
    }

    #[test]
    fn test_zero_noise_is_exact() {
        let x = Array1::linspace(0.0, 5.0, 11);
        let data = SyntheticData::generate(&CoolingModel, &[20.0, 100.0, 0.1], x, 0.0, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(data.y, CoolingModel.predict(&data.x, &data.truth));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = StdRng::seed_from_u64(4);
        let x = Array1::linspace(0.0, 1.0, 3);
        assert!(matches!(
            SyntheticData::generate(&SineModel, &[1.0, 2.0, 3.0, 4.0], x.clone(), -1.0, &mut rng),
            Err(CurveFitError::InvalidNoise { .. })
        ));
        for sigma in [-1e-9, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    SyntheticData::generate(&SineModel, &[1.0, 2.0, 3.0, 4.0], x.clone(), sigma, &mut rng),
                    Err(CurveFitError::InvalidNoise { .. })
                ),
                "sigma={}",
                sigma
            );
        }
        assert!(matches!(
            SyntheticData::generate(&SineModel, &[1.0], x, 0.1, &mut rng),
            Err(CurveFitError::ParameterCount { expected: 4, got: 1, .. })
        ));
    }
}
