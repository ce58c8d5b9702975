//! Multimodal test functions

use ndarray::Array1;
use std::f64::consts::PI;

/// Rastrigin function - N-dimensional, regular grid of local minima
/// Global minimum: f(x) = 0 at x = (0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn rastrigin(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum: f64 = x
        .iter()
        .map(|&xi| xi.powi(2) - 10.0 * (2.0 * PI * xi).cos())
        .sum();
    10.0 * n + sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rastrigin_minimum() {
        assert!(rastrigin(&array![0.0, 0.0, 0.0]).abs() < 1e-12);
    }

    #[test]
    fn test_rastrigin_local_minima() {
        // integer points are local minima with value sum(x_i^2)
        assert!((rastrigin(&array![1.0, 0.0]) - 1.0).abs() < 1e-9);
        assert!((rastrigin(&array![2.0, -1.0]) - 5.0).abs() < 1e-9);
        assert!(rastrigin(&array![0.5, 0.0]) > rastrigin(&array![1.0, 0.0]));
    }
}
