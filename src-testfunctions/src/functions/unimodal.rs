//! Unimodal test functions

use ndarray::Array1;

/// Sphere function - N-dimensional sum of squares
/// Global minimum: f(x) = 0 at x = (0, ..., 0)
/// Bounds: x_i in [-10, 10]
pub fn sphere(x: &Array1<f64>) -> f64 {
    x.iter().map(|&xi| xi * xi).sum()
}

/// Square of the first coordinate, the 1-D teaching example
/// Global minimum: f(x) = 0 at x = 0
/// Bounds: x in [-10, 10]
pub fn square_1d(x: &Array1<f64>) -> f64 {
    x[0] * x[0]
}

/// Rosenbrock function - N-dimensional curved valley
/// Global minimum: f(x) = 0 at x = (1, ..., 1)
/// Bounds: x_i in [-5, 10]
pub fn rosenbrock(x: &Array1<f64>) -> f64 {
    (0..x.len().saturating_sub(1))
        .map(|i| 100.0 * (x[i + 1] - x[i] * x[i]).powi(2) + (1.0 - x[i]).powi(2))
        .sum()
}
