//! Optimization test functions library
//!
//! Objective functions used to exercise the Differential Evolution optimizer,
//! with their usual search bounds and known global minima:
//!
//! - **Unimodal**: sphere, rosenbrock, square_1d
//! - **Multimodal**: rastrigin
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use diffevo_testfunctions::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! assert_eq!(sphere(&x), 0.0);
//!
//! let bounds = get_function_bounds_vec("rosenbrock", 5);
//! assert_eq!(bounds, vec![(-5.0, 10.0); 5]);
//! ```

use ndarray::Array1;
use serde::Serialize;
use std::collections::HashMap;

pub mod functions;
pub use functions::*;

/// Signature shared by every test function
pub type TestFunction = fn(&Array1<f64>) -> f64;

/// Metadata for a test function including bounds and known minima
#[derive(Debug, Clone, Serialize)]
pub struct FunctionMetadata {
    /// Function name
    pub name: String,
    /// Bounds for each dimension (min, max) at the default dimension
    pub bounds: Vec<(f64, f64)>,
    /// Global minima locations and values at the default dimension
    pub global_minima: Vec<(Vec<f64>, f64)>,
    /// Description of the function
    pub description: String,
    /// Whether the function is multimodal
    pub multimodal: bool,
    /// Typical dimension(s) for the function; the first is the default
    pub dimensions: Vec<usize>,
}

/// Same `(lower, upper)` pair repeated over `n` dimensions
pub fn create_bounds(n: usize, lower: f64, upper: f64) -> Vec<(f64, f64)> {
    vec![(lower, upper); n]
}

/// Get metadata for all available test functions
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
    let mut metadata = HashMap::new();

    metadata.insert(
        "sphere".to_string(),
        FunctionMetadata {
            name: "sphere".to_string(),
            bounds: vec![(-10.0, 10.0); 5],
            global_minima: vec![(vec![0.0; 5], 0.0)],
            description: "N-dimensional sum of squares".to_string(),
            multimodal: false,
            dimensions: vec![5, 2, 10],
        },
    );

    metadata.insert(
        "rastrigin".to_string(),
        FunctionMetadata {
            name: "rastrigin".to_string(),
            bounds: vec![(-5.12, 5.12); 10],
            global_minima: vec![(vec![0.0; 10], 0.0)],
            description: "N-dimensional multimodal function with a grid of local minima".to_string(),
            multimodal: true,
            dimensions: vec![10, 2, 5],
        },
    );

    metadata.insert(
        "rosenbrock".to_string(),
        FunctionMetadata {
            name: "rosenbrock".to_string(),
            bounds: vec![(-5.0, 10.0); 5],
            global_minima: vec![(vec![1.0; 5], 0.0)],
            description: "N-dimensional curved valley".to_string(),
            multimodal: false,
            dimensions: vec![5, 2, 10],
        },
    );

    metadata.insert(
        "square_1d".to_string(),
        FunctionMetadata {
            name: "square_1d".to_string(),
            bounds: vec![(-10.0, 10.0)],
            global_minima: vec![(vec![0.0], 0.0)],
            description: "1D parabola x^2".to_string(),
            multimodal: false,
            dimensions: vec![1],
        },
    );

    metadata
}

/// Look up a test function by name
pub fn get_function(function_name: &str) -> Option<TestFunction> {
    match function_name {
        "sphere" => Some(sphere),
        "rastrigin" => Some(rastrigin),
        "rosenbrock" => Some(rosenbrock),
        "square_1d" => Some(square_1d),
        _ => None,
    }
}

/// Bounds at the function's default dimension, if the function is known
pub fn get_function_bounds(function_name: &str) -> Option<Vec<(f64, f64)>> {
    let metadata = get_function_metadata();
    metadata.get(function_name).map(|meta| meta.bounds.clone())
}

/// Bounds over `dim` dimensions, repeating the function's per-dimension range.
/// Unknown functions fall back to `[-10, 10]`; `square_1d` is always 1-D.
pub fn get_function_bounds_vec(function_name: &str, dim: usize) -> Vec<(f64, f64)> {
    match function_name {
        "square_1d" => vec![(-10.0, 10.0)],
        _ => {
            let pair = get_function_bounds(function_name)
                .and_then(|b| b.first().copied())
                .unwrap_or((-10.0, 10.0));
            create_bounds(dim, pair.0, pair.1)
        }
    }
}
