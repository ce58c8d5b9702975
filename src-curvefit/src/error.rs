use diffevo_de::DEError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurveFitError {
    #[error("data is empty")]
    EmptyData,

    #[error("x has {x} samples but y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("model {model} takes {expected} parameters, got {got}")]
    ParameterCount { model: String, expected: usize, got: usize },

    #[error("noise standard deviation must be finite and >= 0, got {sigma}")]
    InvalidNoise { sigma: f64 },

    #[error("optimizer failed: {0}")]
    Optimizer(#[from] DEError),
}

pub type Result<T> = std::result::Result<T, CurveFitError>;
