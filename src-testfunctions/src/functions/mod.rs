//! Test function implementations organized by category
//!
//! - `unimodal`: single-optimum, bowl or valley shaped
//! - `multimodal`: many local minima

pub mod multimodal;
pub mod unimodal;

pub use multimodal::*;
pub use unimodal::*;
