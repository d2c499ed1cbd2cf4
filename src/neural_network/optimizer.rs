/// Adam hyperparameters and the per-layer moment estimates
pub mod adam;
/// Validation helpers for optimizer hyperparameters
mod input_validation_function;

pub use adam::*;
