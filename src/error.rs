/// Error types that can occur while building, configuring or training a network
///
/// # Variants
///
/// - `InputValidationError` - A configuration value or identifier is invalid (unknown activation or loss name, zero sizes, bad batch size, mismatched activation/loss pairing, ...)
/// - `DimensionMismatch` - A vector or matrix does not have the width a layer expects
/// - `NotConfigured` - An operation needs the optimizer hyperparameters but `configure_optimizer` was never called
/// - `NonFiniteValue` - A NaN or infinite value showed up in outputs, losses or gradients
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    InputValidationError(String),
    DimensionMismatch(String),
    NotConfigured(String),
    NonFiniteValue(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InputValidationError(msg) => write!(f, "Input validation error: {}", msg),
            ModelError::DimensionMismatch(msg) => write!(f, "Dimension mismatch: {}", msg),
            ModelError::NotConfigured(msg) => write!(f, "Not configured: {}", msg),
            ModelError::NonFiniteValue(msg) => write!(f, "Non-finite value: {}", msg),
        }
    }
}

/// Implements the standard error trait for ModelError
impl std::error::Error for ModelError {}

/// Returns `Err(ModelError::NonFiniteValue)` if any element of `values` is NaN or infinite.
///
/// # Parameters
///
/// - `values` - The values to inspect
/// - `what` - Short description of the values, used in the error message
pub(crate) fn ensure_finite<'a, I>(values: I, what: &str) -> Result<(), ModelError>
where
    I: IntoIterator<Item = &'a f64>,
{
    if values.into_iter().any(|x| !x.is_finite()) {
        return Err(ModelError::NonFiniteValue(format!(
            "{} contains NaN or infinite values",
            what
        )));
    }
    Ok(())
}
