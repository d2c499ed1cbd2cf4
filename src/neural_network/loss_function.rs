/// Binary Cross Entropy loss function, paired with Sigmoid outputs
pub mod binary_cross_entropy;
/// Categorical Cross Entropy loss function, paired with Softmax outputs
pub mod categorical_cross_entropy;
/// Mean Squared Error loss function
pub mod mean_squared_error;

pub use binary_cross_entropy::*;
pub use categorical_cross_entropy::*;
pub use mean_squared_error::*;

use crate::error::{ModelError, ensure_finite};
use crate::neural_network::neural_network_trait::LossFunction;
use crate::neural_network::{Activation, Vector};
use std::fmt;

/// Added inside logarithms so that a zero probability gives a large but finite loss
pub const LOG_EPSILON: f64 = 1e-15;

/// Loss used at the output layer of a network
///
/// Configuration only knows two identifiers, `"mse"` and `"log"`. The log loss
/// is resolved against the output activation: Softmax gets categorical
/// cross-entropy and Sigmoid gets binary cross-entropy. In every log variant the
/// gradient is the simplified `predicted - expected`, which is only correct
/// because the activation's Jacobian cancels with the loss; `validate_pairing`
/// enforces that the loss and the activation actually match.
///
/// # Variants
///
/// - `MeanSquaredError` - For Identity, ReLU and LeakyReLU outputs
/// - `CategoricalCrossEntropy` - For Softmax outputs
/// - `BinaryCrossEntropy` - For Sigmoid outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loss {
    MeanSquaredError,
    CategoricalCrossEntropy,
    BinaryCrossEntropy,
}

impl Loss {
    /// Selects the loss the output activation requires
    ///
    /// Log loss for Softmax and Sigmoid, mean squared error for everything else.
    pub fn for_output(activation: Activation) -> Self {
        match activation {
            Activation::Softmax => Loss::CategoricalCrossEntropy,
            Activation::Sigmoid => Loss::BinaryCrossEntropy,
            Activation::Identity | Activation::ReLU | Activation::LeakyReLU => {
                Loss::MeanSquaredError
            }
        }
    }

    /// Resolves a configuration identifier (`"mse"` or `"log"`) for an output activation
    ///
    /// # Parameters
    ///
    /// - `identifier` - The loss name
    /// - `output_activation` - Activation of the layer the loss is computed on
    ///
    /// # Returns
    ///
    /// - `Ok(Loss)` - The concrete loss
    /// - `Err(ModelError::InputValidationError)` - Unknown identifier, or a pairing the backward pass cannot handle
    pub fn from_identifier(identifier: &str, output_activation: Activation) -> Result<Self, ModelError> {
        let loss = match identifier {
            "mse" => Loss::MeanSquaredError,
            "log" => match output_activation {
                Activation::Sigmoid => Loss::BinaryCrossEntropy,
                _ => Loss::CategoricalCrossEntropy,
            },
            other => {
                return Err(ModelError::InputValidationError(format!(
                    "unknown loss function '{}', expected 'mse' or 'log'",
                    other
                )));
            }
        };
        loss.validate_pairing(output_activation)?;
        Ok(loss)
    }

    /// Checks that this loss may be used with the given output activation
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The pairing is the one `for_output` would select
    /// - `Err(ModelError::InputValidationError)` - Any other pairing
    pub fn validate_pairing(&self, output_activation: Activation) -> Result<(), ModelError> {
        let required = Loss::for_output(output_activation);
        if *self != required {
            return Err(ModelError::InputValidationError(format!(
                "{} loss cannot be paired with a {} output layer, {} is required",
                self, output_activation, required
            )));
        }
        Ok(())
    }

    /// Computes the loss value for one sample
    ///
    /// # Parameters
    ///
    /// - `predicted` - Post-activation output of the final layer
    /// - `expected` - Target vector
    ///
    /// # Returns
    ///
    /// - `Ok(f64)` - The loss
    /// - `Err(ModelError::DimensionMismatch)` - The vectors differ in length
    /// - `Err(ModelError::NonFiniteValue)` - The loss is NaN or infinite
    pub fn compute_loss(&self, predicted: &Vector, expected: &Vector) -> Result<f64, ModelError> {
        check_lengths(predicted, expected)?;
        let loss = self.function().compute_loss(predicted, expected);
        ensure_finite(std::iter::once(&loss), "loss")?;
        Ok(loss)
    }

    /// Computes the gradient passed to the output layer's backward pass
    ///
    /// # Returns
    ///
    /// - `Ok(Vector)` - `predicted - expected` for every variant
    /// - `Err(ModelError::DimensionMismatch)` - The vectors differ in length
    pub fn compute_grad(&self, predicted: &Vector, expected: &Vector) -> Result<Vector, ModelError> {
        check_lengths(predicted, expected)?;
        let grad = self.function().compute_grad(predicted, expected);
        ensure_finite(grad.iter(), "loss gradient")?;
        Ok(grad)
    }

    /// Returns the configuration identifier of this loss
    pub fn identifier(&self) -> &'static str {
        match self {
            Loss::MeanSquaredError => "mse",
            Loss::CategoricalCrossEntropy | Loss::BinaryCrossEntropy => "log",
        }
    }

    fn function(&self) -> &'static dyn LossFunction {
        match self {
            Loss::MeanSquaredError => &MeanSquaredError,
            Loss::CategoricalCrossEntropy => &CategoricalCrossEntropy,
            Loss::BinaryCrossEntropy => &BinaryCrossEntropy,
        }
    }
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Loss::MeanSquaredError => "MeanSquaredError",
            Loss::CategoricalCrossEntropy => "CategoricalCrossEntropy",
            Loss::BinaryCrossEntropy => "BinaryCrossEntropy",
        };
        f.write_str(name)
    }
}

fn check_lengths(predicted: &Vector, expected: &Vector) -> Result<(), ModelError> {
    if predicted.len() != expected.len() {
        return Err(ModelError::DimensionMismatch(format!(
            "prediction has {} values but target has {}",
            predicted.len(),
            expected.len()
        )));
    }
    Ok(())
}
