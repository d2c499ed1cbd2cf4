use crate::error::ModelError;
use crate::neural_network::Vector;
use ndarray::Zip;
use std::fmt;
use std::str::FromStr;

/// Slope applied to negative inputs by `Activation::LeakyReLU`
pub const LEAKY_RELU_SLOPE: f64 = 0.01;

/// Sigmoid outputs are clipped to `[SIGMOID_CLIP, 1 - SIGMOID_CLIP]` so that
/// logarithms taken by the cross-entropy losses stay finite
pub const SIGMOID_CLIP: f64 = 1e-15;

/// Activation function applied by a layer to its affine output
///
/// The set is closed: every place that dispatches on an activation matches all
/// variants, and identifiers coming from configuration are parsed through
/// `FromStr`, which rejects unknown names instead of silently producing no output.
///
/// # Variants
///
/// - `Identity` - Pass-through (configured as `"None"`)
/// - `ReLU` - `max(0, x)` element-wise
/// - `LeakyReLU` - `x` if `x >= 0`, otherwise `0.01 * x`
/// - `Softmax` - Numerically stable softmax over the whole vector
/// - `Sigmoid` - Logistic function, clipped to `[1e-15, 1 - 1e-15]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activation {
    Identity,
    ReLU,
    LeakyReLU,
    Softmax,
    Sigmoid,
}

impl Activation {
    /// Applies the activation to a pre-activation vector
    ///
    /// # Parameters
    ///
    /// * `z` - The pre-activation (affine) output of a layer
    ///
    /// # Returns
    ///
    /// * `Vector` - The post-activation output, same length as `z`
    pub fn apply(&self, z: &Vector) -> Vector {
        match self {
            Activation::Identity => z.clone(),
            Activation::ReLU => z.mapv(|x| x.max(0.0)),
            Activation::LeakyReLU => z.mapv(|x| if x >= 0.0 { x } else { LEAKY_RELU_SLOPE * x }),
            Activation::Softmax => {
                // subtracting the max keeps exp() from overflowing; the max
                // element contributes exp(0) = 1, so the sum is never below 1
                let max_val = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let exps = z.mapv(|x| (x - max_val).exp());
                let sum = exps.sum();
                exps / sum
            }
            Activation::Sigmoid => z.mapv(|x| {
                (1.0 / (1.0 + (-x).exp())).clamp(SIGMOID_CLIP, 1.0 - SIGMOID_CLIP)
            }),
        }
    }

    /// Passes an upstream gradient back through the activation
    ///
    /// ReLU zeroes and LeakyReLU scales the positions whose pre-activation was
    /// negative. Identity, Softmax and Sigmoid return the upstream gradient
    /// unchanged: for the two probabilistic activations the Jacobian has already
    /// been folded into the `p - y` gradient of the paired cross-entropy loss.
    ///
    /// # Parameters
    ///
    /// - `pre_activation` - The pre-activation vector stored by the forward pass
    /// - `upstream` - Gradient of the loss with respect to this layer's output
    ///
    /// # Returns
    ///
    /// * `Vector` - Gradient of the loss with respect to the pre-activation
    pub fn backward(&self, pre_activation: &Vector, upstream: &Vector) -> Vector {
        match self {
            Activation::ReLU => Zip::from(pre_activation)
                .and(upstream)
                .map_collect(|&z, &g| if z < 0.0 { 0.0 } else { g }),
            Activation::LeakyReLU => Zip::from(pre_activation)
                .and(upstream)
                .map_collect(|&z, &g| if z < 0.0 { LEAKY_RELU_SLOPE * g } else { g }),
            Activation::Identity | Activation::Softmax | Activation::Sigmoid => upstream.clone(),
        }
    }

    /// Whether the activation produces probabilities (and must be paired with log loss)
    pub fn is_probabilistic(&self) -> bool {
        matches!(self, Activation::Softmax | Activation::Sigmoid)
    }

    /// Whether the activation may be used on the input and inner layers
    ///
    /// Only element-wise activations with an exact backward mask qualify; the
    /// probabilistic ones rely on cancellation with the loss, which only
    /// happens at the output layer.
    pub fn is_valid_inner(&self) -> bool {
        matches!(
            self,
            Activation::Identity | Activation::ReLU | Activation::LeakyReLU
        )
    }

    /// Returns the configuration name of the activation
    pub fn name(&self) -> &'static str {
        match self {
            Activation::Identity => "None",
            Activation::ReLU => "ReLU",
            Activation::LeakyReLU => "LeakyReLU",
            Activation::Softmax => "Softmax",
            Activation::Sigmoid => "Sigmoid",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" | "Identity" => Ok(Activation::Identity),
            "ReLU" => Ok(Activation::ReLU),
            "LeakyReLU" | "Leaky_ReLU" => Ok(Activation::LeakyReLU),
            "Softmax" => Ok(Activation::Softmax),
            "Sigmoid" => Ok(Activation::Sigmoid),
            other => Err(ModelError::InputValidationError(format!(
                "unknown activation function '{}', expected one of None, ReLU, LeakyReLU, Softmax, Sigmoid",
                other
            ))),
        }
    }
}
