use super::input_validation_function::*;
use crate::error::ModelError;
use crate::neural_network::{Matrix, Vector};
use ndarray::{Array, Dimension, Zip};

/// Hyperparameters of the Adam optimizer.
///
/// Set once on every layer through `NeuralNetwork::configure_optimizer` before
/// training starts.
///
/// # Fields
///
/// - `learning_rate` - Step size for parameter updates
/// - `beta1` - Exponential decay rate for the first moment estimates
/// - `beta2` - Exponential decay rate for the second moment estimates
/// - `epsilon` - Small constant added to the denominator for numerical stability
///
/// # Example
/// ```rust
/// use libless_nn::neural_network::AdamConfig;
///
/// let config = AdamConfig::new(0.01, 0.9, 0.999, 1e-8).unwrap();
/// assert_eq!(config.get_learning_rate(), 0.01);
///
/// assert!(AdamConfig::new(0.01, 1.0, 0.999, 1e-8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamConfig {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
}

impl AdamConfig {
    /// Creates a new Adam configuration with the specified parameters.
    ///
    /// # Parameters
    ///
    /// - `learning_rate` - Step size for parameter updates
    /// - `beta1` - Decay rate for the first moment estimates (typically 0.9)
    /// - `beta2` - Decay rate for the second moment estimates (typically 0.999)
    /// - `epsilon` - Small constant for numerical stability (typically 1e-8)
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new AdamConfig instance
    /// - `Err(ModelError::InputValidationError)` - If any parameter is out of range
    pub fn new(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        validate_decay_rate(beta1, "beta1")?;
        validate_decay_rate(beta2, "beta2")?;
        validate_epsilon(epsilon)?;

        Ok(Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
        })
    }

    /// Returns the learning rate
    pub fn get_learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Returns the first moment decay rate
    pub fn get_beta1(&self) -> f64 {
        self.beta1
    }

    /// Returns the second moment decay rate
    pub fn get_beta2(&self) -> f64 {
        self.beta2
    }

    /// Returns the numerical stability constant
    pub fn get_epsilon(&self) -> f64 {
        self.epsilon
    }
}

/// Stores and manages the Adam optimization state of one dense layer.
///
/// Holds the first and second moment estimates (moving averages of gradients and
/// squared gradients) for the weight matrix and the bias vector, plus the step
/// counter shared by both paths.
///
/// # Fields
///
/// - `m_weights` - First moment estimate for the weights
/// - `v_weights` - Second moment estimate for the weights
/// - `m_bias` - First moment estimate for the bias
/// - `v_bias` - Second moment estimate for the bias
/// - `t` - Number of update steps taken so far
#[derive(Debug, Clone, PartialEq)]
pub struct AdamStates {
    m_weights: Matrix,
    v_weights: Matrix,
    m_bias: Vector,
    v_bias: Vector,
    t: u64,
}

impl AdamStates {
    /// Creates a new Adam state object, initialized to zero
    ///
    /// # Parameters
    ///
    /// - `height` - Number of rows of the weight matrix and length of the bias
    /// - `previous_height` - Number of columns of the weight matrix
    pub fn new(height: usize, previous_height: usize) -> Self {
        Self {
            m_weights: Matrix::zeros((height, previous_height)),
            v_weights: Matrix::zeros((height, previous_height)),
            m_bias: Vector::zeros(height),
            v_bias: Vector::zeros(height),
            t: 0,
        }
    }

    /// Performs one Adam step on a layer's parameters
    ///
    /// The accumulated gradients are averaged over `batch_size`, the moments are
    /// updated, bias-corrected with the post-increment step count, and applied:
    /// `param -= lr * m_hat / (sqrt(v_hat) + epsilon)`. The weight and bias paths
    /// share the same step count and run in parallel.
    ///
    /// # Parameters
    ///
    /// - `weights` - Weight matrix to update in place
    /// - `bias` - Bias vector to update in place
    /// - `grad_weights` - Weight gradients summed over the batch
    /// - `grad_bias` - Bias gradients summed over the batch
    /// - `batch_size` - Number of samples that contributed to the sums, must be positive
    /// - `config` - Adam hyperparameters
    pub fn step(
        &mut self,
        weights: &mut Matrix,
        bias: &mut Vector,
        grad_weights: &Matrix,
        grad_bias: &Vector,
        batch_size: usize,
        config: &AdamConfig,
    ) {
        self.t += 1;
        let t = self.t;
        let scale = 1.0 / batch_size as f64;

        let AdamStates {
            m_weights,
            v_weights,
            m_bias,
            v_bias,
            ..
        } = self;

        rayon::join(
            || update_adam_param(weights, m_weights, v_weights, grad_weights, scale, config, t),
            || update_adam_param(bias, m_bias, v_bias, grad_bias, scale, config, t),
        );
    }

    /// Returns the bias-corrected first and second moment estimates of the weights
    ///
    /// With a constant gradient `g`, `m_hat` equals `g` and `v_hat` equals `g^2`
    /// after every step, while the raw moments only approach them as `t` grows.
    ///
    /// # Returns
    ///
    /// * `(Matrix, Matrix)` - `(m_hat, v_hat)`, both zero before the first step
    pub fn bias_corrected_weight_moments(&self, config: &AdamConfig) -> (Matrix, Matrix) {
        if self.t == 0 {
            return (self.m_weights.clone(), self.v_weights.clone());
        }
        let (correction1, correction2) = bias_corrections(config, self.t);
        (
            self.m_weights.mapv(|m| m / correction1),
            self.v_weights.mapv(|v| v / correction2),
        )
    }

    /// Returns the bias-corrected first and second moment estimates of the bias
    pub fn bias_corrected_bias_moments(&self, config: &AdamConfig) -> (Vector, Vector) {
        if self.t == 0 {
            return (self.m_bias.clone(), self.v_bias.clone());
        }
        let (correction1, correction2) = bias_corrections(config, self.t);
        (
            self.m_bias.mapv(|m| m / correction1),
            self.v_bias.mapv(|v| v / correction2),
        )
    }

    /// Returns the number of update steps taken so far
    pub fn get_step_count(&self) -> u64 {
        self.t
    }

    /// Returns the raw first moment estimate of the weights
    pub fn get_m_weights(&self) -> &Matrix {
        &self.m_weights
    }

    /// Returns the raw second moment estimate of the weights
    pub fn get_v_weights(&self) -> &Matrix {
        &self.v_weights
    }

    /// Returns the raw first moment estimate of the bias
    pub fn get_m_bias(&self) -> &Vector {
        &self.m_bias
    }

    /// Returns the raw second moment estimate of the bias
    pub fn get_v_bias(&self) -> &Vector {
        &self.v_bias
    }
}

/// Returns `(1 - beta1^t, 1 - beta2^t)`
fn bias_corrections(config: &AdamConfig, t: u64) -> (f64, f64) {
    let t = t as f64;
    (
        1.0 - config.beta1.powf(t),
        1.0 - config.beta2.powf(t),
    )
}

/// Helper function: update the moments of one parameter array and apply the step
///
/// # Effects
///
/// - `m = beta1 * m + (1 - beta1) * g`
/// - `v = beta2 * v + (1 - beta2) * g^2`
/// - `param -= lr * (m / (1 - beta1^t)) / (sqrt(v / (1 - beta2^t)) + epsilon)`
///
/// where `g` is the accumulated gradient multiplied by `scale`.
fn update_adam_param<D: Dimension>(
    param: &mut Array<f64, D>,
    m: &mut Array<f64, D>,
    v: &mut Array<f64, D>,
    grad: &Array<f64, D>,
    scale: f64,
    config: &AdamConfig,
    t: u64,
) {
    let (correction1, correction2) = bias_corrections(config, t);
    let AdamConfig {
        learning_rate,
        beta1,
        beta2,
        epsilon,
    } = *config;

    Zip::from(param)
        .and(m)
        .and(v)
        .and(grad)
        .for_each(|p, m, v, &g| {
            let g = g * scale;
            *m = beta1 * *m + (1.0 - beta1) * g;
            *v = beta2 * *v + (1.0 - beta2) * g * g;
            let m_hat = *m / correction1;
            let v_hat = *v / correction2;
            *p -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
        });
}
