use crate::neural_network::Vector;
use crate::neural_network::neural_network_trait::LossFunction;

/// Mean Squared Error loss function
///
/// The loss is the mean over outputs of `0.5 * (predicted - expected)^2`. The
/// gradient is `predicted - expected`, the derivative of the summed form
/// `0.5 * Σ (predicted - expected)^2`; the mean is only used for reporting.
///
/// # Example
///
/// ```rust
/// use libless_nn::neural_network::loss_function::MeanSquaredError;
/// use libless_nn::neural_network::LossFunction;
/// use ndarray::array;
///
/// let mse = MeanSquaredError::new();
/// let predicted = array![1.0, 2.0];
/// let expected = array![0.0, 2.0];
///
/// assert_eq!(mse.compute_loss(&predicted, &expected), 0.25);
/// assert_eq!(mse.compute_grad(&predicted, &expected), array![1.0, 0.0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl MeanSquaredError {
    /// Creates a new instance of MeanSquaredError
    pub fn new() -> Self {
        Self {}
    }
}

impl LossFunction for MeanSquaredError {
    fn compute_loss(&self, predicted: &Vector, expected: &Vector) -> f64 {
        let half_squared = (predicted - expected).mapv(|d| 0.5 * d * d);
        half_squared.sum() / half_squared.len() as f64
    }

    fn compute_grad(&self, predicted: &Vector, expected: &Vector) -> Vector {
        predicted - expected
    }
}
