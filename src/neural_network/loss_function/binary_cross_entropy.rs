use super::LOG_EPSILON;
use crate::neural_network::Vector;
use crate::neural_network::neural_network_trait::LossFunction;

/// Binary Cross Entropy loss function, one independent binary decision per output
///
/// Paired with a Sigmoid output layer. The loss is
/// `-Σ [y * ln(p + ε) + (1 - y) * ln(1 - p + ε)]` and the gradient returned is
/// `p - y`, the exact gradient with respect to the sigmoid logits.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCrossEntropy;

impl BinaryCrossEntropy {
    /// Creates a new instance of BinaryCrossEntropy
    pub fn new() -> Self {
        Self {}
    }
}

impl LossFunction for BinaryCrossEntropy {
    fn compute_loss(&self, predicted: &Vector, expected: &Vector) -> f64 {
        -predicted
            .iter()
            .zip(expected.iter())
            .map(|(&p, &y)| y * (p + LOG_EPSILON).ln() + (1.0 - y) * (1.0 - p + LOG_EPSILON).ln())
            .sum::<f64>()
    }

    fn compute_grad(&self, predicted: &Vector, expected: &Vector) -> Vector {
        predicted - expected
    }
}
