use super::LOG_EPSILON;
use crate::neural_network::Vector;
use crate::neural_network::neural_network_trait::LossFunction;

/// Categorical Cross Entropy loss function for multi-class classification
///
/// Paired with a Softmax output layer. The loss is `-Σ expected * ln(predicted + ε)`
/// and the gradient returned is `predicted - expected`, which is the gradient
/// with respect to the softmax logits when `expected` is one-hot.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoricalCrossEntropy;

impl CategoricalCrossEntropy {
    /// Creates a new instance of CategoricalCrossEntropy
    pub fn new() -> Self {
        Self {}
    }
}

impl LossFunction for CategoricalCrossEntropy {
    fn compute_loss(&self, predicted: &Vector, expected: &Vector) -> f64 {
        -predicted
            .iter()
            .zip(expected.iter())
            .map(|(&p, &y)| y * (p + LOG_EPSILON).ln())
            .sum::<f64>()
    }

    fn compute_grad(&self, predicted: &Vector, expected: &Vector) -> Vector {
        predicted - expected
    }
}
