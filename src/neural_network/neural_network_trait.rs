use crate::neural_network::Vector;

/// Defines the interface for the loss functions a network can be trained with.
///
/// Both methods take the prediction first and the expected target second and
/// assume the two vectors have the same length; the `Loss` enum checks that
/// before dispatching.
pub trait LossFunction {
    /// Computes the loss between the predicted and expected vectors.
    ///
    /// # Parameters
    ///
    /// - `predicted` - Output of the network for one sample
    /// - `expected` - Target vector for that sample
    ///
    /// # Returns
    ///
    /// - `f64` - The scalar loss value
    fn compute_loss(&self, predicted: &Vector, expected: &Vector) -> f64;

    /// Computes the gradient that is fed into the output layer's backward pass.
    ///
    /// # Parameters
    ///
    /// - `predicted` - Output of the network for one sample
    /// - `expected` - Target vector for that sample
    ///
    /// # Returns
    ///
    /// - `Vector` - Gradient with the same length as `predicted`
    fn compute_grad(&self, predicted: &Vector, expected: &Vector) -> Vector;
}
