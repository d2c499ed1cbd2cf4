use crate::neural_network::{Matrix, Vector};

/// Read-only view of the parameters of a dense layer
///
/// Returned by `NeuralNetwork::export_parameters`, one per layer in order from
/// the input side to the output side. Call `to_owned` on the fields to keep a
/// copy that outlives the network borrow.
///
/// # Fields
///
/// - `weight` - Weight matrix with shape (height, previous_height)
/// - `bias` - Bias vector with length height
#[derive(Debug, Clone, Copy)]
pub struct LayerWeight<'a> {
    pub weight: &'a Matrix,
    pub bias: &'a Vector,
}
