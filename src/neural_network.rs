/// Module that contains the activation functions
pub mod activation;
/// Module that contains the dense layer and its per-sample values
pub mod layer;
/// Module that contains the loss functions and the loss/activation pairing policy
pub mod loss_function;
/// Module that contains the loss function trait
pub mod neural_network_trait;
/// Module that contains the network orchestrating layers through training and prediction
pub mod network;
/// Module that contains the Adam optimizer
pub mod optimizer;

pub use activation::*;
pub use layer::*;
pub use loss_function::*;
pub use network::*;
pub use optimizer::*;

pub use neural_network_trait::LossFunction;

use ndarray::{Array1, Array2};

/// Type alias for a single sample, target, gradient or bias vector
pub type Vector = Array1<f64>;

/// Type alias for weight matrices and for batches of samples (one per row)
pub type Matrix = Array2<f64>;
