//! A from-scratch feed-forward neural network trainer.
//!
//! Forward propagation, backpropagation and the Adam optimizer are written by
//! hand on top of `ndarray`; there is no automatic differentiation. Networks are
//! fully connected, trained one sample at a time with gradients accumulated
//! into minibatches, and meant for small numeric datasets such as flattened
//! pixel intensities or flower measurements.
//!
//! # Example
//! ```rust
//! use libless_nn::prelude::*;
//! use ndarray::array;
//!
//! let architecture = NetworkArchitecture::new(2, 1, 8, 2, Activation::LeakyReLU, Activation::Softmax);
//! let mut network = NeuralNetwork::new(architecture, 0).unwrap();
//! network.configure_optimizer(AdamConfig::new(0.01, 0.9, 0.999, 1e-8).unwrap());
//!
//! let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
//! let y = to_categorical(&[0, 1, 1, 0], 2).unwrap();
//!
//! let history = network.train(10, &x, &y, 2).unwrap();
//! assert!(history.final_loss().unwrap().is_finite());
//!
//! let predictions = network.predict(&x).unwrap();
//! let acc = accuracy(&predictions, &y).unwrap();
//! assert!((0.0..=1.0).contains(&acc));
//! ```

/// Error type shared by every module
pub mod error;

/// Module `neural_network` contains the training engine.
///
/// # Core Components
///
/// - `Activation` - Closed set of activation functions (Identity, ReLU, LeakyReLU, Softmax, Sigmoid)
/// - `Loss` - Output losses and the rule that pairs them with output activations
/// - `Dense` - A fully connected layer with its gradient accumulators and Adam state
/// - `AdamConfig` / `AdamStates` - Adam hyperparameters and moment estimates
/// - `NeuralNetwork` - Builds the layer stack, trains it with minibatches and predicts
pub mod neural_network;

/// Module `utility` contains data preparation helpers used around the engine:
/// one-hot encoding and a shuffled train/evaluation split.
pub mod utility;

/// Module `metric` contains evaluation helpers for predictions: argmax accuracy
/// and the mean half squared error.
pub mod metric;

/// Convenience re-exports of the commonly used types and functions
pub mod prelude;
