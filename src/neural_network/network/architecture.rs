use crate::error::ModelError;
use crate::neural_network::Activation;

/// Shape and activations of a fully connected network
///
/// The network built from it has `inner_layer_count + 2` dense layers: an input
/// layer mapping `input_size -> hidden_width`, `inner_layer_count` layers mapping
/// `hidden_width -> hidden_width`, and an output layer mapping
/// `hidden_width -> output_size`.
///
/// # Fields
///
/// - `input_size` - Width of every sample vector
/// - `inner_layer_count` - Number of hidden-to-hidden layers
/// - `hidden_width` - Number of neurons of every non-output layer
/// - `output_size` - Width of the prediction and target vectors
/// - `inner_activation` - Activation of every non-output layer (Identity, ReLU or LeakyReLU)
/// - `output_activation` - Activation of the output layer
///
/// # Example
/// ```rust
/// use libless_nn::neural_network::{Activation, NetworkArchitecture};
///
/// let architecture = NetworkArchitecture::new(4, 1, 16, 3, Activation::LeakyReLU, Activation::Softmax);
/// assert!(architecture.validate().is_ok());
/// assert_eq!(architecture.layer_dimensions(), vec![(4, 16), (16, 16), (16, 3)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkArchitecture {
    pub input_size: usize,
    pub inner_layer_count: usize,
    pub hidden_width: usize,
    pub output_size: usize,
    pub inner_activation: Activation,
    pub output_activation: Activation,
}

impl NetworkArchitecture {
    /// Creates a new architecture description
    pub fn new(
        input_size: usize,
        inner_layer_count: usize,
        hidden_width: usize,
        output_size: usize,
        inner_activation: Activation,
        output_activation: Activation,
    ) -> Self {
        Self {
            input_size,
            inner_layer_count,
            hidden_width,
            output_size,
            inner_activation,
            output_activation,
        }
    }

    /// Checks the architecture before any layer is built
    ///
    /// # Returns
    ///
    /// - `Ok(())` - All sizes are positive and the inner activation is element-wise
    /// - `Err(ModelError::InputValidationError)` - Otherwise
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in [
            ("input_size", self.input_size),
            ("hidden_width", self.hidden_width),
            ("output_size", self.output_size),
        ] {
            if value == 0 {
                return Err(ModelError::InputValidationError(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        if !self.inner_activation.is_valid_inner() {
            return Err(ModelError::InputValidationError(format!(
                "{} cannot be used as inner activation, expected one of None, ReLU, LeakyReLU",
                self.inner_activation
            )));
        }

        Ok(())
    }

    /// Returns the total number of dense layers
    pub fn layer_count(&self) -> usize {
        self.inner_layer_count + 2
    }

    /// Returns `(previous_height, height)` of every layer, input side first
    pub fn layer_dimensions(&self) -> Vec<(usize, usize)> {
        let mut dimensions = Vec::with_capacity(self.layer_count());
        dimensions.push((self.input_size, self.hidden_width));
        dimensions.extend(
            std::iter::repeat((self.hidden_width, self.hidden_width)).take(self.inner_layer_count),
        );
        dimensions.push((self.hidden_width, self.output_size));
        dimensions
    }

    /// Returns the activation of every layer, input side first
    pub fn layer_activations(&self) -> Vec<Activation> {
        let mut activations = vec![self.inner_activation; self.inner_layer_count + 1];
        activations.push(self.output_activation);
        activations
    }
}
