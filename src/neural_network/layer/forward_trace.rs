use crate::neural_network::{Matrix, Vector};

/// Values one sample leaves behind in a layer's forward pass.
///
/// The backward pass of the same sample needs the layer input and the
/// pre-activation, so `Dense::forward` returns them together with the output
/// instead of caching them inside the layer.
///
/// # Fields
///
/// - `input` - The vector the layer received
/// - `pre_activation` - `weights · input + bias`
/// - `output` - The activation applied to `pre_activation`
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardTrace {
    input: Vector,
    pre_activation: Vector,
    output: Vector,
}

impl ForwardTrace {
    pub(crate) fn new(input: Vector, pre_activation: Vector, output: Vector) -> Self {
        Self {
            input,
            pre_activation,
            output,
        }
    }

    /// Returns the input the layer received
    pub fn get_input(&self) -> &Vector {
        &self.input
    }

    /// Returns the pre-activation output
    pub fn get_pre_activation(&self) -> &Vector {
        &self.pre_activation
    }

    /// Returns the post-activation output
    pub fn get_output(&self) -> &Vector {
        &self.output
    }

    /// Consumes the trace and returns the post-activation output
    pub fn into_output(self) -> Vector {
        self.output
    }
}

/// Parameter gradients contributed by one or more samples
///
/// # Fields
///
/// - `weights` - Gradient of the weight matrix, `outer(local_gradient, input)` for one sample
/// - `bias` - Gradient of the bias vector, the local gradient for one sample
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub bias: Vector,
}
