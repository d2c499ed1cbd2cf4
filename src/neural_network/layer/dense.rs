use crate::error::{ModelError, ensure_finite};
use crate::neural_network::layer::{ForwardTrace, LayerGradients, LayerWeight};
use crate::neural_network::optimizer::{AdamConfig, AdamStates};
use crate::neural_network::{Activation, Matrix, Vector};
use ndarray::Axis;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Bound of the uniform distribution weights and biases are drawn from
const INIT_RANGE: f64 = 1.0;

/// Dense (fully connected) layer.
///
/// Computes `activation(weights · input + bias)` for one sample at a time. The
/// weight matrix has shape `(height, previous_height)`, so each row holds the
/// incoming weights of one neuron.
///
/// The layer owns its parameters, the gradient accumulators and the Adam state.
/// It holds no per-sample state: `forward` returns a `ForwardTrace` that the
/// caller hands back to `backward`, so several samples can be in flight against
/// the same layer at once.
///
/// # Fields
///
/// ## Core fields
/// - `previous_height` - Width of the input vector
/// - `height` - Number of neurons, width of the output vector
/// - `weights` - Weight matrix with shape (height, previous_height)
/// - `bias` - Bias vector with length height
/// - `activation` - Activation function of the layer
///
/// ## Training state
/// - `grad_weights` - Weight gradients accumulated since the last update
/// - `grad_bias` - Bias gradients accumulated since the last update
/// - `adam_states` - Adam moment estimates and step counter
/// - `optimizer` - Adam hyperparameters, `None` until configured
///
/// # Example
/// ```rust
/// use libless_nn::neural_network::{Activation, Dense};
/// use ndarray::array;
///
/// let layer = Dense::from_parameters(
///     array![[1.0, -1.0], [0.5, 0.5]],
///     array![0.0, -2.0],
///     Activation::ReLU,
/// )
/// .unwrap();
///
/// let trace = layer.forward(&array![3.0, 1.0]).unwrap();
/// assert_eq!(trace.get_pre_activation(), &array![2.0, 0.0]);
/// assert_eq!(trace.get_output(), &array![2.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dense {
    previous_height: usize,
    height: usize,
    weights: Matrix,
    bias: Vector,
    activation: Activation,
    grad_weights: Matrix,
    grad_bias: Vector,
    adam_states: AdamStates,
    optimizer: Option<AdamConfig>,
}

impl Dense {
    /// Creates a dense layer with weights and biases drawn uniformly from [-1, 1].
    ///
    /// # Parameters
    ///
    /// - `previous_height` - Width of the input vector
    /// - `height` - Number of neurons
    /// - `activation` - Activation function of the layer
    /// - `rng` - Random generator used for initialization
    ///
    /// # Returns
    ///
    /// - `Ok(Dense)` - The initialized layer with zeroed gradients and optimizer state
    /// - `Err(ModelError::InputValidationError)` - If either dimension is zero
    pub fn new<R: Rng + ?Sized>(
        previous_height: usize,
        height: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        validate_dimensions(previous_height, height)?;

        let distribution = Uniform::new_inclusive(-INIT_RANGE, INIT_RANGE).map_err(|e| {
            ModelError::InputValidationError(format!(
                "failed to build weight initialization distribution: {}",
                e
            ))
        })?;

        let bias = Vector::from_shape_simple_fn(height, || distribution.sample(&mut *rng));
        let weights =
            Matrix::from_shape_simple_fn((height, previous_height), || distribution.sample(&mut *rng));

        Ok(Self::with_zeroed_state(weights, bias, activation))
    }

    /// Creates a dense layer from explicit parameters.
    ///
    /// # Parameters
    ///
    /// - `weights` - Weight matrix with shape (height, previous_height)
    /// - `bias` - Bias vector with length height
    /// - `activation` - Activation function of the layer
    ///
    /// # Returns
    ///
    /// - `Ok(Dense)` - The layer with zeroed gradients and optimizer state
    /// - `Err(ModelError::DimensionMismatch)` - If the bias length differs from the number of weight rows
    /// - `Err(ModelError::InputValidationError)` - If either dimension is zero
    /// - `Err(ModelError::NonFiniteValue)` - If any parameter is NaN or infinite
    pub fn from_parameters(
        weights: Matrix,
        bias: Vector,
        activation: Activation,
    ) -> Result<Self, ModelError> {
        validate_dimensions(weights.ncols(), weights.nrows())?;
        if bias.len() != weights.nrows() {
            return Err(ModelError::DimensionMismatch(format!(
                "bias has length {} but the weight matrix has {} rows",
                bias.len(),
                weights.nrows()
            )));
        }
        ensure_finite(weights.iter(), "weights")?;
        ensure_finite(bias.iter(), "bias")?;

        Ok(Self::with_zeroed_state(weights, bias, activation))
    }

    fn with_zeroed_state(weights: Matrix, bias: Vector, activation: Activation) -> Self {
        let (height, previous_height) = weights.dim();
        Self {
            previous_height,
            height,
            weights,
            bias,
            activation,
            grad_weights: Matrix::zeros((height, previous_height)),
            grad_bias: Vector::zeros(height),
            adam_states: AdamStates::new(height, previous_height),
            optimizer: None,
        }
    }

    /// Sets the Adam hyperparameters used by `update`
    pub fn configure_optimizer(&mut self, config: AdamConfig) {
        self.optimizer = Some(config);
    }

    /// Computes the affine transform `weights · input + bias`.
    ///
    /// # Returns
    ///
    /// - `Ok(Vector)` - The pre-activation output, length `height`
    /// - `Err(ModelError::DimensionMismatch)` - If `input` is not `previous_height` long
    pub fn affine(&self, input: &Vector) -> Result<Vector, ModelError> {
        if input.len() != self.previous_height {
            return Err(ModelError::DimensionMismatch(format!(
                "layer expects an input of width {} but got {}",
                self.previous_height,
                input.len()
            )));
        }
        Ok(self.weights.dot(input) + &self.bias)
    }

    /// Runs the affine transform followed by the activation for one sample.
    ///
    /// # Parameters
    ///
    /// * `input` - Input vector of width `previous_height`
    ///
    /// # Returns
    ///
    /// - `Ok(ForwardTrace)` - Input, pre-activation and post-activation of this sample
    /// - `Err(ModelError::DimensionMismatch)` - If the input width is wrong
    /// - `Err(ModelError::NonFiniteValue)` - If the input, the pre-activation or the output contains NaN or infinite values
    pub fn forward(&self, input: &Vector) -> Result<ForwardTrace, ModelError> {
        let pre_activation = self.affine(input)?;
        // ReLU maps NaN to 0, so the output check alone would miss it
        ensure_finite(input.iter(), "layer input")?;
        ensure_finite(pre_activation.iter(), "pre-activation")?;
        let output = self.activation.apply(&pre_activation);
        ensure_finite(output.iter(), "layer output")?;

        Ok(ForwardTrace::new(input.clone(), pre_activation, output))
    }

    /// Computes the gradients of one sample without touching the accumulators.
    ///
    /// # Parameters
    ///
    /// - `trace` - The trace `forward` returned for this sample
    /// - `upstream` - Gradient of the loss with respect to this layer's output
    ///
    /// # Returns
    ///
    /// - `Ok((LayerGradients, Vector))` - The parameter gradients of this sample and the
    ///   gradient to pass to the previous layer (`local_gradient · weights`)
    /// - `Err(ModelError::DimensionMismatch)` - If the trace or the upstream gradient does not fit this layer
    /// - `Err(ModelError::NonFiniteValue)` - If the gradient contains NaN or infinite values
    pub fn gradients(
        &self,
        trace: &ForwardTrace,
        upstream: &Vector,
    ) -> Result<(LayerGradients, Vector), ModelError> {
        if upstream.len() != self.height || trace.get_pre_activation().len() != self.height {
            return Err(ModelError::DimensionMismatch(format!(
                "layer of height {} got an upstream gradient of length {} for a pre-activation of length {}",
                self.height,
                upstream.len(),
                trace.get_pre_activation().len()
            )));
        }
        if trace.get_input().len() != self.previous_height {
            return Err(ModelError::DimensionMismatch(format!(
                "layer expects traces with input width {} but got {}",
                self.previous_height,
                trace.get_input().len()
            )));
        }

        let local = self
            .activation
            .backward(trace.get_pre_activation(), upstream);
        ensure_finite(local.iter(), "local gradient")?;

        // outer(local, input): (height, 1) · (1, previous_height)
        let weights = local
            .view()
            .insert_axis(Axis(1))
            .dot(&trace.get_input().view().insert_axis(Axis(0)));
        let to_previous = local.dot(&self.weights);
        ensure_finite(weights.iter(), "weight gradient")?;
        ensure_finite(to_previous.iter(), "input gradient")?;

        Ok((
            LayerGradients {
                weights,
                bias: local,
            },
            to_previous,
        ))
    }

    /// Adds one sample's gradients to the accumulators.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The gradients were added
    /// - `Err(ModelError::DimensionMismatch)` - If the gradient shapes do not match this layer
    /// - `Err(ModelError::NonFiniteValue)` - If the gradients contain NaN or infinite values
    pub fn accumulate(&mut self, gradients: &LayerGradients) -> Result<(), ModelError> {
        if gradients.weights.dim() != self.grad_weights.dim()
            || gradients.bias.len() != self.grad_bias.len()
        {
            return Err(ModelError::DimensionMismatch(format!(
                "gradients of shape {:?} / {} do not fit a layer of shape {:?}",
                gradients.weights.dim(),
                gradients.bias.len(),
                self.grad_weights.dim()
            )));
        }
        ensure_finite(gradients.weights.iter(), "weight gradient")?;
        ensure_finite(gradients.bias.iter(), "bias gradient")?;

        self.grad_weights += &gradients.weights;
        self.grad_bias += &gradients.bias;
        Ok(())
    }

    /// Backward pass for one sample: computes its gradients, accumulates them
    /// and returns the gradient for the previous layer.
    ///
    /// # Parameters
    ///
    /// - `trace` - The trace `forward` returned for this sample
    /// - `upstream` - Gradient of the loss with respect to this layer's output
    ///
    /// # Returns
    ///
    /// - `Ok(Vector)` - Gradient with respect to this layer's input
    /// - `Err(ModelError)` - See `gradients`
    pub fn backward(&mut self, trace: &ForwardTrace, upstream: &Vector) -> Result<Vector, ModelError> {
        let (gradients, to_previous) = self.gradients(trace, upstream)?;
        self.accumulate(&gradients)?;
        Ok(to_previous)
    }

    /// Applies one Adam step using the accumulated gradients, then zeroes them.
    ///
    /// The step is computed on copies and only written back once every new
    /// parameter is finite; on error the layer is left exactly as it was.
    ///
    /// # Parameters
    ///
    /// * `batch_size` - Number of samples accumulated since the last update
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Parameters updated, accumulators reset, step count incremented
    /// - `Err(ModelError::InputValidationError)` - If `batch_size` is zero
    /// - `Err(ModelError::NotConfigured)` - If `configure_optimizer` was never called
    /// - `Err(ModelError::NonFiniteValue)` - If the update would produce NaN or infinite parameters
    pub fn update(&mut self, batch_size: usize) -> Result<(), ModelError> {
        let staged = self.stage_update(batch_size)?;
        self.commit_update(staged);
        Ok(())
    }

    /// Computes the result of one Adam step without modifying the layer
    pub(crate) fn stage_update(&self, batch_size: usize) -> Result<StagedUpdate, ModelError> {
        if batch_size == 0 {
            return Err(ModelError::InputValidationError(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        let config = self.optimizer.ok_or_else(|| {
            ModelError::NotConfigured(
                "optimizer hyperparameters must be set before updating a layer".to_string(),
            )
        })?;

        let mut weights = self.weights.clone();
        let mut bias = self.bias.clone();
        let mut adam_states = self.adam_states.clone();
        adam_states.step(
            &mut weights,
            &mut bias,
            &self.grad_weights,
            &self.grad_bias,
            batch_size,
            &config,
        );

        ensure_finite(weights.iter(), "updated weights")?;
        ensure_finite(bias.iter(), "updated bias")?;

        Ok(StagedUpdate {
            weights,
            bias,
            adam_states,
        })
    }

    /// Writes a staged step back and zeroes the accumulators
    pub(crate) fn commit_update(&mut self, staged: StagedUpdate) {
        self.weights = staged.weights;
        self.bias = staged.bias;
        self.adam_states = staged.adam_states;
        self.clear_gradients();
    }

    /// Discards the gradients accumulated since the last update
    pub fn clear_gradients(&mut self) {
        self.grad_weights.fill(0.0);
        self.grad_bias.fill(0.0);
    }

    /// Returns the input width of the layer
    pub fn get_previous_height(&self) -> usize {
        self.previous_height
    }

    /// Returns the number of neurons in the layer
    pub fn get_height(&self) -> usize {
        self.height
    }

    /// Returns the weight matrix, shape (height, previous_height)
    pub fn get_weights(&self) -> &Matrix {
        &self.weights
    }

    /// Returns the bias vector
    pub fn get_bias(&self) -> &Vector {
        &self.bias
    }

    /// Returns the weight gradients accumulated since the last update
    pub fn get_grad_weights(&self) -> &Matrix {
        &self.grad_weights
    }

    /// Returns the bias gradients accumulated since the last update
    pub fn get_grad_bias(&self) -> &Vector {
        &self.grad_bias
    }

    /// Returns the activation function of the layer
    pub fn get_activation(&self) -> Activation {
        self.activation
    }

    /// Returns the Adam state of the layer
    pub fn get_adam_states(&self) -> &AdamStates {
        &self.adam_states
    }

    /// Returns the number of update steps taken so far
    pub fn get_step_count(&self) -> u64 {
        self.adam_states.get_step_count()
    }

    /// Returns the Adam hyperparameters, if configured
    pub fn get_optimizer_config(&self) -> Option<&AdamConfig> {
        self.optimizer.as_ref()
    }

    /// Returns a read-only view of the weights and bias
    pub fn get_layer_weight(&self) -> LayerWeight<'_> {
        LayerWeight {
            weight: &self.weights,
            bias: &self.bias,
        }
    }

    /// Returns the type name of the layer
    pub fn layer_type(&self) -> &str {
        "Dense"
    }

    /// Returns a description of the output shape of the layer
    pub fn output_shape(&self) -> String {
        format!("(None, {})", self.height)
    }

    /// Returns the number of trainable parameters (weights plus biases)
    pub fn param_count(&self) -> usize {
        self.height * self.previous_height + self.height
    }
}

/// Parameters and optimizer state of a layer after an Adam step that has not been applied yet
#[derive(Debug)]
pub(crate) struct StagedUpdate {
    weights: Matrix,
    bias: Vector,
    adam_states: AdamStates,
}

fn validate_dimensions(previous_height: usize, height: usize) -> Result<(), ModelError> {
    if previous_height == 0 || height == 0 {
        return Err(ModelError::InputValidationError(format!(
            "layer dimensions must be greater than 0, got {} -> {}",
            previous_height, height
        )));
    }
    Ok(())
}
