/// Shape and activations of a network
pub mod architecture;
/// Per-epoch training results
pub mod training_history;

pub use architecture::*;
pub use training_history::*;

use crate::error::{ModelError, ensure_finite};
use crate::neural_network::layer::{Dense, ForwardTrace, LayerWeight};
use crate::neural_network::optimizer::AdamConfig;
use crate::neural_network::{Loss, Matrix, Vector};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Axis;
use ndarray::parallel::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// A fully connected feed-forward network trained one sample at a time.
///
/// The network owns its dense layers, the loss selected for its output
/// activation and the random generator used for initialization and per-epoch
/// shuffling. Training accumulates per-sample gradients in every layer and
/// applies an Adam step at each minibatch boundary.
///
/// # Fields
///
/// - `architecture` - The shape the layers were built from
/// - `layers` - Dense layers, input side first
/// - `loss` - Loss computed on the output layer
/// - `optimizer` - Adam hyperparameters, `None` until `configure_optimizer` is called
/// - `rng` - Generator for shuffling (already used for initialization)
/// - `verbose` - Whether `train` shows a progress bar and a completion line
///
/// # Example
/// ```rust
/// use libless_nn::prelude::*;
/// use ndarray::array;
///
/// let architecture = NetworkArchitecture::new(2, 0, 8, 1, Activation::LeakyReLU, Activation::Identity);
/// let mut network = NeuralNetwork::new(architecture, 7).unwrap();
/// network.configure_optimizer(AdamConfig::new(0.01, 0.9, 0.999, 1e-8).unwrap());
///
/// let x = array![[0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]];
/// let y = array![[1.0], [1.0], [2.0], [0.0]];
///
/// let history = network.train(5, &x, &y, 2).unwrap();
/// assert_eq!(history.len(), 5);
///
/// let predictions = network.predict(&x).unwrap();
/// assert_eq!(predictions.dim(), (4, 1));
/// ```
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    architecture: NetworkArchitecture,
    layers: Vec<Dense>,
    loss: Loss,
    optimizer: Option<AdamConfig>,
    rng: StdRng,
    verbose: bool,
}

impl NeuralNetwork {
    /// Builds a network whose parameters are drawn from a generator seeded with `seed`
    ///
    /// # Parameters
    ///
    /// - `architecture` - Sizes and activations of the layers
    /// - `seed` - Seed of the generator used for initialization and shuffling
    ///
    /// # Returns
    ///
    /// - `Ok(NeuralNetwork)` - A network with every layer fully formed
    /// - `Err(ModelError::InputValidationError)` - If the architecture is invalid
    pub fn new(architecture: NetworkArchitecture, seed: u64) -> Result<Self, ModelError> {
        Self::with_rng(architecture, StdRng::seed_from_u64(seed))
    }

    /// Builds a network using an explicit random generator
    ///
    /// The generator first initializes every layer, input side first, and is then
    /// kept for shuffling the training data.
    pub fn with_rng(architecture: NetworkArchitecture, mut rng: StdRng) -> Result<Self, ModelError> {
        architecture.validate()?;

        let layers = architecture
            .layer_dimensions()
            .into_iter()
            .zip(architecture.layer_activations())
            .map(|((previous_height, height), activation)| {
                Dense::new(previous_height, height, activation, &mut rng)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            architecture,
            layers,
            loss: Loss::for_output(architecture.output_activation),
            optimizer: None,
            rng,
            verbose: false,
        })
    }

    /// Propagates the Adam hyperparameters to every layer
    ///
    /// Must be called before `train` or `apply_update`.
    pub fn configure_optimizer(&mut self, config: AdamConfig) -> &mut Self {
        for layer in &mut self.layers {
            layer.configure_optimizer(config);
        }
        self.optimizer = Some(config);
        self
    }

    /// Replaces the loss computed on the output layer
    ///
    /// # Returns
    ///
    /// - `Ok(&mut Self)` - The loss matches the output activation
    /// - `Err(ModelError::InputValidationError)` - The loss cannot be paired with the output activation
    pub fn set_loss(&mut self, loss: Loss) -> Result<&mut Self, ModelError> {
        loss.validate_pairing(self.architecture.output_activation)?;
        self.loss = loss;
        Ok(self)
    }

    /// Turns the training progress bar and completion message on or off
    pub fn set_verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    /// Forward pass through every layer, keeping each layer's trace
    fn forward_traces(&self, sample: &Vector) -> Result<Vec<ForwardTrace>, ModelError> {
        let mut traces: Vec<ForwardTrace> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let trace = match traces.last() {
                Some(previous) => layer.forward(previous.get_output())?,
                None => layer.forward(sample)?,
            };
            traces.push(trace);
        }
        Ok(traces)
    }

    /// Runs one forward/loss/backward cycle and accumulates its gradients
    ///
    /// No parameter changes: the gradients stay in the layers' accumulators
    /// until `apply_update` is called. The gradients of every layer are computed
    /// before any of them is accumulated, so on error no accumulator has
    /// received part of this sample.
    ///
    /// # Parameters
    ///
    /// - `sample` - Input vector of width `input_size`
    /// - `target` - Expected output of width `output_size`
    ///
    /// # Returns
    ///
    /// - `Ok(f64)` - The loss of this sample
    /// - `Err(ModelError::DimensionMismatch)` - If the sample or target has the wrong width
    /// - `Err(ModelError::NonFiniteValue)` - If outputs, loss or gradients are not finite
    pub fn accumulate_sample(&mut self, sample: &Vector, target: &Vector) -> Result<f64, ModelError> {
        let traces = self.forward_traces(sample)?;
        let output = match traces.last() {
            Some(trace) => trace.get_output(),
            None => {
                return Err(ModelError::InputValidationError(
                    "network has no layers".to_string(),
                ));
            }
        };

        let loss_value = self.loss.compute_loss(output, target)?;
        let mut grad = self.loss.compute_grad(output, target)?;

        // output side first
        let mut gradients = Vec::with_capacity(self.layers.len());
        for (layer, trace) in self.layers.iter().zip(traces.iter()).rev() {
            let (layer_gradients, to_previous) = layer.gradients(trace, &grad)?;
            gradients.push(layer_gradients);
            grad = to_previous;
        }

        for (layer, layer_gradients) in self.layers.iter_mut().rev().zip(gradients.iter()) {
            layer.accumulate(layer_gradients)?;
        }

        Ok(loss_value)
    }

    /// Applies one Adam step to every layer
    ///
    /// # Parameters
    ///
    /// * `batch_size` - Number of samples accumulated since the last update
    ///
    /// # Returns
    ///
    /// Every layer's step is computed first and written back only when all of
    /// them succeeded, so on error no layer has moved and the step counts stay
    /// equal across layers.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Every layer was updated and its accumulators reset
    /// - `Err(ModelError::NotConfigured)` - If `configure_optimizer` was never called
    /// - `Err(ModelError)` - Any error reported by `Dense::update`
    pub fn apply_update(&mut self, batch_size: usize) -> Result<(), ModelError> {
        if self.optimizer.is_none() {
            return Err(ModelError::NotConfigured(
                "configure_optimizer must be called before training".to_string(),
            ));
        }

        let staged = self
            .layers
            .iter()
            .map(|layer| layer.stage_update(batch_size))
            .collect::<Result<Vec<_>, _>>()?;

        for (layer, update) in self.layers.iter_mut().zip(staged) {
            layer.commit_update(update);
        }
        Ok(())
    }

    /// Discards the gradients accumulated in every layer since the last update
    pub fn clear_gradients(&mut self) {
        for layer in &mut self.layers {
            layer.clear_gradients();
        }
    }

    /// Validates the training configuration and data
    fn validate_training_inputs(
        &self,
        epochs: usize,
        samples: &Matrix,
        targets: &Matrix,
        batch_size: usize,
    ) -> Result<(), ModelError> {
        if self.optimizer.is_none() {
            return Err(ModelError::NotConfigured(
                "configure_optimizer must be called before training".to_string(),
            ));
        }

        if epochs == 0 {
            return Err(ModelError::InputValidationError(
                "epochs must be greater than 0".to_string(),
            ));
        }

        let n_samples = samples.nrows();
        if n_samples == 0 {
            return Err(ModelError::InputValidationError(
                "training data cannot be empty".to_string(),
            ));
        }

        if n_samples != targets.nrows() {
            return Err(ModelError::InputValidationError(format!(
                "sample count mismatch: {} samples but {} targets",
                n_samples,
                targets.nrows()
            )));
        }

        if samples.ncols() != self.architecture.input_size {
            return Err(ModelError::DimensionMismatch(format!(
                "network expects samples of width {} but got {}",
                self.architecture.input_size,
                samples.ncols()
            )));
        }

        if targets.ncols() != self.architecture.output_size {
            return Err(ModelError::DimensionMismatch(format!(
                "network expects targets of width {} but got {}",
                self.architecture.output_size,
                targets.ncols()
            )));
        }

        if batch_size == 0 {
            return Err(ModelError::InputValidationError(
                "batch_size must be greater than 0".to_string(),
            ));
        }

        if batch_size > n_samples {
            return Err(ModelError::InputValidationError(format!(
                "batch_size ({}) cannot be larger than dataset size ({})",
                batch_size, n_samples
            )));
        }

        ensure_finite(samples.iter(), "training samples")?;
        ensure_finite(targets.iter(), "training targets")
    }

    /// Trains the network with minibatch Adam updates
    ///
    /// Every epoch shuffles samples and targets with one shared permutation and
    /// feeds them through `accumulate_sample` one at a time. Each time
    /// `batch_size` samples have been accumulated every layer is updated; a final
    /// partial batch at the end of the epoch is updated with its actual size.
    ///
    /// Samples and targets must be finite. If training fails part way, the
    /// updates already applied are kept and the gradients of the unfinished
    /// batch are discarded, so every layer has the same step count and empty
    /// accumulators.
    ///
    /// # Parameters
    ///
    /// - `epochs` - Number of passes over the data
    /// - `samples` - One input vector per row
    /// - `targets` - One target vector per row, same row count as `samples`
    /// - `batch_size` - Samples per update, in `1..=samples.nrows()`
    ///
    /// # Returns
    ///
    /// - `Ok(TrainingHistory)` - Average loss and update count of every epoch
    /// - `Err(ModelError)` - Invalid configuration or data, or a numerical failure
    pub fn train(
        &mut self,
        epochs: usize,
        samples: &Matrix,
        targets: &Matrix,
        batch_size: usize,
    ) -> Result<TrainingHistory, ModelError> {
        self.validate_training_inputs(epochs, samples, targets, batch_size)?;

        let n_samples = samples.nrows();
        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut history = TrainingHistory::with_capacity(epochs);

        let progress_bar = if self.verbose {
            let bar = ProgressBar::new(epochs as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} | Epoch {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓░"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        for epoch in 0..epochs {
            let summary = match self.run_epoch(epoch, &mut indices, samples, targets, batch_size) {
                Ok(summary) => summary,
                Err(e) => {
                    // a partial batch must not leak into the next call
                    self.clear_gradients();
                    progress_bar.abandon_with_message(format!("Training failed: {}", e));
                    return Err(e);
                }
            };
            history.push(summary);

            progress_bar.set_message(format!(
                "{}/{} | Avg Loss: {:.6}",
                epoch + 1,
                epochs,
                summary.average_loss
            ));
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Training completed");

        if self.verbose {
            println!(
                "\nNeural network training completed: {} samples, {} batch size, {} epochs",
                n_samples, batch_size, epochs
            );
        }

        Ok(history)
    }

    /// One shuffled pass over the data with minibatch updates
    fn run_epoch(
        &mut self,
        epoch: usize,
        indices: &mut [usize],
        samples: &Matrix,
        targets: &Matrix,
        batch_size: usize,
    ) -> Result<EpochSummary, ModelError> {
        indices.shuffle(&mut self.rng);

        let mut epoch_loss = 0.0;
        let mut pending = 0;
        let mut updates = 0;
        let mut last_batch_size = 0;

        for &idx in indices.iter() {
            let sample = samples.row(idx).to_owned();
            let target = targets.row(idx).to_owned();

            epoch_loss += self.accumulate_sample(&sample, &target)?;
            pending += 1;

            if pending == batch_size {
                self.apply_update(batch_size)?;
                updates += 1;
                last_batch_size = batch_size;
                pending = 0;
            }
        }

        if pending > 0 {
            self.apply_update(pending)?;
            updates += 1;
            last_batch_size = pending;
        }

        Ok(EpochSummary {
            epoch,
            average_loss: epoch_loss / samples.nrows() as f64,
            updates,
            last_batch_size,
        })
    }

    /// Runs the forward pass for a single sample
    ///
    /// # Returns
    ///
    /// - `Ok(Vector)` - Output of the final layer
    /// - `Err(ModelError::DimensionMismatch)` - If the sample has the wrong width
    /// - `Err(ModelError::NonFiniteValue)` - If the sample or any layer output contains NaN or infinite values
    pub fn predict_one(&self, sample: &Vector) -> Result<Vector, ModelError> {
        let mut output = sample.clone();
        for layer in &self.layers {
            output = layer.forward(&output)?.into_output();
        }
        Ok(output)
    }

    /// Generates predictions for every row of `samples`
    ///
    /// Only runs the forward pass; gradients and optimizer state are untouched,
    /// so rows are evaluated in parallel.
    ///
    /// # Parameters
    ///
    /// * `samples` - One input vector per row
    ///
    /// # Returns
    ///
    /// - `Ok(Matrix)` - One prediction per row, shape `(samples.nrows(), output_size)`
    /// - `Err(ModelError::DimensionMismatch)` - If the sample width is wrong
    /// - `Err(ModelError::NonFiniteValue)` - If a sample or any layer output contains NaN or infinite values
    pub fn predict(&self, samples: &Matrix) -> Result<Matrix, ModelError> {
        if samples.ncols() != self.architecture.input_size {
            return Err(ModelError::DimensionMismatch(format!(
                "network expects samples of width {} but got {}",
                self.architecture.input_size,
                samples.ncols()
            )));
        }

        let predictions = samples
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| self.predict_one(&row.to_owned()))
            .collect::<Result<Vec<Vector>, ModelError>>()?;

        let mut output = Matrix::zeros((samples.nrows(), self.architecture.output_size));
        for (mut row, prediction) in output.axis_iter_mut(Axis(0)).zip(predictions.iter()) {
            row.assign(prediction);
        }
        Ok(output)
    }

    /// Returns a read-only view of every layer's weights and bias, input side first
    pub fn export_parameters(&self) -> Vec<LayerWeight<'_>> {
        self.layers.iter().map(Dense::get_layer_weight).collect()
    }

    /// Returns the layers, input side first
    pub fn get_layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Returns the architecture the network was built from
    pub fn get_architecture(&self) -> &NetworkArchitecture {
        &self.architecture
    }

    /// Returns the loss computed on the output layer
    pub fn get_loss(&self) -> Loss {
        self.loss
    }

    /// Returns the Adam hyperparameters, if configured
    pub fn get_optimizer_config(&self) -> Option<&AdamConfig> {
        self.optimizer.as_ref()
    }

    /// Prints a summary of the network's structure
    ///
    /// Displays each layer's activation, output shape and parameter count in a tabular format
    pub fn summary(&self) {
        let col1_width = 33;
        let col2_width = 24;
        let col3_width = 15;
        println!("Model: \"neural_network\"");
        println!(
            "┏{}┳{}┳{}┓",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width)
        );
        println!(
            "┃ {:<31} ┃ {:<22} ┃ {:>13} ┃",
            "Layer (type)", "Output Shape", "Param #"
        );
        println!(
            "┡{}╇{}╇{}┩",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width)
        );

        let mut total_params: usize = 0;
        for (i, layer) in self.layers.iter().enumerate() {
            let layer_name = if i == 0 {
                "Layer".to_string()
            } else {
                format!("Layer_{}", i)
            };
            let param_count = layer.param_count();
            total_params += param_count;

            println!(
                "│ {:<31} │ {:<22} │ {:>13} │",
                format!(
                    "{} ({}, {})",
                    layer_name,
                    layer.layer_type(),
                    layer.get_activation()
                ),
                layer.output_shape(),
                param_count
            );
        }
        println!(
            "└{}┴{}┴{}┘",
            "─".repeat(col1_width),
            "─".repeat(col2_width),
            "─".repeat(col3_width)
        );
        // f64 parameters, 8 bytes each
        println!(" Total params: {} ({} B)", total_params, total_params * 8);
        println!(" Loss: {} ({})", self.loss, self.loss.identifier());
    }
}
