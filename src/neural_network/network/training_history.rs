/// What happened during one training epoch
///
/// # Fields
///
/// - `epoch` - Zero-based epoch index
/// - `average_loss` - Sum of per-sample losses divided by the number of samples
/// - `updates` - Number of parameter updates issued, including a final partial batch
/// - `last_batch_size` - Sample count of the last update of the epoch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochSummary {
    pub epoch: usize,
    pub average_loss: f64,
    pub updates: usize,
    pub last_batch_size: usize,
}

/// Per-epoch results of `NeuralNetwork::train`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    epochs: Vec<EpochSummary>,
}

impl TrainingHistory {
    pub(crate) fn with_capacity(epochs: usize) -> Self {
        Self {
            epochs: Vec::with_capacity(epochs),
        }
    }

    pub(crate) fn push(&mut self, summary: EpochSummary) {
        self.epochs.push(summary);
    }

    /// Returns the summaries in epoch order
    pub fn get_epochs(&self) -> &[EpochSummary] {
        &self.epochs
    }

    /// Returns the average loss of every epoch
    pub fn losses(&self) -> Vec<f64> {
        self.epochs.iter().map(|e| e.average_loss).collect()
    }

    /// Returns the average loss of the last epoch, if any
    pub fn final_loss(&self) -> Option<f64> {
        self.epochs.last().map(|e| e.average_loss)
    }

    /// Returns the number of recorded epochs
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    /// Returns `true` if no epoch was recorded
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
}
