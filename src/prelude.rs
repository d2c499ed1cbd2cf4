pub use crate::error::ModelError;
pub use crate::metric::{accuracy, argmax, mean_half_squared_error};
pub use crate::neural_network::{
    Activation, AdamConfig, AdamStates, Dense, EpochSummary, ForwardTrace, LayerGradients,
    LayerWeight, Loss, Matrix, NetworkArchitecture, NeuralNetwork, TrainingHistory, Vector,
};
pub use crate::utility::{to_categorical, train_test_split};
