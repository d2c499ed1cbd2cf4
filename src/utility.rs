/// One-hot encoding of class labels
pub mod label_encoding;
/// Shuffled split of a dataset into training and evaluation parts
pub mod train_test_split;

pub use label_encoding::*;
pub use train_test_split::*;

use crate::error::ModelError;
use crate::neural_network::Matrix;
