use crate::error::ModelError;
use crate::neural_network::Matrix;
use ndarray::{ArrayView1, Axis};

/// Returns the index of the largest value, the first one on ties
///
/// # Example
/// ```rust
/// use libless_nn::metric::argmax;
/// use ndarray::array;
///
/// assert_eq!(argmax(array![0.1, 0.7, 0.2].view()), 1);
/// ```
pub fn argmax(values: ArrayView1<f64>) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_i, best_v), (i, &v)| {
            if v > best_v { (i, v) } else { (best_i, best_v) }
        })
        .0
}

/// Checks that predictions and targets can be compared row by row
fn validate_pair(predictions: &Matrix, targets: &Matrix) -> Result<(), ModelError> {
    if predictions.dim() != targets.dim() {
        return Err(ModelError::DimensionMismatch(format!(
            "predictions have shape {:?} but targets have shape {:?}",
            predictions.dim(),
            targets.dim()
        )));
    }
    if predictions.is_empty() {
        return Err(ModelError::InputValidationError(
            "predictions must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Calculates the classification accuracy of one-hot style predictions.
///
/// A row counts as correct when the argmax of the prediction equals the argmax
/// of the target.
///
/// # Parameters
///
/// - `predictions` - One prediction vector per row
/// - `targets` - One one-hot target vector per row
///
/// # Returns
///
/// - `Ok(f64)` - Fraction of correct rows, in \[0.0, 1.0\]
/// - `Err(ModelError)` - If the shapes differ or the inputs are empty
///
/// # Example
/// ```rust
/// use libless_nn::metric::accuracy;
/// use ndarray::array;
///
/// let predictions = array![[0.8, 0.2], [0.4, 0.6], [0.9, 0.1]];
/// let targets = array![[1.0, 0.0], [0.0, 1.0], [0.0, 1.0]];
/// let acc = accuracy(&predictions, &targets).unwrap();
/// assert!((acc - 2.0 / 3.0).abs() < 1e-12);
/// ```
pub fn accuracy(predictions: &Matrix, targets: &Matrix) -> Result<f64, ModelError> {
    validate_pair(predictions, targets)?;

    let correct = predictions
        .axis_iter(Axis(0))
        .zip(targets.axis_iter(Axis(0)))
        .filter(|(p, t)| argmax(p.view()) == argmax(t.view()))
        .count();

    Ok(correct as f64 / predictions.nrows() as f64)
}

/// Calculates the regression loss reported for predictions
///
/// Each row contributes the mean over its outputs of `0.5 * (prediction - target)^2`;
/// the result is the mean over rows.
///
/// # Returns
///
/// - `Ok(f64)` - The mean loss
/// - `Err(ModelError)` - If the shapes differ or the inputs are empty
pub fn mean_half_squared_error(predictions: &Matrix, targets: &Matrix) -> Result<f64, ModelError> {
    validate_pair(predictions, targets)?;

    let half_squared = (predictions - targets).mapv(|d| 0.5 * d * d);
    Ok(half_squared.mean().unwrap_or(0.0))
}
