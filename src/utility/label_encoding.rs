use super::*;

/// Converts class labels to one-hot encoded target vectors
///
/// # Parameters
///
/// - `labels` - One class index per sample, e.g. \[0, 1, 2, 1, 0\]
/// - `num_classes` - Number of classes, the width of every target vector
///
/// # Returns
///
/// - `Ok(Matrix)` - Shape (labels.len(), num_classes) with a single 1.0 per row
/// - `Err(ModelError::InputValidationError)` - If `num_classes` is zero or a label is out of range
///
/// # Examples
///
/// ```rust
/// use libless_nn::utility::to_categorical;
/// use ndarray::array;
///
/// let categorical = to_categorical(&[0, 2, 1], 3).unwrap();
/// assert_eq!(
///     categorical,
///     array![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]]
/// );
/// ```
pub fn to_categorical(labels: &[usize], num_classes: usize) -> Result<Matrix, ModelError> {
    if num_classes == 0 {
        return Err(ModelError::InputValidationError(
            "num_classes must be greater than 0".to_string(),
        ));
    }

    if let Some(&label) = labels.iter().find(|&&label| label >= num_classes) {
        return Err(ModelError::InputValidationError(format!(
            "label {} is out of range for {} classes",
            label, num_classes
        )));
    }

    let mut categorical = Matrix::zeros((labels.len(), num_classes));
    for (i, &label) in labels.iter().enumerate() {
        categorical[[i, label]] = 1.0;
    }

    Ok(categorical)
}
