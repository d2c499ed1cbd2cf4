use super::*;
use ndarray::Axis;
use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffles a dataset and splits it into a training part and an evaluation part
///
/// Samples and targets are permuted together; the first `train_size` shuffled
/// rows become the training set and the rest the evaluation set.
///
/// # Parameters
///
/// - `samples` - Feature matrix with one sample per row
/// - `targets` - Target matrix with one target per row
/// - `train_size` - Number of rows in the training part
/// - `rng` - Random generator used for the shuffle
///
/// # Returns
///
/// - `Ok((x_train, x_test, y_train, y_test))` - The split dataset
/// - `Err(ModelError::InputValidationError)` - If the row counts differ or `train_size` does not leave both parts non-empty
///
/// # Example
/// ```rust
/// use libless_nn::utility::train_test_split;
/// use ndarray::Array2;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let x = Array2::from_shape_vec((5, 2), (0..10).map(f64::from).collect()).unwrap();
/// let y = Array2::from_shape_vec((5, 1), (0..5).map(f64::from).collect()).unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
///
/// let (x_train, x_test, y_train, y_test) = train_test_split(&x, &y, 3, &mut rng).unwrap();
/// assert_eq!(x_train.nrows(), 3);
/// assert_eq!(x_test.nrows(), 2);
/// assert_eq!(y_train.nrows(), 3);
/// assert_eq!(y_test.nrows(), 2);
/// ```
pub fn train_test_split<R: Rng + ?Sized>(
    samples: &Matrix,
    targets: &Matrix,
    train_size: usize,
    rng: &mut R,
) -> Result<(Matrix, Matrix, Matrix, Matrix), ModelError> {
    let n_samples = samples.nrows();

    if n_samples != targets.nrows() {
        return Err(ModelError::InputValidationError(format!(
            "samples and targets must have the same number of rows, samples: {}, targets: {}",
            n_samples,
            targets.nrows()
        )));
    }

    if train_size == 0 || train_size >= n_samples {
        return Err(ModelError::InputValidationError(format!(
            "train_size must be between 1 and {} for a dataset of {} samples, got {}",
            n_samples.saturating_sub(1),
            n_samples,
            train_size
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(rng);

    let (train_indices, test_indices) = indices.split_at(train_size);

    let x_train = samples.select(Axis(0), train_indices);
    let x_test = samples.select(Axis(0), test_indices);
    let y_train = targets.select(Axis(0), train_indices);
    let y_test = targets.select(Axis(0), test_indices);

    Ok((x_train, x_test, y_train, y_test))
}
