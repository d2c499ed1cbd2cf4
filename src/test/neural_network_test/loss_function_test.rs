use super::*;

#[test]
fn mean_squared_error_value_and_gradient_test() {
    let predicted = array![1.0, 2.0, 3.0];
    let expected = array![1.0, 0.0, 4.0];

    // mean of 0.5 * d^2 over [0, 2, -1]
    let loss = Loss::MeanSquaredError.compute_loss(&predicted, &expected).unwrap();
    assert_relative_eq!(loss, (0.0 + 2.0 + 0.5) / 3.0);

    let grad = Loss::MeanSquaredError.compute_grad(&predicted, &expected).unwrap();
    assert_eq!(grad, array![0.0, 2.0, -1.0]);
}

#[test]
fn categorical_cross_entropy_value_and_gradient_test() {
    let predicted = array![0.7, 0.2, 0.1];
    let expected = array![1.0, 0.0, 0.0];

    let loss = Loss::CategoricalCrossEntropy
        .compute_loss(&predicted, &expected)
        .unwrap();
    assert_relative_eq!(loss, -(0.7f64).ln(), epsilon = 1e-12);

    let grad = Loss::CategoricalCrossEntropy
        .compute_grad(&predicted, &expected)
        .unwrap();
    assert_all_close(&grad, &array![-0.3, 0.2, 0.1], 1e-12);
}

#[test]
fn categorical_cross_entropy_zero_probability_is_finite_test() {
    let loss = Loss::CategoricalCrossEntropy
        .compute_loss(&array![0.0, 1.0], &array![1.0, 0.0])
        .unwrap();
    assert!(loss.is_finite());
    assert_relative_eq!(loss, -(LOG_EPSILON).ln(), epsilon = 1e-9);
}

#[test]
fn binary_cross_entropy_value_and_gradient_test() {
    let predicted = array![0.8, 0.4];
    let expected = array![1.0, 0.0];

    let loss = Loss::BinaryCrossEntropy.compute_loss(&predicted, &expected).unwrap();
    assert_relative_eq!(loss, -(0.8f64).ln() - (0.6f64).ln(), epsilon = 1e-12);

    let grad = Loss::BinaryCrossEntropy.compute_grad(&predicted, &expected).unwrap();
    assert_all_close(&grad, &array![-0.2, 0.4], 1e-12);
}

#[test]
fn loss_length_mismatch_test() {
    for loss in [
        Loss::MeanSquaredError,
        Loss::CategoricalCrossEntropy,
        Loss::BinaryCrossEntropy,
    ] {
        let result = loss.compute_loss(&array![0.5, 0.5], &array![1.0]);
        assert!(matches!(result, Err(ModelError::DimensionMismatch(_))));
        let result = loss.compute_grad(&array![0.5], &array![1.0, 0.0]);
        assert!(matches!(result, Err(ModelError::DimensionMismatch(_))));
    }
}

#[test]
fn non_finite_loss_is_reported_test() {
    let result = Loss::MeanSquaredError.compute_loss(&array![f64::NAN], &array![1.0]);
    assert!(matches!(result, Err(ModelError::NonFiniteValue(_))));
}

#[test]
fn loss_for_output_policy_test() {
    assert_eq!(Loss::for_output(Activation::Softmax), Loss::CategoricalCrossEntropy);
    assert_eq!(Loss::for_output(Activation::Sigmoid), Loss::BinaryCrossEntropy);
    assert_eq!(Loss::for_output(Activation::Identity), Loss::MeanSquaredError);
    assert_eq!(Loss::for_output(Activation::ReLU), Loss::MeanSquaredError);
    assert_eq!(Loss::for_output(Activation::LeakyReLU), Loss::MeanSquaredError);
}

#[test]
fn loss_pairing_is_validated_test() {
    assert!(Loss::CategoricalCrossEntropy.validate_pairing(Activation::Softmax).is_ok());
    assert!(Loss::MeanSquaredError.validate_pairing(Activation::LeakyReLU).is_ok());

    assert!(matches!(
        Loss::MeanSquaredError.validate_pairing(Activation::Softmax),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(Loss::CategoricalCrossEntropy.validate_pairing(Activation::Identity).is_err());
    assert!(Loss::CategoricalCrossEntropy.validate_pairing(Activation::Sigmoid).is_err());
    assert!(Loss::BinaryCrossEntropy.validate_pairing(Activation::Softmax).is_err());
}

#[test]
fn loss_from_identifier_test() {
    assert_eq!(
        Loss::from_identifier("log", Activation::Softmax).unwrap(),
        Loss::CategoricalCrossEntropy
    );
    assert_eq!(
        Loss::from_identifier("log", Activation::Sigmoid).unwrap(),
        Loss::BinaryCrossEntropy
    );
    assert_eq!(
        Loss::from_identifier("mse", Activation::Identity).unwrap(),
        Loss::MeanSquaredError
    );

    assert!(Loss::from_identifier("log", Activation::ReLU).is_err());
    assert!(Loss::from_identifier("mse", Activation::Softmax).is_err());
    assert!(matches!(
        Loss::from_identifier("hinge", Activation::Identity),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn loss_identifier_round_trip_test() {
    for activation in [Activation::Identity, Activation::Softmax, Activation::Sigmoid] {
        let loss = Loss::for_output(activation);
        assert_eq!(Loss::from_identifier(loss.identifier(), activation).unwrap(), loss);
    }
}
