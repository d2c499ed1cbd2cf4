use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Compares `Dense::gradients` against central differences of the per-sample
/// objective, for every weight, every bias and every input component
fn check_layer_gradients(activation: Activation, target: Vector) {
    let loss = Loss::for_output(activation);
    let layer = sample_layer(activation);
    let input = sample_input();

    let trace = layer.forward(&input).unwrap();
    let upstream = loss.compute_grad(trace.get_output(), &target).unwrap();
    let (gradients, to_previous) = layer.gradients(&trace, &upstream).unwrap();

    let evaluate = |weights: Matrix, bias: Vector, input: &Vector| {
        let perturbed = Dense::from_parameters(weights, bias, activation).unwrap();
        let output = perturbed.forward(input).unwrap().into_output();
        objective(loss, &output, &target)
    };

    for ((i, j), &analytic) in gradients.weights.indexed_iter() {
        let mut plus = layer.get_weights().clone();
        let mut minus = layer.get_weights().clone();
        plus[[i, j]] += FD_STEP;
        minus[[i, j]] -= FD_STEP;
        let numerical = (evaluate(plus, layer.get_bias().clone(), &input)
            - evaluate(minus, layer.get_bias().clone(), &input))
            / (2.0 * FD_STEP);
        assert!(
            relative_error(analytic, numerical) < GRAD_TOLERANCE,
            "{} weight [{}, {}]: analytic {} vs numerical {}",
            activation,
            i,
            j,
            analytic,
            numerical
        );
    }

    for (i, &analytic) in gradients.bias.indexed_iter() {
        let mut plus = layer.get_bias().clone();
        let mut minus = layer.get_bias().clone();
        plus[i] += FD_STEP;
        minus[i] -= FD_STEP;
        let numerical = (evaluate(layer.get_weights().clone(), plus, &input)
            - evaluate(layer.get_weights().clone(), minus, &input))
            / (2.0 * FD_STEP);
        assert!(
            relative_error(analytic, numerical) < GRAD_TOLERANCE,
            "{} bias [{}]: analytic {} vs numerical {}",
            activation,
            i,
            analytic,
            numerical
        );
    }

    for (i, &analytic) in to_previous.indexed_iter() {
        let mut plus = input.clone();
        let mut minus = input.clone();
        plus[i] += FD_STEP;
        minus[i] -= FD_STEP;
        let numerical = (evaluate(layer.get_weights().clone(), layer.get_bias().clone(), &plus)
            - evaluate(layer.get_weights().clone(), layer.get_bias().clone(), &minus))
            / (2.0 * FD_STEP);
        assert!(
            relative_error(analytic, numerical) < GRAD_TOLERANCE,
            "{} input [{}]: analytic {} vs numerical {}",
            activation,
            i,
            analytic,
            numerical
        );
    }
}

#[test]
fn dense_new_shapes_test() {
    let mut rng = StdRng::seed_from_u64(42);
    let layer = Dense::new(4, 3, Activation::ReLU, &mut rng).unwrap();

    assert_eq!(layer.get_previous_height(), 4);
    assert_eq!(layer.get_height(), 3);
    assert_eq!(layer.get_weights().dim(), (3, 4));
    assert_eq!(layer.get_bias().len(), 3);
    assert_eq!(layer.param_count(), 15);
    assert_eq!(layer.output_shape(), "(None, 3)");
    assert_eq!(layer.get_step_count(), 0);
    assert!(layer.get_grad_weights().iter().all(|&g| g == 0.0));
    assert!(layer.get_grad_bias().iter().all(|&g| g == 0.0));
    assert!(layer.get_optimizer_config().is_none());
}

#[test]
fn dense_new_initialization_range_test() {
    let mut rng = StdRng::seed_from_u64(3);
    let layer = Dense::new(20, 30, Activation::Identity, &mut rng).unwrap();

    assert!(layer.get_weights().iter().all(|w| (-1.0..=1.0).contains(w)));
    assert!(layer.get_bias().iter().all(|b| (-1.0..=1.0).contains(b)));
    // not all drawn from the same value
    let first = layer.get_weights()[[0, 0]];
    assert!(layer.get_weights().iter().any(|&w| w != first));
}

#[test]
fn dense_new_is_reproducible_test() {
    let a = Dense::new(5, 2, Activation::ReLU, &mut StdRng::seed_from_u64(9)).unwrap();
    let b = Dense::new(5, 2, Activation::ReLU, &mut StdRng::seed_from_u64(9)).unwrap();
    let c = Dense::new(5, 2, Activation::ReLU, &mut StdRng::seed_from_u64(10)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a.get_weights(), c.get_weights());
}

#[test]
fn dense_zero_dimension_is_rejected_test() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        Dense::new(0, 3, Activation::ReLU, &mut rng),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(Dense::new(3, 0, Activation::ReLU, &mut rng).is_err());
}

#[test]
fn dense_from_parameters_validation_test() {
    let result = Dense::from_parameters(Matrix::zeros((2, 3)), Vector::zeros(3), Activation::ReLU);
    assert!(matches!(result, Err(ModelError::DimensionMismatch(_))));

    let result = Dense::from_parameters(
        array![[1.0, f64::NAN]],
        array![0.0],
        Activation::Identity,
    );
    assert!(matches!(result, Err(ModelError::NonFiniteValue(_))));
}

#[test]
fn dense_forward_values_test() {
    let layer = sample_layer(Activation::ReLU);
    let trace = layer.forward(&sample_input()).unwrap();

    assert_eq!(trace.get_input(), &sample_input());
    assert_all_close(trace.get_pre_activation(), &array![1.475, -1.55, 0.575], 1e-12);
    assert_all_close(trace.get_output(), &array![1.475, 0.0, 0.575], 1e-12);
}

#[test]
fn dense_forward_is_deterministic_test() {
    let layer = sample_layer(Activation::Softmax);
    let first = layer.forward(&sample_input()).unwrap();
    let second = layer.forward(&sample_input()).unwrap();

    assert_eq!(first, second);
    assert_relative_eq!(first.get_output().sum(), 1.0, epsilon = 1e-12);
}

#[test]
fn dense_forward_dimension_mismatch_test() {
    let layer = sample_layer(Activation::ReLU);
    let result = layer.forward(&array![1.0, 2.0]);
    assert!(matches!(result, Err(ModelError::DimensionMismatch(_))));
}

#[test]
fn dense_gradients_dimension_mismatch_test() {
    let layer = sample_layer(Activation::ReLU);
    let trace = layer.forward(&sample_input()).unwrap();

    let result = layer.gradients(&trace, &array![1.0, 1.0]);
    assert!(matches!(result, Err(ModelError::DimensionMismatch(_))));

    let other = Dense::from_parameters(Matrix::ones((3, 2)), Vector::zeros(3), Activation::ReLU)
        .unwrap();
    let foreign = other.forward(&array![1.0, 1.0]).unwrap();
    assert!(layer.gradients(&foreign, &array![1.0, 1.0, 1.0]).is_err());
}

#[test]
fn dense_gradient_check_identity_mse_test() {
    check_layer_gradients(Activation::Identity, array![1.0, 0.0, -0.5]);
}

#[test]
fn dense_gradient_check_relu_mse_test() {
    check_layer_gradients(Activation::ReLU, array![1.0, 0.5, -0.5]);
}

#[test]
fn dense_gradient_check_leaky_relu_mse_test() {
    check_layer_gradients(Activation::LeakyReLU, array![1.0, 0.5, -0.5]);
}

#[test]
fn dense_gradient_check_softmax_log_test() {
    check_layer_gradients(Activation::Softmax, array![0.0, 0.0, 1.0]);
}

#[test]
fn dense_gradient_check_sigmoid_log_test() {
    check_layer_gradients(Activation::Sigmoid, array![1.0, 0.0, 1.0]);
}

#[test]
fn dense_relu_blocks_negative_pre_activation_test() {
    let layer = sample_layer(Activation::ReLU);
    let trace = layer.forward(&sample_input()).unwrap();
    let (gradients, _) = layer.gradients(&trace, &array![1.0, 1.0, 1.0]).unwrap();

    // neuron 1 has a negative pre-activation
    assert!(gradients.weights.row(1).iter().all(|&g| g == 0.0));
    assert_eq!(gradients.bias[1], 0.0);
    assert_all_close(&gradients.weights.row(0).to_owned(), &sample_input(), 1e-12);
}

#[test]
fn dense_backward_accumulates_test() {
    let mut layer = sample_layer(Activation::Identity);
    let trace = layer.forward(&sample_input()).unwrap();
    let upstream = array![0.5, -1.0, 2.0];

    let (expected, expected_previous) = layer.gradients(&trace, &upstream).unwrap();
    let to_previous = layer.backward(&trace, &upstream).unwrap();
    layer.backward(&trace, &upstream).unwrap();

    assert_all_close(&to_previous, &expected_previous, 1e-12);
    assert_all_close(layer.get_grad_weights(), &(&expected.weights * 2.0), 1e-12);
    assert_all_close(layer.get_grad_bias(), &(&expected.bias * 2.0), 1e-12);
}

#[test]
fn dense_accumulation_is_order_independent_test() {
    let inputs = [
        array![0.5, -1.0, 2.0, 0.25],
        array![1.0, 0.0, -0.5, 0.75],
        array![-0.25, 0.5, 0.5, -1.0],
    ];
    let upstreams = [
        array![0.1, 0.2, -0.3],
        array![-0.5, 0.4, 0.0],
        array![0.9, -0.1, 0.25],
    ];

    let mut forward_order = sample_layer(Activation::LeakyReLU);
    let mut reverse_order = sample_layer(Activation::LeakyReLU);

    for (input, upstream) in inputs.iter().zip(upstreams.iter()) {
        let trace = forward_order.forward(input).unwrap();
        forward_order.backward(&trace, upstream).unwrap();
    }
    for (input, upstream) in inputs.iter().zip(upstreams.iter()).rev() {
        let trace = reverse_order.forward(input).unwrap();
        reverse_order.backward(&trace, upstream).unwrap();
    }

    assert_all_close(forward_order.get_grad_weights(), reverse_order.get_grad_weights(), 1e-12);
    assert_all_close(forward_order.get_grad_bias(), reverse_order.get_grad_bias(), 1e-12);
}

#[test]
fn dense_accumulate_shape_mismatch_test() {
    let mut layer = sample_layer(Activation::Identity);
    let gradients = LayerGradients {
        weights: Matrix::zeros((2, 4)),
        bias: Vector::zeros(2),
    };
    assert!(matches!(
        layer.accumulate(&gradients),
        Err(ModelError::DimensionMismatch(_))
    ));
}

#[test]
fn dense_update_without_optimizer_test() {
    let mut layer = sample_layer(Activation::Identity);
    assert!(matches!(layer.update(1), Err(ModelError::NotConfigured(_))));
    assert_eq!(layer.get_step_count(), 0);
}

#[test]
fn dense_update_zero_batch_test() {
    let mut layer = sample_layer(Activation::Identity);
    layer.configure_optimizer(adam());
    assert!(matches!(layer.update(0), Err(ModelError::InputValidationError(_))));
}

#[test]
fn dense_update_resets_accumulators_test() {
    let mut layer = sample_layer(Activation::Identity);
    layer.configure_optimizer(adam());
    let before = layer.get_weights().clone();

    let trace = layer.forward(&sample_input()).unwrap();
    layer.backward(&trace, &array![1.0, -1.0, 0.5]).unwrap();
    layer.update(1).unwrap();

    assert_eq!(layer.get_step_count(), 1);
    assert!(layer.get_grad_weights().iter().all(|&g| g == 0.0));
    assert!(layer.get_grad_bias().iter().all(|&g| g == 0.0));
    assert_ne!(layer.get_weights(), &before);
}

#[test]
fn dense_layer_weight_view_test() {
    let layer = sample_layer(Activation::Identity);
    let view = layer.get_layer_weight();
    assert_eq!(view.weight, layer.get_weights());
    assert_eq!(view.bias, layer.get_bias());
    assert_eq!(layer.layer_type(), "Dense");
}

#[test]
fn dense_forward_rejects_non_finite_input_test() {
    // ReLU would turn the NaN pre-activation into a plain zero
    let layer = sample_layer(Activation::ReLU);
    let result = layer.forward(&array![f64::NAN, 0.0, 0.0, 0.0]);
    assert!(matches!(result, Err(ModelError::NonFiniteValue(_))));

    let layer = sample_layer(Activation::Identity);
    let result = layer.forward(&array![f64::INFINITY, 0.0, 0.0, 0.0]);
    assert!(matches!(result, Err(ModelError::NonFiniteValue(_))));
}

#[test]
fn dense_gradients_overflow_is_reported_test() {
    let layer = sample_layer(Activation::Identity);
    let trace = layer.forward(&Vector::from_elem(4, 1e200)).unwrap();
    assert!(trace.get_output().iter().all(|x| x.is_finite()));

    // outer(1e200, 1e200) overflows
    let result = layer.gradients(&trace, &Vector::from_elem(3, 1e200));
    assert!(matches!(result, Err(ModelError::NonFiniteValue(_))));
}

#[test]
fn dense_accumulate_rejects_non_finite_test() {
    let mut layer = sample_layer(Activation::Identity);
    let gradients = LayerGradients {
        weights: Matrix::from_elem((3, 4), f64::NAN),
        bias: Vector::zeros(3),
    };

    assert!(matches!(
        layer.accumulate(&gradients),
        Err(ModelError::NonFiniteValue(_))
    ));
    assert!(layer.get_grad_weights().iter().all(|&g| g == 0.0));
}

#[test]
fn dense_failed_update_leaves_layer_unchanged_test() {
    let mut layer = sample_layer(Activation::Identity);
    layer.configure_optimizer(adam());

    // two finite gradients whose sum overflows
    let gradients = LayerGradients {
        weights: Matrix::from_elem((3, 4), 1.5e308),
        bias: Vector::from_elem(3, 1.5e308),
    };
    layer.accumulate(&gradients).unwrap();
    layer.accumulate(&gradients).unwrap();
    let before = layer.clone();

    assert!(matches!(layer.update(1), Err(ModelError::NonFiniteValue(_))));
    assert_eq!(layer, before);
    assert_eq!(layer.get_step_count(), 0);

    layer.clear_gradients();
    assert!(layer.get_grad_weights().iter().all(|&g| g == 0.0));
    assert!(layer.get_grad_bias().iter().all(|&g| g == 0.0));
    layer.update(1).unwrap();
    assert_eq!(layer.get_step_count(), 1);
}
