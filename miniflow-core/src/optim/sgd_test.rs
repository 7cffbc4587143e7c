use super::*;
use crate::graph::Bindings;
use crate::matrix::Matrix;
use approx::assert_relative_eq;

/// `cost = mse(y, x·w + b)` with every operand bound; returns (graph, order, [w, b], x).
fn linear_regression() -> (Graph<f64>, Vec<NodeId>, Vec<NodeId>, NodeId) {
    let mut graph = Graph::new();
    let (x, w, b, y) = (graph.input(), graph.input(), graph.input(), graph.input());
    let l = graph.linear(x, w, b).unwrap();
    let _cost = graph.mse(y, l).unwrap();

    let mut bindings = Bindings::new();
    bindings.insert(x, Matrix::column(vec![1.0, 2.0, 3.0]));
    bindings.insert(w, Matrix::scalar(0.0));
    bindings.insert(b, Matrix::scalar(0.0));
    bindings.insert(y, Matrix::column(vec![2.0, 4.0, 6.0]));
    let order = graph.topological_sort(bindings).unwrap();
    (graph, order, vec![w, b], x)
}

#[test]
fn test_sgd_basic_step() -> Result<(), MiniflowError> {
    let (mut graph, order, params, _) = linear_regression();
    graph.forward_and_backward(&order)?;
    let grad_w = graph.gradient(params[0])?.item()?;
    let grad_b = graph.gradient(params[1])?.item()?;

    let lr = 0.1;
    sgd_update(&mut graph, &params, lr)?;
    assert_relative_eq!(graph.value(params[0])?.item()?, -lr * grad_w, epsilon = 1e-12);
    assert_relative_eq!(graph.value(params[1])?.item()?, -lr * grad_b, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_sgd_leaves_data_inputs_alone() -> Result<(), MiniflowError> {
    let (mut graph, order, params, x) = linear_regression();
    graph.forward_and_backward(&order)?;
    let before = graph.value(x)?.clone();
    sgd_update(&mut graph, &params, 0.05)?;
    assert_eq!(graph.value(x)?, &before);
    Ok(())
}

#[test]
fn test_sgd_invalid_learning_rate() {
    let (mut graph, order, params, _) = linear_regression();
    graph.forward_and_backward(&order).unwrap();
    assert_eq!(
        sgd_update(&mut graph, &params, 0.0),
        Err(MiniflowError::InvalidLearningRate(0.0))
    );
    assert!(matches!(
        sgd_update(&mut graph, &params, f64::NAN),
        Err(MiniflowError::InvalidLearningRate(_))
    ));
    assert!(Sgd::new(params, -1.0).is_err());
}

#[test]
fn test_sgd_requires_backward_first() {
    let (mut graph, _order, params, _) = linear_regression();
    assert_eq!(
        sgd_update(&mut graph, &params, 0.1),
        Err(MiniflowError::MissingGradient(params[0]))
    );
}

#[test]
fn test_sgd_rejects_non_input() -> Result<(), MiniflowError> {
    let (mut graph, order, _, _) = linear_regression();
    graph.forward_and_backward(&order)?;
    let cost = *order.last().unwrap();
    assert_eq!(
        sgd_update(&mut graph, &[cost], 0.1),
        Err(MiniflowError::NotAnInput(cost))
    );
    Ok(())
}

#[test]
fn test_sgd_optimizer_reduces_loss() -> Result<(), MiniflowError> {
    let (mut graph, order, params, _) = linear_regression();
    let cost = *order.last().unwrap();
    let mut optimizer = Sgd::new(params.clone(), 0.05)?;
    assert_eq!(optimizer.params(), params.as_slice());

    graph.forward_and_backward(&order)?;
    let initial = graph.value(cost)?.item()?;
    for _ in 0..50 {
        graph.forward_and_backward(&order)?;
        optimizer.step(&mut graph)?;
    }
    graph.forward_and_backward(&order)?;
    let last = graph.value(cost)?.item()?;
    assert!(last < initial * 0.1, "loss {} -> {}", initial, last);

    optimizer.set_lr(0.01)?;
    assert_relative_eq!(optimizer.lr(), 0.01);
    Ok(())
}

#[test]
fn test_sgd_repeated_node_steps_twice() -> Result<(), MiniflowError> {
    let mut graph = Graph::<f64>::new();
    let (y, p) = (graph.input(), graph.input());
    let _cost = graph.mse(y, p)?;
    let mut bindings = Bindings::new();
    bindings.insert(y, Matrix::scalar(0.0));
    bindings.insert(p, Matrix::scalar(1.0));
    let order = graph.topological_sort(bindings)?;

    graph.forward_and_backward(&order)?;
    assert_relative_eq!(graph.gradient(p)?.item()?, 2.0);
    sgd_update(&mut graph, &[p, p], 0.1)?;
    assert_relative_eq!(graph.value(p)?.item()?, 0.6, epsilon = 1e-12);
    Ok(())
}
