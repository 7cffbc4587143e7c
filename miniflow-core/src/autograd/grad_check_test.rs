use super::*;
use crate::graph::Bindings;
use crate::init::randn;
use crate::matrix::Matrix;
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPSILON: f64 = 1e-6;
const TOLERANCE: f64 = 1e-4;

fn small(rows: usize, cols: usize, rng: &mut StdRng) -> Matrix<f64> {
    randn(rows, cols, rng).scale(0.5)
}

#[test]
fn test_check_grad_linear() -> Result<(), GradCheckError> {
    let mut rng = StdRng::seed_from_u64(1);
    let mut graph = Graph::<f64>::new();
    let (x, w, b, y) = (graph.input(), graph.input(), graph.input(), graph.input());
    let l = graph.linear(x, w, b)?;
    let _cost = graph.mse(y, l)?;

    let mut bindings = Bindings::new();
    bindings.insert(x, small(4, 3, &mut rng));
    bindings.insert(w, small(3, 1, &mut rng));
    bindings.insert(b, small(1, 1, &mut rng));
    bindings.insert(y, small(4, 1, &mut rng));
    let order = graph.topological_sort(bindings)?;

    check_grad(&mut graph, &order, &[x, w, b], EPSILON, TOLERANCE)
}

#[test]
fn test_check_grad_sigmoid() -> Result<(), GradCheckError> {
    let mut rng = StdRng::seed_from_u64(2);
    let mut graph = Graph::<f64>::new();
    let (z, y) = (graph.input(), graph.input());
    let s = graph.sigmoid(z)?;
    let _cost = graph.mse(y, s)?;

    let mut bindings = Bindings::new();
    bindings.insert(z, small(5, 1, &mut rng));
    bindings.insert(y, small(5, 1, &mut rng));
    let order = graph.topological_sort(bindings)?;

    check_grad(&mut graph, &order, &[z], EPSILON, TOLERANCE)
}

#[test]
fn test_check_grad_mse_both_operands() -> Result<(), GradCheckError> {
    let mut rng = StdRng::seed_from_u64(3);
    let mut graph = Graph::<f64>::new();
    let (y, p) = (graph.input(), graph.input());
    let _cost = graph.mse(y, p)?;

    let mut bindings = Bindings::new();
    bindings.insert(y, small(6, 1, &mut rng));
    bindings.insert(p, small(6, 1, &mut rng));
    let order = graph.topological_sort(bindings)?;

    check_grad(&mut graph, &order, &[y, p], EPSILON, TOLERANCE)
}

#[test]
fn test_check_grad_input_with_two_consumers() -> Result<(), GradCheckError> {
    // p feeds both the sigmoid and the loss, so its gradient is a sum of two paths.
    let mut rng = StdRng::seed_from_u64(4);
    let mut graph = Graph::<f64>::new();
    let p = graph.input();
    let s = graph.sigmoid(p)?;
    let _cost = graph.mse(p, s)?;

    let mut bindings = Bindings::new();
    bindings.insert(p, small(5, 1, &mut rng).scale(4.0));
    let order = graph.topological_sort(bindings)?;

    check_grad(&mut graph, &order, &[p], EPSILON, TOLERANCE)
}

#[test]
fn test_check_grad_shared_weight() -> Result<(), GradCheckError> {
    // w is used by two Linear nodes whose outputs meet in one loss.
    let mut rng = StdRng::seed_from_u64(5);
    let mut graph = Graph::<f64>::new();
    let (x1, x2, w, b1, b2) = (
        graph.input(),
        graph.input(),
        graph.input(),
        graph.input(),
        graph.input(),
    );
    let l1 = graph.linear(x1, w, b1)?;
    let l2 = graph.linear(x2, w, b2)?;
    let s2 = graph.sigmoid(l2)?;
    let _cost = graph.mse(l1, s2)?;

    let mut bindings = Bindings::new();
    bindings.insert(x1, small(4, 3, &mut rng));
    bindings.insert(x2, small(4, 3, &mut rng));
    bindings.insert(w, small(3, 1, &mut rng));
    bindings.insert(b1, small(1, 1, &mut rng));
    bindings.insert(b2, small(1, 1, &mut rng));
    let order = graph.topological_sort(bindings)?;

    check_grad(&mut graph, &order, &[w, x1, x2, b1, b2], EPSILON, TOLERANCE)
}

#[test]
fn test_check_grad_ignores_unused_head() -> Result<(), GradCheckError> {
    let mut rng = StdRng::seed_from_u64(6);
    let mut graph = Graph::<f64>::new();
    let p = graph.input();
    let s = graph.sigmoid(p)?;
    let _head = graph.sigmoid(p)?;
    let _cost = graph.mse(p, s)?;

    let mut bindings = Bindings::new();
    bindings.insert(p, small(3, 1, &mut rng));
    let order = graph.topological_sort(bindings)?;

    check_grad(&mut graph, &order, &[p], EPSILON, TOLERANCE)
}

#[test]
fn test_check_grad_restores_values() -> Result<(), GradCheckError> {
    let mut graph = Graph::<f64>::new();
    let (y, p) = (graph.input(), graph.input());
    let cost = graph.mse(y, p)?;

    let mut bindings = Bindings::new();
    bindings.insert(y, Matrix::column(vec![1.0, 2.0]));
    bindings.insert(p, Matrix::column(vec![1.5, 1.0]));
    let order = graph.topological_sort(bindings)?;

    check_grad(&mut graph, &order, &[p], EPSILON, TOLERANCE)?;
    assert_eq!(graph.value(p)?.data(), &[1.5, 1.0]);
    assert_eq!(graph.value(cost)?.item()?, 0.625);
    Ok(())
}

#[test]
fn test_check_grad_empty_order() {
    let mut graph = Graph::<f64>::new();
    assert_eq!(
        check_grad(&mut graph, &[], &[], EPSILON, TOLERANCE),
        Err(GradCheckError::EmptyOrder)
    );
}

#[test]
fn test_check_grad_requires_input_nodes() -> Result<(), GradCheckError> {
    let mut graph = Graph::<f64>::new();
    let (y, p) = (graph.input(), graph.input());
    let cost = graph.mse(y, p)?;

    let mut bindings = Bindings::new();
    bindings.insert(y, Matrix::column(vec![1.0]));
    bindings.insert(p, Matrix::column(vec![0.0]));
    let order = graph.topological_sort(bindings)?;

    assert_eq!(
        check_grad(&mut graph, &order, &[cost], EPSILON, TOLERANCE),
        Err(GradCheckError::Engine(MiniflowError::NotAnInput(cost)))
    );
    Ok(())
}
