use crate::error::MiniflowError;
use crate::graph::{Graph, NodeId};
use crate::scalar::Element;
use approx::relative_eq;
use num_traits::{NumCast, ToPrimitive};
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for node {node}, element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        node: NodeId,
        element_index: usize,
        analytical_grad: f64, // f64 whatever the graph element type
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Numerical gradient is NaN or infinite for node {node}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        node: NodeId,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for node {node}, element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        node: NodeId,
        element_index: usize,
        value: f64,
    },
    #[error("Gradient check needs a non-empty node order ending in the loss node")]
    EmptyOrder,
    #[error("Engine error during gradient check: {0}")]
    Engine(#[from] MiniflowError),
}

fn to_f64<T: Element>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

fn from_f64<T: Element>(v: f64) -> T {
    <T as NumCast>::from(v).unwrap_or_else(T::nan)
}

fn loss_value<T: Element>(graph: &Graph<T>, loss: NodeId) -> Result<f64, GradCheckError> {
    Ok(to_f64(graph.value(loss)?.item()?))
}

/// Checks analytical gradients against central finite differences.
///
/// The last node of `order` is the (scalar) loss. For every Input in `wrt` and every element
/// of its value, the loss is re-evaluated with the element shifted by `±epsilon` and
/// `(loss+ - loss-) / 2·epsilon` is compared with the gradient from
/// [`Graph::forward_and_backward`]. A pair passes when it is within `tolerance` either
/// absolutely or relatively.
///
/// Perturbed values are always restored, and the graph is left with the values and gradients
/// of the unperturbed step.
pub fn check_grad<T: Element>(
    graph: &mut Graph<T>,
    order: &[NodeId],
    wrt: &[NodeId],
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError> {
    let loss = *order.last().ok_or(GradCheckError::EmptyOrder)?;

    // --- 1. Analytical gradients ---
    graph.forward_and_backward(order)?;
    let mut analytical: Vec<Vec<f64>> = Vec::with_capacity(wrt.len());
    for &id in wrt {
        analytical.push(graph.gradient(id)?.data().iter().map(|&g| to_f64(g)).collect());
    }

    // --- 2. Numerical gradients, one element at a time ---
    let mut outcome = Ok(());
    'nodes: for (&id, analytical_grads) in wrt.iter().zip(analytical.iter()) {
        let original = graph.value(id)?.clone();
        for (element_index, &analytical_grad) in analytical_grads.iter().enumerate() {
            let base = to_f64(original.data()[element_index]);

            let mut shifted = original.clone();
            shifted.data_mut()[element_index] = from_f64(base + epsilon);
            graph.set_value(id, shifted.clone())?;
            graph.forward_pass(order)?;
            let loss_plus = loss_value(graph, loss)?;

            shifted.data_mut()[element_index] = from_f64(base - epsilon);
            graph.set_value(id, shifted)?;
            graph.forward_pass(order)?;
            let loss_minus = loss_value(graph, loss)?;

            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);

            if !numerical_grad.is_finite() {
                outcome = Err(GradCheckError::NumericalGradNaNOrInfinite {
                    node: id,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            } else if !analytical_grad.is_finite() {
                outcome = Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    node: id,
                    element_index,
                    value: analytical_grad,
                });
            } else if !relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = tolerance,
                max_relative = tolerance
            ) {
                outcome = Err(GradCheckError::GradientMismatch {
                    node: id,
                    element_index,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
            if outcome.is_err() {
                graph.set_value(id, original.clone())?;
                break 'nodes;
            }
        }
        graph.set_value(id, original)?;
    }

    // --- 3. Leave the graph as the unperturbed step left it ---
    graph.forward_and_backward(order)?;
    outcome
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
