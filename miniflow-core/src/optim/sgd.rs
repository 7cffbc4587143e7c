use super::optimizer_trait::Optimizer;
use crate::error::MiniflowError;
use crate::graph::{Graph, NodeId};
use crate::scalar::Element;
use num_traits::ToPrimitive;

fn check_learning_rate<T: Element>(learning_rate: T) -> Result<(), MiniflowError> {
    if !learning_rate.is_finite() || learning_rate <= T::zero() {
        return Err(MiniflowError::InvalidLearningRate(
            learning_rate.to_f64().unwrap_or(f64::NAN),
        ));
    }
    Ok(())
}

/// Plain gradient descent: `value -= learning_rate * gradient` for every trainable node.
///
/// Every node is validated before any value is modified, so a failing call leaves the
/// graph untouched. Updates are applied in list order; a node listed `n` times takes
/// `n` steps with the gradient from the last backward pass.
///
/// # Errors
/// * `InvalidLearningRate` if `learning_rate` is not finite and positive.
/// * `UnknownNode` / `NotAnInput` for handles that are not Inputs of `graph`.
/// * `MissingGradient` if no backward pass recorded a gradient for a node.
/// * `UninitializedValue` if a parameter was never bound.
/// * `DimensionMismatch` if a gradient does not match its parameter's shape.
pub fn sgd_update<T: Element>(
    graph: &mut Graph<T>,
    trainables: &[NodeId],
    learning_rate: T,
) -> Result<(), MiniflowError> {
    check_learning_rate(learning_rate)?;

    for &id in trainables {
        let gradient = graph.gradient(id)?;
        let value = graph.value(id)?;
        if gradient.shape() != value.shape() {
            return Err(MiniflowError::DimensionMismatch {
                operation: "sgd_update".to_string(),
                expected: format!("{:?}", value.shape()),
                actual: format!("{:?}", gradient.shape()),
            });
        }
    }
    // Applied in sequence, so a node listed twice is stepped twice.
    for &id in trainables {
        let step = graph.gradient(id)?.scale(-learning_rate);
        let mut value = graph.value(id)?.clone();
        value.add_assign(&step)?;
        graph.set_value(id, value)?;
    }
    log::debug!("sgd_update: {} parameter(s), lr = {}", trainables.len(), learning_rate);
    Ok(())
}

/// Stochastic gradient descent over a fixed list of trainable nodes.
///
/// No momentum and no adaptive scaling; `step` is [`sgd_update`] with the stored settings.
#[derive(Debug, Clone)]
pub struct Sgd<T> {
    params: Vec<NodeId>,
    lr: T,
}

impl<T: Element> Sgd<T> {
    /// Creates a new `Sgd`.
    ///
    /// # Arguments
    ///
    /// * `params`: the trainable Input nodes to update.
    /// * `lr`: the learning rate, a finite positive number.
    pub fn new(params: impl IntoIterator<Item = NodeId>, lr: T) -> Result<Self, MiniflowError> {
        check_learning_rate(lr)?;
        Ok(Sgd {
            params: params.into_iter().collect(),
            lr,
        })
    }

    pub fn lr(&self) -> T {
        self.lr
    }

    pub fn set_lr(&mut self, lr: T) -> Result<(), MiniflowError> {
        check_learning_rate(lr)?;
        self.lr = lr;
        Ok(())
    }
}

impl<T: Element> Optimizer<T> for Sgd<T> {
    fn step(&mut self, graph: &mut Graph<T>) -> Result<(), MiniflowError> {
        sgd_update(graph, &self.params, self.lr)
    }

    fn params(&self) -> &[NodeId] {
        &self.params
    }
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod tests;
