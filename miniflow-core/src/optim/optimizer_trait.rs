use crate::error::MiniflowError;
use crate::graph::{Graph, NodeId};
use crate::scalar::Element;

/// Trait defining the common interface for optimizers.
///
/// Optimizers update the trainable Input nodes of a [`Graph`] from the gradients
/// recorded by the last backward pass. They never touch data Inputs.
pub trait Optimizer<T: Element> {
    /// Performs a single optimization step on `graph`.
    fn step(&mut self, graph: &mut Graph<T>) -> Result<(), MiniflowError>;

    /// The trainable nodes managed by this optimizer.
    fn params(&self) -> &[NodeId];
}
