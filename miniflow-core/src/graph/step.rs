//! One training step over a sorted node list: reset, forward, backward.
//!
//! Backward correctness relies on two things:
//! - every consumer of a node runs its backward before the node itself, which the
//!   reverse of a topological order guarantees;
//! - `gradients` starts empty, because backward adds into existing entries.

use super::{Graph, NodeId, Op};
use crate::error::MiniflowError;
use crate::matrix::Matrix;
use crate::ops::{linear, mse, sigmoid};
use crate::scalar::Element;
use std::collections::btree_map::Entry;

impl<T: Element> Graph<T> {
    /// Clears the `gradients` map of every listed node.
    pub fn reset_gradients(&mut self, order: &[NodeId]) -> Result<(), MiniflowError> {
        for &id in order {
            self.node_mut(id)?.gradients.clear();
        }
        Ok(())
    }

    /// Runs each node's forward computation in the given (ascending) order.
    pub fn forward_pass(&mut self, order: &[NodeId]) -> Result<(), MiniflowError> {
        for &id in order {
            self.forward_node(id)?;
        }
        Ok(())
    }

    /// Runs each node's backward computation in reverse of the given order.
    pub fn backward_pass(&mut self, order: &[NodeId]) -> Result<(), MiniflowError> {
        for &id in order.iter().rev() {
            self.backward_node(id)?;
        }
        Ok(())
    }

    /// Executes one step: clears gradients, runs forward in order, then backward in reverse.
    ///
    /// `order` is normally the output of [`Graph::topological_sort`]. The first error
    /// aborts the step and is returned as is.
    pub fn forward_and_backward(&mut self, order: &[NodeId]) -> Result<(), MiniflowError> {
        log::debug!("forward_and_backward: {} node(s)", order.len());
        self.reset_gradients(order)?;
        self.forward_pass(order)?;
        self.backward_pass(order)
    }

    fn forward_node(&mut self, id: NodeId) -> Result<(), MiniflowError> {
        let op = self.node(id)?.op;
        let value = match op {
            Op::Input => {
                // Nothing to compute, but an unbound Input must fail here.
                self.value(id)?;
                return Ok(());
            }
            Op::Linear { x, w, b } => linear::forward(self.value(x)?, self.value(w)?, self.value(b)?)?,
            Op::Sigmoid { z } => sigmoid::forward(self.value(z)?),
            Op::Mse { y_true, y_pred } => mse::forward(self.value(y_true)?, self.value(y_pred)?)?,
        };
        log::trace!("forward: {} {} -> {:?}", op.name(), id, value.shape());
        self.node_mut(id)?.value = Some(value);
        Ok(())
    }

    fn backward_node(&mut self, id: NodeId) -> Result<(), MiniflowError> {
        let op = self.node(id)?.op;
        let grad_out = self.upstream_gradient(id)?;
        let contributions: Vec<(NodeId, Matrix<T>)> = match op {
            Op::Input => vec![(id, grad_out)],
            Op::Linear { x, w, b } => {
                let grads = linear::backward(self.value(x)?, self.value(w)?, self.value(b)?, &grad_out)?;
                vec![(x, grads.x), (w, grads.w), (b, grads.b)]
            }
            Op::Sigmoid { z } => vec![(z, sigmoid::backward(self.value(id)?, &grad_out)?)],
            Op::Mse { y_true, y_pred } => {
                let grads = mse::backward(self.value(y_true)?, self.value(y_pred)?, &grad_out)?;
                vec![(y_true, grads.y_true), (y_pred, grads.y_pred)]
            }
        };
        log::trace!("backward: {} {} -> {} contribution(s)", op.name(), id, contributions.len());

        let gradients = &mut self.node_mut(id)?.gradients;
        for (key, grad) in contributions {
            match gradients.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(grad);
                }
                Entry::Occupied(mut slot) => slot.get_mut().add_assign(&grad)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "step_test.rs"]
mod tests;
