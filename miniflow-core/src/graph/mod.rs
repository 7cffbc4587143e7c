//! # Computation graph (`graph`)
//!
//! The graph is an arena: every [`Node`] lives in a `Vec` owned by [`Graph`] and is
//! addressed by a stable [`NodeId`]. Edges are plain handle lists:
//!
//! - `inbound`: the ordered operands of a node, fixed when the node is built.
//! - `outbound`: back-references to the consumers of a node, filled in automatically
//!   whenever a consumer is built. They are used for lookup only, never for ownership.
//!
//! Submodules:
//! - [`sort`]: dependency ordering of the reachable nodes (`topological_sort`).
//! - [`step`]: the reset → forward → backward protocol (`forward_and_backward`).

use crate::error::MiniflowError;
use crate::matrix::Matrix;
use crate::scalar::Element;
use std::collections::BTreeMap;
use std::fmt;

pub mod sort;
pub mod step;

pub use sort::{topological_order, Bindings, Topology};

/// Stable handle of a node inside a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Builds a handle from a raw arena index.
    ///
    /// Handles built this way are only meaningful for the graph (or [`Topology`])
    /// that issued that index; graphs reject indices they do not own.
    pub fn from_index(index: usize) -> Self {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of operations a node can perform, with its operand handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Leaf holding externally supplied data or a trainable parameter.
    Input,
    /// `x · w + b`, with `b` broadcast over the rows.
    Linear { x: NodeId, w: NodeId, b: NodeId },
    /// Elementwise logistic function.
    Sigmoid { z: NodeId },
    /// Mean squared error between two same-shaped operands.
    Mse { y_true: NodeId, y_pred: NodeId },
}

impl Op {
    /// Operand handles in declaration order.
    pub fn operands(&self) -> Vec<NodeId> {
        match *self {
            Op::Input => Vec::new(),
            Op::Linear { x, w, b } => vec![x, w, b],
            Op::Sigmoid { z } => vec![z],
            Op::Mse { y_true, y_pred } => vec![y_true, y_pred],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Op::Input => "Input",
            Op::Linear { .. } => "Linear",
            Op::Sigmoid { .. } => "Sigmoid",
            Op::Mse { .. } => "MSE",
        }
    }
}

/// A unit of computation in the arena.
#[derive(Debug, Clone)]
pub struct Node<T = f64> {
    op: Op,
    inbound: Vec<NodeId>,
    outbound: Vec<NodeId>,
    value: Option<Matrix<T>>,
    /// Gradient contribution of this node to each of its inbound nodes.
    /// Input nodes keep their total gradient here, keyed by their own id.
    gradients: BTreeMap<NodeId, Matrix<T>>,
}

impl<T: Element> Node<T> {
    fn new(op: Op) -> Self {
        Node {
            op,
            inbound: op.operands(),
            outbound: Vec::new(),
            value: None,
            gradients: BTreeMap::new(),
        }
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn is_input(&self) -> bool {
        self.op == Op::Input
    }

    pub fn inbound(&self) -> &[NodeId] {
        &self.inbound
    }

    pub fn outbound(&self) -> &[NodeId] {
        &self.outbound
    }

    pub fn value(&self) -> Option<&Matrix<T>> {
        self.value.as_ref()
    }

    pub fn gradients(&self) -> &BTreeMap<NodeId, Matrix<T>> {
        &self.gradients
    }
}

/// Arena owning every node of a computation.
#[derive(Debug, Clone, Default)]
pub struct Graph<T = f64> {
    nodes: Vec<Node<T>>,
}

impl<T: Element> Graph<T> {
    pub fn new() -> Self {
        Graph { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a leaf whose value is bound later, either as data or as a trainable parameter.
    pub fn input(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(Op::Input));
        id
    }

    /// Adds `x · w + b`.
    pub fn linear(&mut self, x: NodeId, w: NodeId, b: NodeId) -> Result<NodeId, MiniflowError> {
        self.add_node(Op::Linear { x, w, b })
    }

    /// Adds the elementwise logistic function of `z`.
    pub fn sigmoid(&mut self, z: NodeId) -> Result<NodeId, MiniflowError> {
        self.add_node(Op::Sigmoid { z })
    }

    /// Adds the mean squared error between `y_true` and `y_pred`.
    pub fn mse(&mut self, y_true: NodeId, y_pred: NodeId) -> Result<NodeId, MiniflowError> {
        self.add_node(Op::Mse { y_true, y_pred })
    }

    // Operands must already exist, so every graph built here is acyclic.
    fn add_node(&mut self, op: Op) -> Result<NodeId, MiniflowError> {
        let operands = op.operands();
        for &operand in &operands {
            self.node(operand)?;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(op));
        for operand in operands {
            let outbound = &mut self.nodes[operand.0].outbound;
            if !outbound.contains(&id) {
                outbound.push(id);
            }
        }
        log::trace!("graph: added {} node {}", op.name(), id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node<T>, MiniflowError> {
        self.nodes.get(id.0).ok_or(MiniflowError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>, MiniflowError> {
        self.nodes.get_mut(id.0).ok_or(MiniflowError::UnknownNode(id))
    }

    /// Iterates over every node handle in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Current value of a node.
    ///
    /// # Errors
    /// `UninitializedValue` if the node was never bound (Input) or never forwarded.
    pub fn value(&self, id: NodeId) -> Result<&Matrix<T>, MiniflowError> {
        self.node(id)?
            .value
            .as_ref()
            .ok_or(MiniflowError::UninitializedValue { node: id })
    }

    /// Binds the value of an Input node.
    pub fn set_value(&mut self, id: NodeId, value: Matrix<T>) -> Result<(), MiniflowError> {
        let node = self.node_mut(id)?;
        if !node.is_input() {
            return Err(MiniflowError::NotAnInput(id));
        }
        node.value = Some(value);
        Ok(())
    }

    /// Total gradient of the loss with respect to an Input, as recorded by its last backward call.
    pub fn gradient(&self, id: NodeId) -> Result<&Matrix<T>, MiniflowError> {
        let node = self.node(id)?;
        if !node.is_input() {
            return Err(MiniflowError::NotAnInput(id));
        }
        node.gradients
            .get(&id)
            .ok_or(MiniflowError::MissingGradient(id))
    }

    /// The contribution `consumer` recorded for its operand `operand` during backward.
    pub fn gradient_wrt(&self, consumer: NodeId, operand: NodeId) -> Option<&Matrix<T>> {
        self.nodes
            .get(consumer.0)
            .and_then(|node| node.gradients.get(&operand))
    }

    /// Gradient of the loss with respect to the output of `id`, summed over its consumers.
    ///
    /// An MSE node without consumers is the loss and receives the constant 1. Any other
    /// node without consumers does not feed the loss and receives zeros.
    pub(crate) fn upstream_gradient(&self, id: NodeId) -> Result<Matrix<T>, MiniflowError> {
        let node = self.node(id)?;
        let value = self.value(id)?;
        if node.outbound.is_empty() {
            return Ok(match node.op {
                Op::Mse { .. } => Matrix::full(value.rows(), value.cols(), T::one()),
                _ => Matrix::zeros_like(value),
            });
        }
        let mut total = Matrix::zeros_like(value);
        for &consumer in &node.outbound {
            match self.gradient_wrt(consumer, id) {
                Some(contribution) => total.add_assign(contribution)?,
                None => log::trace!("graph: consumer {} recorded no gradient for {}", consumer, id),
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
