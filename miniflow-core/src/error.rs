use crate::graph::NodeId;
use thiserror::Error;

/// Custom error type for the MiniFlow engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum MiniflowError {
    #[error("Dimension mismatch during operation {operation}: expected {expected}, got {actual}")]
    DimensionMismatch {
        operation: String,
        expected: String,
        actual: String,
    },

    #[error("Value of node {node} was read before being set")]
    UninitializedValue { node: NodeId },

    #[error("Cycle detected in the computation graph: {} node(s) could not be placed", .unplaced.len())]
    CyclicGraph { unplaced: Vec<NodeId> },

    #[error("Node {0} does not belong to this graph")]
    UnknownNode(NodeId),

    #[error("Node {0} is not an Input node")]
    NotAnInput(NodeId),

    #[error("No gradient recorded for node {0}; run a backward pass first")]
    MissingGradient(NodeId),

    #[error("Learning rate must be a finite positive number, got {0}")]
    InvalidLearningRate(f64),

    #[error("Matrix creation error: data length {data_len} does not match shape {shape:?}")]
    MatrixCreation { data_len: usize, shape: (usize, usize) },
}
