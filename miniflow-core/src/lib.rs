//! # miniflow-core
//!
//! A minimal reverse-mode automatic-differentiation engine. A [`Graph`] is assembled from
//! four primitives (Input, Linear, Sigmoid, MSE), sorted once with
//! [`Graph::topological_sort`], then driven step by step:
//!
//! 1. rebind the data Inputs with [`Graph::set_value`];
//! 2. [`Graph::forward_and_backward`];
//! 3. [`sgd_update`] on the trainable Inputs;
//! 4. read the loss from the last node of the order.

pub mod autograd;
pub mod error;
pub mod graph;
pub mod init;
pub mod matrix;
pub mod ops;
pub mod optim;
pub mod scalar;

pub use error::MiniflowError;
pub use graph::{Bindings, Graph, Node, NodeId, Op};
pub use matrix::Matrix;
pub use optim::{sgd_update, Optimizer, Sgd};
pub use scalar::Element;
// Re-export traits required by public functions/structs
pub use num_traits;
