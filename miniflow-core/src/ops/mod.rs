//! # Primitive operations (`ops`)
//!
//! Pure forward/backward kernels for the three computing node kinds. They take operand
//! values and return new matrices; wiring them to nodes (reading operand values, summing
//! the upstream gradient, recording contributions) is done by
//! [`graph::step`](crate::graph::step).
//!
//! - [`linear`]: affine transform `x · w + b`.
//! - [`sigmoid`]: elementwise logistic function.
//! - [`mse`]: mean squared error.

pub mod linear;
pub mod mse;
pub mod sigmoid;

pub use linear::LinearGrads;
pub use mse::MseGrads;
