// src/optim/mod.rs
// Parameter updates applied after a backward pass.

pub mod optimizer_trait;
pub mod sgd;

pub use optimizer_trait::Optimizer;
pub use sgd::{sgd_update, Sgd};
