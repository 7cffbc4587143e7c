// src/autograd/mod.rs
// Tooling around the backward pass. The pass itself lives in `graph::step`.

pub mod grad_check;

pub use grad_check::{check_grad, GradCheckError};
