use num_traits::Float;
use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::AddAssign;

/// Numeric element type stored in a [`Matrix`](crate::Matrix).
///
/// Blanket-implemented for every float that satisfies the bounds, in practice
/// `f32` and `f64`.
pub trait Element: Float + Debug + Display + Default + Sum + AddAssign + 'static {}

impl<T> Element for T where T: Float + Debug + Display + Default + Sum + AddAssign + 'static {}
