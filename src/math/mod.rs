//! Mathematical utilities: B-spline basis functions and square linear solves.

pub mod bspline;
pub mod solve;

pub use bspline::*;
pub use solve::*;
