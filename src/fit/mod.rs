//! Curve fitting.
//!
//! - interpolating B-splines over a parameter (`spline`)
//! - parametric `X(t)`, `Y(t)` fits of whole curves (`fitter`)
//! - per-dataset memoization (`cache`)

pub mod cache;
pub mod fitter;
pub mod spline;

pub use cache::*;
pub use fitter::*;
pub use spline::*;
