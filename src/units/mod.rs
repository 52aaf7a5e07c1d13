//! Physical units for axis display.
//!
//! - static category / variable tables (`registry`)
//! - conversion factors and per-axis scaling (`convert`)

pub mod convert;
pub mod registry;

pub use convert::*;
pub use registry::*;
