//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - curve samples and curves (`Sample`, `Curve`)
//! - attribute filters (`AttributeFilter`, `FilterSet`)
//! - column names and session settings

pub mod types;

pub use types::*;
