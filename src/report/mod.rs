//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fitting/units code stays free of presentation concerns
//! - output changes are localized (and covered by string tests)

pub mod format;

pub use format::*;
