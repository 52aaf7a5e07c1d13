//! `critview-curves` library crate.
//!
//! The binary (`critview`) is a thin wrapper around this library so that:
//!
//! - core logic (units, ingest, fitting) is testable without spawning processes
//! - the CLI and the TUI share one view pipeline

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
pub mod units;
