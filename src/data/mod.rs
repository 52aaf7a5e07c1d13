//! Loaded datasets.

pub mod repository;

pub use repository::CurveRepository;
