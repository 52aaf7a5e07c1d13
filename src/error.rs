//! Error types.
//!
//! Core failures are typed per concern so callers can decide what is fatal:
//!
//! - [`LoadError`]: the dataset could not be read (the session continues with an
//!   empty repository)
//! - [`FitError`]: a single curve could not be fitted (skip it, keep going)
//! - [`UnitError`]: a unit name is not registered in its category
//! - [`ViewError`]: either of the above while building a curve view
//!
//! [`AppError`] is the binary-level error carrying a process exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a dataset file.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("data file not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read '{}': {message}", path.display())]
    DataParse { path: PathBuf, message: String },
}

/// Failure to fit one curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("curve '{title}' has too few points to fit ({points} < 2)")]
    InsufficientData { title: String, points: usize },

    #[error("spline construction failed for curve '{title}' (k={degree}, points={points}): {reason}")]
    FitConstructionFailed {
        title: String,
        degree: usize,
        points: usize,
        reason: String,
    },

    #[error("curve '{title}' not found")]
    UnknownCurve { title: String },
}

/// Failure to convert between units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("unit '{unit}' is not registered in category '{category}'")]
    InvalidUnit { category: String, unit: String },

    #[error("unknown conversion category '{category}'")]
    UnknownCategory { category: String },
}

/// Failure to build a displayable view of one curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let code = match err {
            FitError::InsufficientData { .. } => 3,
            FitError::FitConstructionFailed { .. } => 4,
            FitError::UnknownCurve { .. } => 2,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<UnitError> for AppError {
    fn from(err: UnitError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::Fit(e) => e.into(),
            ViewError::Unit(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_errors_map_to_distinct_exit_codes() {
        let insufficient: AppError = FitError::InsufficientData {
            title: "A".to_string(),
            points: 1,
        }
        .into();
        let numeric: AppError = FitError::FitConstructionFailed {
            title: "A".to_string(),
            degree: 3,
            points: 4,
            reason: "singular".to_string(),
        }
        .into();
        assert_eq!(insufficient.exit_code(), 3);
        assert_eq!(numeric.exit_code(), 4);
        assert!(numeric.to_string().contains("k=3, points=4"));
    }

    #[test]
    fn view_errors_keep_the_inner_exit_code() {
        let err: AppError = ViewError::from(UnitError::InvalidUnit {
            category: "length".to_string(),
            unit: "furlong".to_string(),
        })
        .into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("furlong"));
    }
}
