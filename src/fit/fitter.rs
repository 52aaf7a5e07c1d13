//! Parametric curve fitting.
//!
//! Given a curve's samples `(x_i, y_i)` in ingestion order, we assign each a
//! synthetic parameter `t_i = i` and fit two independent interpolating splines
//! `X(t)` and `Y(t)`. Parameterizing by index rather than by `x` lets a curve
//! double back on itself or run vertically.
//!
//! Degree is `k = min(3, n - 1)`: two points give a line, three a parabola,
//! four or more a cubic.

use tracing::{debug, warn};

use crate::domain::{Curve, Sample};
use crate::error::FitError;
use crate::fit::spline::InterpolatingSpline;

/// Number of points in a display resample unless the caller asks otherwise.
pub const DEFAULT_RESAMPLE_COUNT: usize = 200;

/// Highest spline degree used.
pub const MAX_DEGREE: usize = 3;

/// Spline degree used for `n` samples (`n >= 2`).
pub fn spline_degree(n: usize) -> usize {
    MAX_DEGREE.min(n.saturating_sub(1))
}

/// Two interpolants over the synthetic parameter `t ∈ [0, n-1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    pub title: String,
    pub n_points: usize,
    pub degree: usize,
    x: InterpolatingSpline,
    y: InterpolatingSpline,
}

impl FittedCurve {
    /// Valid parameter range `(0, n-1)`.
    pub fn domain(&self) -> (f64, f64) {
        (0.0, (self.n_points - 1) as f64)
    }

    pub fn eval(&self, t: f64) -> (f64, f64) {
        (self.x.eval(t), self.y.eval(t))
    }

    /// `count` evenly spaced parameter values spanning the domain inclusively.
    ///
    /// `count` below 2 is raised to 2.
    pub fn parameter_grid(&self, count: usize) -> Vec<f64> {
        let count = count.max(2);
        let (t0, t1) = self.domain();
        let step = (t1 - t0) / (count - 1) as f64;
        (0..count)
            .map(|i| if i == count - 1 { t1 } else { t0 + step * i as f64 })
            .collect()
    }

    /// Dense `(x, y)` samples of the fitted curve in increasing-`t` order.
    pub fn resample(&self, count: usize) -> Vec<(f64, f64)> {
        self.parameter_grid(count)
            .into_iter()
            .map(|t| self.eval(t))
            .collect()
    }
}

/// Fit a curve.
pub fn fit_curve(curve: &Curve) -> Result<FittedCurve, FitError> {
    fit_samples(&curve.title, &curve.samples)
}

/// Fit raw samples; `title` is used for diagnostics only.
pub fn fit_samples(title: &str, samples: &[Sample]) -> Result<FittedCurve, FitError> {
    let n = samples.len();
    if n < 2 {
        warn!(title, points = n, "too few points to fit; skipping curve");
        return Err(FitError::InsufficientData {
            title: title.to_string(),
            points: n,
        });
    }

    let degree = spline_degree(n);
    let params: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
    let ys: Vec<f64> = samples.iter().map(|s| s.y).collect();

    let series = [xs.as_slice(), ys.as_slice()];
    let mut splines = InterpolatingSpline::fit_many(&params, &series, degree).map_err(|reason| {
        warn!(title, degree, points = n, %reason, "spline construction failed");
        FitError::FitConstructionFailed {
            title: title.to_string(),
            degree,
            points: n,
            reason,
        }
    })?;

    let (Some(y), Some(x)) = (splines.pop(), splines.pop()) else {
        return Err(FitError::FitConstructionFailed {
            title: title.to_string(),
            degree,
            points: n,
            reason: "expected two interpolants".to_string(),
        });
    };

    debug!(title, degree, points = n, "fitted parametric spline");
    Ok(FittedCurve {
        title: title.to_string(),
        n_points: n,
        degree,
        x,
        y,
    })
}
