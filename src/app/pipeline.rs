//! Shared "view pipeline" used by both CLI and TUI front-ends.
//!
//! One request runs: repository lookup -> (cached) fit -> axis unit resolution
//! -> conversion of raw and resampled points. The front-ends only decide how to
//! present the resulting [`CurveView`].

use serde::Serialize;

use crate::data::CurveRepository;
use crate::error::{FitError, ViewError};
use crate::fit::{DEFAULT_RESAMPLE_COUNT, FitCache};
use crate::units::{AxisScale, ConversionCache, units_for};

/// Memo state carried across requests within a session.
#[derive(Debug, Default)]
pub struct Caches {
    pub fits: FitCache,
    pub conversions: ConversionCache,
}

impl Caches {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What to draw: a curve and the display unit for each axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub title: String,
    /// `None` keeps the native unit.
    pub x_unit: Option<String>,
    pub y_unit: Option<String>,
    pub resample_count: usize,
}

impl ViewRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_unit: None,
            y_unit: None,
            resample_count: DEFAULT_RESAMPLE_COUNT,
        }
    }
}

/// A fitted curve expressed in display units.
#[derive(Debug, Clone, Serialize)]
pub struct CurveView {
    pub title: String,
    pub n_points: usize,
    pub degree: usize,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    /// Raw samples in ingestion order.
    pub raw: Vec<(f64, f64)>,
    /// Resampled fit in increasing-`t` order.
    pub fitted: Vec<(f64, f64)>,
    pub metadata: Vec<(String, Option<String>)>,
    /// User-facing remarks (e.g. an axis shown without conversion).
    pub notices: Vec<String>,
}

impl CurveView {
    pub fn x_label(&self) -> String {
        self.x_scale.label()
    }

    pub fn y_label(&self) -> String {
        self.y_scale.label()
    }
}

/// Build the display view for one curve.
pub fn render_view(
    repo: &CurveRepository,
    caches: &mut Caches,
    request: &ViewRequest,
) -> Result<CurveView, ViewError> {
    let title = request.title.as_str();
    let (samples, x_variable, y_variable) =
        repo.samples_for(title).ok_or_else(|| FitError::UnknownCurve {
            title: title.to_string(),
        })?;

    let fit = caches.fits.get_or_fit(repo, title)?;

    let mut notices = Vec::new();
    let x_info = units_for(x_variable);
    let y_info = units_for(y_variable);
    for (axis, info) in [("X", &x_info), ("Y", &y_info)] {
        if !info.is_known() {
            notices.push(format!(
                "Unknown {axis} variable '{}'; units cannot be converted.",
                info.base_unit()
            ));
        }
    }

    let x_scale = AxisScale::resolve(
        x_variable,
        &x_info,
        request.x_unit.as_deref(),
        &mut caches.conversions,
    )?;
    let y_scale = AxisScale::resolve(
        y_variable,
        &y_info,
        request.y_unit.as_deref(),
        &mut caches.conversions,
    )?;

    let raw = samples
        .iter()
        .map(|s| (s.x * x_scale.factor, s.y * y_scale.factor))
        .collect();
    let fitted = fit
        .resample(request.resample_count)
        .into_iter()
        .map(|(x, y)| (x * x_scale.factor, y * y_scale.factor))
        .collect();

    Ok(CurveView {
        title: title.to_string(),
        n_points: fit.n_points,
        degree: fit.degree,
        x_scale,
        y_scale,
        raw,
        fitted,
        metadata: repo.metadata_for(title).unwrap_or_default(),
        notices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Curve, Sample};
    use crate::error::UnitError;

    fn repo() -> CurveRepository {
        let curve = |title: &str, x_var: &str, y_var: &str, pts: &[(f64, f64)]| Curve {
            title: title.to_string(),
            samples: pts.iter().map(|&(x, y)| Sample::new(x, y)).collect(),
            x_variable: x_var.to_string(),
            y_variable: y_var.to_string(),
            attributes: vec![("geometry".to_string(), Some("sphere".to_string()))],
        };
        CurveRepository::new(
            vec![
                curve("A", "Diameter in", "critmass kg", &[(1.0, 10.0), (2.0, 20.0)]),
                curve("Q", "Mystery q", "critmass kg", &[(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)]),
                curve("S", "Diameter in", "critmass kg", &[(1.0, 1.0)]),
            ],
            vec!["title".to_string(), "geometry".to_string()],
        )
    }

    #[test]
    fn inches_are_shown_in_centimeters() {
        let repo = repo();
        let mut caches = Caches::new();
        let request = ViewRequest {
            x_unit: Some("centimeters (cm)".to_string()),
            resample_count: 3,
            ..ViewRequest::new("A")
        };
        let view = render_view(&repo, &mut caches, &request).unwrap();

        assert_eq!(view.degree, 1);
        assert_eq!(view.x_label(), "Diameter (centimeters (cm))");
        assert_eq!(view.y_label(), "critmass (kilograms (kg))");
        assert!((view.raw[0].0 - 2.54).abs() < 1e-12);
        assert!((view.raw[1].0 - 5.08).abs() < 1e-12);
        assert_eq!(view.raw[1].1, 20.0);
        assert_eq!(view.fitted.len(), 3);
        assert!((view.fitted[1].0 - 3.81).abs() < 1e-12);
        assert!((view.fitted[1].1 - 15.0).abs() < 1e-12);
        assert!(view.notices.is_empty());
        assert_eq!(view.metadata[0], ("title".to_string(), Some("A".to_string())));
    }

    #[test]
    fn unknown_variables_are_shown_unconverted() {
        let repo = repo();
        let mut caches = Caches::new();
        let view = render_view(&repo, &mut caches, &ViewRequest::new("Q")).unwrap();

        assert!(!view.x_scale.convertible);
        assert_eq!(view.x_scale.factor, 1.0);
        assert_eq!(view.raw, vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)]);
        assert_eq!(view.fitted.len(), DEFAULT_RESAMPLE_COUNT);
        assert_eq!(view.notices.len(), 1);
        assert!(view.notices[0].contains("Mystery q"));
    }

    #[test]
    fn failures_are_typed() {
        let repo = repo();
        let mut caches = Caches::new();

        let err = render_view(&repo, &mut caches, &ViewRequest::new("S")).unwrap_err();
        assert!(matches!(
            err,
            ViewError::Fit(FitError::InsufficientData { points: 1, .. })
        ));

        let err = render_view(&repo, &mut caches, &ViewRequest::new("nope")).unwrap_err();
        assert!(matches!(err, ViewError::Fit(FitError::UnknownCurve { .. })));

        let request = ViewRequest {
            y_unit: Some("furlongs".to_string()),
            ..ViewRequest::new("A")
        };
        let err = render_view(&repo, &mut caches, &request).unwrap_err();
        assert!(matches!(err, ViewError::Unit(UnitError::InvalidUnit { .. })));
    }

    #[test]
    fn repeated_views_reuse_cached_work() {
        let repo = repo();
        let mut caches = Caches::new();
        let request = ViewRequest {
            x_unit: Some("cm".to_string()),
            ..ViewRequest::new("A")
        };
        render_view(&repo, &mut caches, &request).unwrap();
        render_view(&repo, &mut caches, &request).unwrap();
        assert_eq!(caches.fits.len(), 1);
        // X (in -> cm) and Y (kg -> kg).
        assert_eq!(caches.conversions.len(), 2);
    }
}
