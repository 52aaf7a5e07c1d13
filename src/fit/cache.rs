//! Memoized fits keyed by `(repository version, title)`.

use std::collections::HashMap;

use crate::data::CurveRepository;
use crate::error::FitError;
use crate::fit::fitter::{FittedCurve, fit_curve};

/// Caller-owned fit memo. Failures are cached too, so a bad curve is only
/// diagnosed once per dataset.
#[derive(Debug, Default)]
pub struct FitCache {
    fits: HashMap<(u64, String), Result<FittedCurve, FitError>>,
}

impl FitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit `title` from `repo`, reusing an earlier result for the same dataset.
    pub fn get_or_fit(&mut self, repo: &CurveRepository, title: &str) -> Result<&FittedCurve, FitError> {
        let Some(curve) = repo.curve(title) else {
            return Err(FitError::UnknownCurve {
                title: title.to_string(),
            });
        };
        self.fits
            .entry((repo.version(), title.to_string()))
            .or_insert_with(|| fit_curve(curve))
            .as_ref()
            .map_err(FitError::clone)
    }

    /// Drop entries belonging to any dataset other than `version`.
    pub fn retain_version(&mut self, version: u64) {
        self.fits.retain(|(v, _), _| *v == version);
    }

    pub fn len(&self) -> usize {
        self.fits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Curve, Sample};

    fn curve(title: &str, points: &[(f64, f64)]) -> Curve {
        Curve {
            title: title.to_string(),
            samples: points.iter().map(|&(x, y)| Sample::new(x, y)).collect(),
            x_variable: "Diameter in".to_string(),
            y_variable: "critmass kg".to_string(),
            attributes: vec![],
        }
    }

    #[test]
    fn repeated_requests_hit_the_cache() {
        let repo = CurveRepository::new(
            vec![curve("A", &[(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)])],
            vec![],
        );
        let mut cache = FitCache::new();
        let first = cache.get_or_fit(&repo, "A").unwrap().clone();
        let second = cache.get_or_fit(&repo, "A").unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_cached_and_unknown_titles_are_not() {
        let repo = CurveRepository::new(vec![curve("one", &[(1.0, 1.0)])], vec![]);
        let mut cache = FitCache::new();

        let err = cache.get_or_fit(&repo, "one").unwrap_err();
        assert!(matches!(err, FitError::InsufficientData { points: 1, .. }));
        assert_eq!(cache.len(), 1);

        let err = cache.get_or_fit(&repo, "missing").unwrap_err();
        assert_eq!(
            err,
            FitError::UnknownCurve {
                title: "missing".to_string()
            }
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn a_changed_dataset_refits() {
        let old = CurveRepository::new(vec![curve("A", &[(0.0, 0.0), (1.0, 1.0)])], vec![]);
        let new = CurveRepository::new(vec![curve("A", &[(0.0, 0.0), (1.0, 3.0)])], vec![]);
        let mut cache = FitCache::new();

        let (_, y_old) = cache.get_or_fit(&old, "A").unwrap().eval(1.0);
        let (_, y_new) = cache.get_or_fit(&new, "A").unwrap().eval(1.0);
        assert!((y_old - 1.0).abs() < 1e-12);
        assert!((y_new - 3.0).abs() < 1e-12);
        assert_eq!(cache.len(), 2);

        cache.retain_version(new.version());
        assert_eq!(cache.len(), 1);
    }
}
