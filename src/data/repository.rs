//! In-memory curve repository.
//!
//! Owns every [`Curve`] of a loaded dataset. Curves keep the order their titles
//! first appeared in the input, and each curve keeps its samples in row order.
//!
//! Every repository carries a `version`: a fingerprint of its full contents.
//! Fit caches key on `(version, title)` so a reloaded or edited dataset never
//! serves a stale fit.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::domain::{COL_TITLE, Curve, FilterSet, Sample};

#[derive(Debug, Clone, Default)]
pub struct CurveRepository {
    version: u64,
    curves: Vec<Curve>,
    index: HashMap<String, usize>,
    /// Attribute column names in input order (sample columns excluded).
    attribute_columns: Vec<String>,
}

impl CurveRepository {
    /// An empty repository (e.g. after a failed load).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a repository from curves. Duplicate titles keep the first curve.
    pub fn new(curves: Vec<Curve>, attribute_columns: Vec<String>) -> Self {
        let mut kept = Vec::with_capacity(curves.len());
        let mut index = HashMap::with_capacity(curves.len());
        for curve in curves {
            if index.contains_key(&curve.title) {
                continue;
            }
            index.insert(curve.title.clone(), kept.len());
            kept.push(curve);
        }
        let version = fingerprint(&kept, &attribute_columns);
        Self {
            version,
            curves: kept,
            index,
            attribute_columns,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn attribute_columns(&self) -> &[String] {
        &self.attribute_columns
    }

    pub fn curve(&self, title: &str) -> Option<&Curve> {
        self.index.get(title).map(|&i| &self.curves[i])
    }

    /// Titles of curves matching every filter, in dataset order.
    pub fn filter(&self, filters: &FilterSet) -> Vec<&str> {
        self.curves
            .iter()
            .filter(|c| filters.matches(c))
            .map(|c| c.title.as_str())
            .collect()
    }

    /// Samples plus x/y variable names for `title`.
    pub fn samples_for(&self, title: &str) -> Option<(&[Sample], &str, &str)> {
        self.curve(title)
            .map(|c| (c.samples.as_slice(), c.x_variable.as_str(), c.y_variable.as_str()))
    }

    /// Attribute name/value pairs for `title`, excluding the sample columns.
    ///
    /// Missing cells are reported as `None`.
    pub fn metadata_for(&self, title: &str) -> Option<Vec<(String, Option<String>)>> {
        let curve = self.curve(title)?;
        let mut out = Vec::with_capacity(curve.attributes.len() + 1);
        out.push((COL_TITLE.to_string(), Some(curve.title.clone())));
        out.extend(curve.attributes.iter().cloned());
        Some(out)
    }

    /// Distinct non-missing values of `attribute` among curves matching the
    /// filters that precede it, in first-appearance order.
    ///
    /// This drives cascading filter menus: picking a geometry narrows the
    /// material options, and so on.
    pub fn distinct_values(&self, attribute: &str, filters: &FilterSet) -> Vec<String> {
        let scope = filters.preceding(attribute);
        let mut out: Vec<String> = Vec::new();
        for curve in self.curves.iter().filter(|c| scope.matches(c)) {
            if let Some(v) = curve.attribute(attribute) {
                if !out.iter().any(|seen| seen == v) {
                    out.push(v.to_string());
                }
            }
        }
        out
    }
}

fn fingerprint(curves: &[Curve], columns: &[String]) -> u64 {
    let mut hasher = DefaultHasher::new();
    columns.hash(&mut hasher);
    for c in curves {
        c.title.hash(&mut hasher);
        c.x_variable.hash(&mut hasher);
        c.y_variable.hash(&mut hasher);
        c.attributes.hash(&mut hasher);
        for s in &c.samples {
            s.x.to_bits().hash(&mut hasher);
            s.y.to_bits().hash(&mut hasher);
        }
    }
    hasher.finish()
}
