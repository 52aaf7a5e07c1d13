//! Shared domain types.
//!
//! A dataset is a set of named curves. Each curve is an ORDERED list of `(x, y)`
//! samples plus the semantic names of its two axes and a bag of categorical
//! attributes used only for filtering.
//!
//! Sample order is load-bearing: the fitter parameterizes each curve by sample
//! index (`t = 0, 1, …, n-1`), so the order samples were ingested in IS the
//! curve's shape. Nothing in this crate may sort samples by value.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Required input columns.
pub const COL_TITLE: &str = "title";
pub const COL_X_VALUE: &str = "X_Value";
pub const COL_Y_VALUE: &str = "Y_Value";
pub const COL_X_VARIABLE: &str = "X_Variable";
pub const COL_Y_VARIABLE: &str = "Y_Variable";

/// Filterable attributes, in the order filters narrow one another.
pub const FILTER_ATTRIBUTES: [&str; 10] = [
    "geometry",
    "fiss-element",
    "critmat",
    "fiss-form",
    "isomat",
    "modmat",
    "reflmat",
    "reflthick",
    COL_X_VARIABLE,
    COL_Y_VARIABLE,
];

/// Filter value meaning "no constraint".
pub const FILTER_ALL: &str = "All";

/// Default data file, resolved against the working directory.
pub const DEFAULT_DATA_FILE: &str = "critview_data.csv";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One named curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub title: String,
    /// Samples in ingestion order. Never sort.
    pub samples: Vec<Sample>,
    pub x_variable: String,
    pub y_variable: String,
    /// Categorical attributes from the curve's first row, in column order.
    /// `None` marks a missing cell.
    pub attributes: Vec<(String, Option<String>)>,
}

impl Curve {
    /// Look up an attribute value, including the axis variable names.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            COL_TITLE => Some(self.title.as_str()),
            COL_X_VARIABLE => Some(self.x_variable.as_str()),
            COL_Y_VARIABLE => Some(self.y_variable.as_str()),
            _ => self
                .attributes
                .iter()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.as_deref()),
        }
    }

    pub fn xs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.y).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A single `attribute == value` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub attribute: String,
    pub value: String,
}

impl AttributeFilter {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Parse `attribute=value`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| format!("Invalid filter '{s}'. Expected ATTRIBUTE=VALUE."))?;
        let k = k.trim();
        if k.is_empty() {
            return Err(format!("Invalid filter '{s}': empty attribute name."));
        }
        Ok(Self::new(k, v.trim()))
    }

    /// `"All"` and empty values do not constrain anything.
    pub fn is_active(&self) -> bool {
        !(self.value.is_empty() || self.value == FILTER_ALL)
    }

    pub fn matches(&self, curve: &Curve) -> bool {
        !self.is_active() || curve.attribute(&self.attribute) == Some(self.value.as_str())
    }
}

/// Conjunction of attribute equalities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub filters: Vec<AttributeFilter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the constraint on `attribute`.
    pub fn set(&mut self, attribute: &str, value: &str) {
        if let Some(f) = self.filters.iter_mut().find(|f| f.attribute == attribute) {
            f.value = value.to_string();
        } else {
            self.filters.push(AttributeFilter::new(attribute, value));
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.attribute == attribute && f.is_active())
            .map(|f| f.value.as_str())
    }

    pub fn matches(&self, curve: &Curve) -> bool {
        self.filters.iter().all(|f| f.matches(curve))
    }

    /// Filters that come before `attribute` in [`FILTER_ATTRIBUTES`] order.
    ///
    /// Attributes outside that list see every known filter.
    pub fn preceding(&self, attribute: &str) -> FilterSet {
        let Some(pos) = FILTER_ATTRIBUTES.iter().position(|a| *a == attribute) else {
            return self.clone();
        };
        let before = &FILTER_ATTRIBUTES[..pos];
        FilterSet {
            filters: self
                .filters
                .iter()
                .filter(|f| before.contains(&f.attribute.as_str()))
                .cloned()
                .collect(),
        }
    }
}

/// Resolved session settings.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub data_path: PathBuf,
    pub resample_count: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}
