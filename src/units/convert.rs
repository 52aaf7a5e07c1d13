//! Unit conversion factors.
//!
//! `factor(category, from, to) = value(from) / value(to)` where `value(u)` is the
//! number of category base units in one `u`. Multiplying a quantity expressed in
//! `from` by the factor re-expresses it in `to`.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::UnitError;
use crate::units::registry::{self, UnitInfo};

/// Multiplicative factor converting values in `from` into `to`.
pub fn factor(category: &str, from: &str, to: &str) -> Result<f64, UnitError> {
    let cat = registry::category(category).ok_or_else(|| UnitError::UnknownCategory {
        category: category.to_string(),
    })?;
    let value = |unit: &str| {
        cat.conversion_value(unit).ok_or_else(|| UnitError::InvalidUnit {
            category: category.to_string(),
            unit: unit.to_string(),
        })
    };
    Ok(value(from)? / value(to)?)
}

/// Scale every value by `factor`, returning a new vector.
pub fn apply_factor(values: &[f64], factor: f64) -> Vec<f64> {
    values.iter().map(|v| v * factor).collect()
}

/// Caller-owned memo of conversion factors keyed by `(category, from, to)`.
#[derive(Debug, Default, Clone)]
pub struct ConversionCache {
    factors: HashMap<(String, String, String), f64>,
}

impl ConversionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factor(&mut self, category: &str, from: &str, to: &str) -> Result<f64, UnitError> {
        let key = (category.to_string(), from.to_string(), to.to_string());
        if let Some(&f) = self.factors.get(&key) {
            return Ok(f);
        }
        let f = factor(category, from, to)?;
        self.factors.insert(key, f);
        Ok(f)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Display scaling chosen for one axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisScale {
    pub variable: String,
    /// Unit the displayed values are expressed in.
    pub unit: String,
    pub factor: f64,
    pub convertible: bool,
}

impl AxisScale {
    /// Resolve the factor for displaying `info`'s variable in `selected`.
    ///
    /// `None` selects the native unit. Unknown variables always get factor `1.0`
    /// and never reach the converter.
    pub fn resolve(
        variable: &str,
        info: &UnitInfo,
        selected: Option<&str>,
        cache: &mut ConversionCache,
    ) -> Result<Self, UnitError> {
        match info {
            UnitInfo::Unknown { raw_name } => {
                info!(variable = %raw_name, "unknown variable; displaying raw values without unit conversion");
                Ok(Self {
                    variable: variable.to_string(),
                    unit: raw_name.clone(),
                    factor: 1.0,
                    convertible: false,
                })
            }
            UnitInfo::Known {
                category,
                native_unit,
                ..
            } => {
                let target = selected.unwrap_or(*native_unit);
                let f = cache.factor(category.id, native_unit, target)?;
                // Report the canonical display name even if a symbol was passed in.
                let unit = category
                    .lookup(target)
                    .map(|u| u.name.to_string())
                    .unwrap_or_else(|| target.to_string());
                debug!(category = category.id, from = *native_unit, to = %unit, factor = f, "axis scale");
                Ok(Self {
                    variable: variable.to_string(),
                    unit,
                    factor: f,
                    convertible: true,
                })
            }
        }
    }

    pub fn label(&self) -> String {
        registry::axis_label(&self.variable, &self.unit)
    }

    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        apply_factor(values, self.factor)
    }
}
