//! Static unit tables.
//!
//! Each conversion category lists its units with a factor expressing how many
//! category base units equal one of that unit. The base unit (factor `1.0`) is
//! always listed first.
//!
//! Dataset columns name their variable semantically (e.g. `"Diameter in"`); the
//! binding table maps those names to a category and the unit the raw values are
//! stored in. Names missing from the table are not an error: they resolve to
//! [`UnitInfo::Unknown`] and are displayed unconverted.

/// Category id reported for variables absent from the binding table.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// One unit within a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    /// Display name, e.g. `"inches (in)"`.
    pub name: &'static str,
    /// Short alias accepted on lookup, e.g. `"in"`.
    pub symbol: &'static str,
    /// Base units per one of this unit.
    pub factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Category {
    pub id: &'static str,
    pub units: &'static [Unit],
}

impl Category {
    /// The factor-1.0 unit (first listed).
    pub fn base_unit(&self) -> &'static str {
        self.units[0].name
    }

    /// Unit display names in table order.
    pub fn unit_names(&self) -> Vec<&'static str> {
        self.units.iter().map(|u| u.name).collect()
    }

    /// Find a unit by display name, falling back to its symbol.
    pub fn lookup(&self, unit: &str) -> Option<&'static Unit> {
        self.units
            .iter()
            .find(|u| u.name == unit)
            .or_else(|| self.units.iter().find(|u| u.symbol == unit))
    }

    /// Base units per one `unit`, if registered.
    pub fn conversion_value(&self, unit: &str) -> Option<f64> {
        self.lookup(unit).map(|u| u.factor)
    }
}

const fn unit(name: &'static str, symbol: &'static str, factor: f64) -> Unit {
    Unit {
        name,
        symbol,
        factor,
    }
}

pub static CATEGORIES: &[Category] = &[
    Category {
        id: "length",
        units: &[
            unit("centimeters (cm)", "cm", 1.0),
            unit("meters (m)", "m", 100.0),
            unit("inches (in)", "in", 2.54),
            unit("feet (ft)", "ft", 30.48),
        ],
    },
    Category {
        id: "concentration_vol",
        units: &[
            unit("g/cc", "g/cc", 1.0),
            unit("g/L", "g/L", 1000.0),
            unit("kg/m^3", "kg/m^3", 1000.0),
            unit("g/ft^3", "g/ft^3", 28316.8466),
        ],
    },
    Category {
        id: "mass",
        units: &[
            unit("grams (g)", "g", 1.0),
            unit("kilograms (kg)", "kg", 1000.0),
            unit("ounces (oz)", "oz", 28.3495),
            unit("pounds (lb)", "lb", 453.592),
        ],
    },
    Category {
        id: "volume",
        units: &[
            unit("cm^3 (cc)", "cc", 1.0),
            unit("liters (L)", "L", 1000.0),
            unit("in^3", "in^3", 16.3871),
            unit("ft^3", "ft^3", 28316.8466),
            unit("gallons (US)", "gal", 3785.41),
        ],
    },
    Category {
        id: "concentration_linear",
        units: &[
            unit("g/ft", "g/ft", 1.0),
            unit("g/cm", "g/cm", 30.48),
            unit("kg/m", "kg/m", 32.8084),
        ],
    },
    Category {
        id: "concentration_areal",
        units: &[
            unit("kg/ft^2", "kg/ft^2", 1.0),
            unit("g/cm^2", "g/cm^2", 10.7639),
        ],
    },
];

/// Maps a dataset variable name to its category and stored unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableBinding {
    pub variable: &'static str,
    pub category: &'static str,
    pub native_unit: &'static str,
}

const fn bind(variable: &'static str, category: &'static str, native_unit: &'static str) -> VariableBinding {
    VariableBinding {
        variable,
        category,
        native_unit,
    }
}

// Keys must match the `X_Variable` / `Y_Variable` strings exactly.
pub static BINDINGS: &[VariableBinding] = &[
    bind("Diameter in", "length", "inches (in)"),
    bind("Height in", "length", "inches (in)"),
    bind("Radius in", "length", "inches (in)"),
    bind("Thickness in", "length", "inches (in)"),
    bind("critconc g/cc", "concentration_vol", "g/cc"),
    bind("critconc g/L", "concentration_vol", "g/L"),
    bind("critconc_linear g/ft", "concentration_linear", "g/ft"),
    bind("critconc_areal kg/ft2", "concentration_areal", "kg/ft^2"),
    bind("critmass kg", "mass", "kilograms (kg)"),
    bind("volume L", "volume", "liters (L)"),
    bind("volume gal", "volume", "gallons (US)"),
];

pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

pub fn binding(variable: &str) -> Option<&'static VariableBinding> {
    BINDINGS.iter().find(|b| b.variable == variable)
}

/// Resolved unit options for one axis variable.
///
/// `Unknown` carries no category, so it cannot be handed to the converter.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitInfo {
    Known {
        category: &'static Category,
        /// Unit the raw values are stored in; the default selection.
        native_unit: &'static str,
        units: Vec<&'static str>,
    },
    Unknown {
        raw_name: String,
    },
}

impl UnitInfo {
    pub fn is_known(&self) -> bool {
        matches!(self, UnitInfo::Known { .. })
    }

    pub fn category_id(&self) -> &str {
        match self {
            UnitInfo::Known { category, .. } => category.id,
            UnitInfo::Unknown { .. } => UNKNOWN_CATEGORY,
        }
    }

    /// The unit values are stored in (the raw name for unknown variables).
    pub fn base_unit(&self) -> &str {
        match self {
            UnitInfo::Known { native_unit, .. } => native_unit,
            UnitInfo::Unknown { raw_name } => raw_name,
        }
    }

    /// Selectable unit names, in stable order.
    pub fn units(&self) -> Vec<&str> {
        match self {
            UnitInfo::Known { units, .. } => units.clone(),
            UnitInfo::Unknown { raw_name } => vec![raw_name.as_str()],
        }
    }

    /// Index of [`UnitInfo::base_unit`] within [`UnitInfo::units`].
    pub fn default_index(&self) -> usize {
        let base = self.base_unit();
        self.units().iter().position(|u| *u == base).unwrap_or(0)
    }
}

/// Look up the category and selectable units for a variable name.
pub fn units_for(variable: &str) -> UnitInfo {
    let known = binding(variable).and_then(|b| category(b.category).map(|c| (b, c)));
    match known {
        Some((b, c)) => UnitInfo::Known {
            category: c,
            native_unit: b.native_unit,
            units: c.unit_names(),
        },
        None => UnitInfo::Unknown {
            raw_name: variable.to_string(),
        },
    }
}

/// First whitespace-separated word of a variable name (`"Diameter in"` -> `"Diameter"`).
pub fn short_name(variable: &str) -> &str {
    variable.split_whitespace().next().unwrap_or(variable)
}

/// Axis caption such as `"Diameter (centimeters (cm))"`.
pub fn axis_label(variable: &str, unit: &str) -> String {
    format!("{} ({unit})", short_name(variable))
}

/// Check the static tables for internal consistency.
pub fn validate() -> Result<(), String> {
    for c in CATEGORIES {
        let Some(first) = c.units.first() else {
            return Err(format!("category '{}' has no units", c.id));
        };
        if first.factor != 1.0 {
            return Err(format!("category '{}' does not list its base unit first", c.id));
        }
        let n_base = c.units.iter().filter(|u| u.factor == 1.0).count();
        if n_base != 1 {
            return Err(format!("category '{}' has {n_base} factor-1.0 units", c.id));
        }
        if let Some(bad) = c.units.iter().find(|u| !(u.factor.is_finite() && u.factor > 0.0)) {
            return Err(format!("unit '{}' in '{}' has invalid factor {}", bad.name, c.id, bad.factor));
        }
    }
    for b in BINDINGS {
        let Some(c) = category(b.category) else {
            return Err(format!("variable '{}' names unknown category '{}'", b.variable, b.category));
        };
        if c.lookup(b.native_unit).is_none() {
            return Err(format!(
                "variable '{}' native unit '{}' is not in category '{}'",
                b.variable, b.native_unit, b.category
            ));
        }
    }
    Ok(())
}
