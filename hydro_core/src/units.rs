//! # Unit Registry
//!
//! Static conversion tables between named units, grouped by physical
//! category, and the conversion function that walks them.
//!
//! ## Conversion Rules
//!
//! Each table stores [`ConversionFactor`] entries meaning
//! `to_value = from_value * factor + offset`. A pair is stored in one
//! direction only; [`convert_unit`] tries the direct entry, then the inverse
//! `(value - offset) / factor`, and finally passes the value through
//! unchanged. The passthrough keeps histories recorded with unknown unit
//! codes readable, but it means a typo in a unit code silently skips the
//! conversion, so every passthrough is logged at `warn` level.
//!
//! ## Base Units (SI)
//!
//! | Category             | Base unit |
//! |----------------------|-----------|
//! | flow rate            | `m3/s`    |
//! | diameter, length     | `m`       |
//! | pressure             | `Pa`      |
//! | velocity             | `m/s`     |
//! | kinematic viscosity  | `m2/s`    |
//! | dynamic viscosity    | `Pa·s`    |
//! | area                 | `m2`      |
//! | density              | `kg/m3`   |
//! | power                | `W`       |
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::units::{convert_unit, UnitCategory};
//!
//! let d_m = convert_unit(50.0, "mm", "m", UnitCategory::Diameter);
//! assert!((d_m - 0.05).abs() < 1e-12);
//!
//! // Identity never touches the table
//! assert_eq!(convert_unit(1.5, "bar", "bar", UnitCategory::Pressure), 1.5);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A selectable unit: display label plus the canonical code used in tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitOption {
    pub label: &'static str,
    pub value: &'static str,
}

impl UnitOption {
    pub(crate) const fn new(label: &'static str, value: &'static str) -> Self {
        UnitOption { label, value }
    }
}

/// One directed conversion rule: `to = from * factor + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionFactor {
    pub from: &'static str,
    pub to: &'static str,
    pub factor: f64,
    pub offset: f64,
}

impl ConversionFactor {
    /// Purely multiplicative rule (offset 0).
    pub const fn linear(from: &'static str, to: &'static str, factor: f64) -> Self {
        ConversionFactor {
            from,
            to,
            factor,
            offset: 0.0,
        }
    }

    fn apply(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    fn invert(&self, value: f64) -> f64 {
        (value - self.offset) / self.factor
    }
}

// ============================================================================
// Unit Options
// ============================================================================

pub const FLOW_RATE_UNITS: &[UnitOption] = &[
    UnitOption::new("m³/s", "m3/s"),
    UnitOption::new("L/s", "L/s"),
    UnitOption::new("GPM (US)", "GPM_US"),
    UnitOption::new("m³/h", "m3/h"),
];

pub const DIAMETER_UNITS: &[UnitOption] = &[
    UnitOption::new("m", "m"),
    UnitOption::new("cm", "cm"),
    UnitOption::new("mm", "mm"),
    UnitOption::new("in", "in"),
];

pub const LENGTH_UNITS: &[UnitOption] = &[
    UnitOption::new("m", "m"),
    UnitOption::new("km", "km"),
    UnitOption::new("ft", "ft"),
];

pub const PRESSURE_UNITS: &[UnitOption] = &[
    UnitOption::new("Pa", "Pa"),
    UnitOption::new("kPa", "kPa"),
    UnitOption::new("bar", "bar"),
    UnitOption::new("psi", "psi"),
];

pub const VELOCITY_UNITS: &[UnitOption] = &[
    UnitOption::new("m/s", "m/s"),
    UnitOption::new("km/h", "km/h"),
    UnitOption::new("ft/s", "ft/s"),
];

pub const KINEMATIC_VISCOSITY_UNITS: &[UnitOption] = &[
    UnitOption::new("m²/s", "m2/s"),
    UnitOption::new("cSt (centiStokes)", "cSt"),
];

pub const DYNAMIC_VISCOSITY_UNITS: &[UnitOption] = &[
    UnitOption::new("Pa·s", "Pa·s"),
    UnitOption::new("cP (centiPoise)", "cP"),
];

pub const AREA_UNITS: &[UnitOption] = &[
    UnitOption::new("m²", "m2"),
    UnitOption::new("cm²", "cm2"),
    UnitOption::new("mm²", "mm2"),
];

pub const DENSITY_UNITS: &[UnitOption] = &[
    UnitOption::new("kg/m³", "kg/m3"),
    UnitOption::new("g/cm³", "g/cm3"),
];

pub const POWER_UNITS: &[UnitOption] = &[
    UnitOption::new("W", "W"),
    UnitOption::new("kW", "kW"),
    UnitOption::new("hp (mec)", "hp (mecânico)"),
];

// ============================================================================
// Conversion Tables
// ============================================================================
//
// One direction per pair. Storing both directions with independently rounded
// factors would break round-trips.

const FLOW_RATE_FACTORS: &[ConversionFactor] = &[
    ConversionFactor::linear("L/s", "m3/s", 0.001),
    ConversionFactor::linear("GPM_US", "m3/s", 0.0000630902),
    ConversionFactor::linear("m3/h", "m3/s", 1.0 / 3600.0),
    ConversionFactor::linear("L/s", "m3/h", 3.6),
    ConversionFactor::linear("GPM_US", "L/s", 0.0630902),
];

const DIAMETER_FACTORS: &[ConversionFactor] = &[
    ConversionFactor::linear("cm", "m", 0.01),
    ConversionFactor::linear("mm", "m", 0.001),
    ConversionFactor::linear("in", "m", 0.0254),
    ConversionFactor::linear("in", "mm", 25.4),
    ConversionFactor::linear("cm", "mm", 10.0),
];

const LENGTH_FACTORS: &[ConversionFactor] = &[
    ConversionFactor::linear("km", "m", 1000.0),
    ConversionFactor::linear("ft", "m", 0.3048),
];

const PRESSURE_FACTORS: &[ConversionFactor] = &[
    ConversionFactor::linear("kPa", "Pa", 1000.0),
    ConversionFactor::linear("bar", "Pa", 100_000.0),
    ConversionFactor::linear("psi", "Pa", 6894.76),
    ConversionFactor::linear("bar", "kPa", 100.0),
    ConversionFactor::linear("psi", "kPa", 6.89476),
    ConversionFactor::linear("bar", "psi", 14.5038),
];

const VELOCITY_FACTORS: &[ConversionFactor] = &[
    ConversionFactor::linear("km/h", "m/s", 1.0 / 3.6),
    ConversionFactor::linear("ft/s", "m/s", 0.3048),
];

const KINEMATIC_VISCOSITY_FACTORS: &[ConversionFactor] =
    &[ConversionFactor::linear("cSt", "m2/s", 1e-6)];

const DYNAMIC_VISCOSITY_FACTORS: &[ConversionFactor] =
    &[ConversionFactor::linear("cP", "Pa·s", 0.001)];

const AREA_FACTORS: &[ConversionFactor] = &[
    ConversionFactor::linear("cm2", "m2", 1e-4),
    ConversionFactor::linear("mm2", "m2", 1e-6),
    ConversionFactor::linear("mm2", "cm2", 0.01),
];

const DENSITY_FACTORS: &[ConversionFactor] =
    &[ConversionFactor::linear("g/cm3", "kg/m3", 1000.0)];

const POWER_FACTORS: &[ConversionFactor] = &[
    ConversionFactor::linear("kW", "W", 1000.0),
    ConversionFactor::linear("hp (mecânico)", "W", 745.7),
    ConversionFactor::linear("hp (mecânico)", "kW", 0.7457),
];

// ============================================================================
// Categories
// ============================================================================

/// Physical-unit category of a field or table.
///
/// Fields carry their category explicitly; nothing is inferred from names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitCategory {
    FlowRate,
    Diameter,
    Length,
    Pressure,
    Velocity,
    KinematicViscosity,
    DynamicViscosity,
    Area,
    Density,
    Power,
}

impl UnitCategory {
    pub const ALL: [UnitCategory; 10] = [
        UnitCategory::FlowRate,
        UnitCategory::Diameter,
        UnitCategory::Length,
        UnitCategory::Pressure,
        UnitCategory::Velocity,
        UnitCategory::KinematicViscosity,
        UnitCategory::DynamicViscosity,
        UnitCategory::Area,
        UnitCategory::Density,
        UnitCategory::Power,
    ];

    /// Stable key used on the wire and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            UnitCategory::FlowRate => "flowRate",
            UnitCategory::Diameter => "diameter",
            UnitCategory::Length => "length",
            UnitCategory::Pressure => "pressure",
            UnitCategory::Velocity => "velocity",
            UnitCategory::KinematicViscosity => "kinematicViscosity",
            UnitCategory::DynamicViscosity => "dynamicViscosity",
            UnitCategory::Area => "area",
            UnitCategory::Density => "density",
            UnitCategory::Power => "power",
        }
    }

    /// Look up a category by its key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// SI unit every value of this category is normalized to.
    pub fn base_unit(self) -> &'static str {
        match self {
            UnitCategory::FlowRate => "m3/s",
            UnitCategory::Diameter | UnitCategory::Length => "m",
            UnitCategory::Pressure => "Pa",
            UnitCategory::Velocity => "m/s",
            UnitCategory::KinematicViscosity => "m2/s",
            UnitCategory::DynamicViscosity => "Pa·s",
            UnitCategory::Area => "m2",
            UnitCategory::Density => "kg/m3",
            UnitCategory::Power => "W",
        }
    }

    /// Units a user may pick for this category.
    pub fn options(self) -> &'static [UnitOption] {
        match self {
            UnitCategory::FlowRate => FLOW_RATE_UNITS,
            UnitCategory::Diameter => DIAMETER_UNITS,
            UnitCategory::Length => LENGTH_UNITS,
            UnitCategory::Pressure => PRESSURE_UNITS,
            UnitCategory::Velocity => VELOCITY_UNITS,
            UnitCategory::KinematicViscosity => KINEMATIC_VISCOSITY_UNITS,
            UnitCategory::DynamicViscosity => DYNAMIC_VISCOSITY_UNITS,
            UnitCategory::Area => AREA_UNITS,
            UnitCategory::Density => DENSITY_UNITS,
            UnitCategory::Power => POWER_UNITS,
        }
    }

    /// Conversion table for this category.
    pub fn factors(self) -> &'static [ConversionFactor] {
        match self {
            UnitCategory::FlowRate => FLOW_RATE_FACTORS,
            UnitCategory::Diameter => DIAMETER_FACTORS,
            UnitCategory::Length => LENGTH_FACTORS,
            UnitCategory::Pressure => PRESSURE_FACTORS,
            UnitCategory::Velocity => VELOCITY_FACTORS,
            UnitCategory::KinematicViscosity => KINEMATIC_VISCOSITY_FACTORS,
            UnitCategory::DynamicViscosity => DYNAMIC_VISCOSITY_FACTORS,
            UnitCategory::Area => AREA_FACTORS,
            UnitCategory::Density => DENSITY_FACTORS,
            UnitCategory::Power => POWER_FACTORS,
        }
    }

    /// Whether `unit` is one of this category's selectable codes.
    pub fn has_unit(self, unit: &str) -> bool {
        self.options().iter().any(|o| o.value == unit)
    }
}

impl std::fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert `value` from `from_unit` to `to_unit` within `category`.
///
/// Never fails: a pair missing from the table in both directions returns
/// `value` unchanged.
pub fn convert_unit(value: f64, from_unit: &str, to_unit: &str, category: UnitCategory) -> f64 {
    convert_with_table(value, from_unit, to_unit, category.factors(), category.key())
}

/// Same as [`convert_unit`], with the category given by key.
///
/// An unknown category key is absorbed like an unknown unit pair.
pub fn convert_unit_by_key(value: f64, from_unit: &str, to_unit: &str, category: &str) -> f64 {
    match UnitCategory::from_key(category) {
        Some(category) => convert_unit(value, from_unit, to_unit, category),
        None => convert_with_table(value, from_unit, to_unit, &[], category),
    }
}

/// Shared lookup used by input normalization and result back-conversion.
///
/// `table_name` only labels the passthrough warning.
pub(crate) fn convert_with_table(
    value: f64,
    from_unit: &str,
    to_unit: &str,
    table: &[ConversionFactor],
    table_name: &str,
) -> f64 {
    if from_unit == to_unit {
        return value;
    }

    if let Some(rule) = table.iter().find(|c| c.from == from_unit && c.to == to_unit) {
        return rule.apply(value);
    }

    if let Some(rule) = table.iter().find(|c| c.from == to_unit && c.to == from_unit) {
        return rule.invert(value);
    }

    warn!(
        table = table_name,
        from = from_unit,
        to = to_unit,
        "no conversion rule, value passed through unchanged"
    );
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_conversion() {
        for category in UnitCategory::ALL {
            for option in category.options() {
                let x = 123.456_789;
                assert_eq!(convert_unit(x, option.value, option.value, category), x);
            }
        }
    }

    #[test]
    fn test_round_trip_every_pair() {
        for category in UnitCategory::ALL {
            for rule in category.factors() {
                for x in [0.001, 1.0, 42.5, 1.0e6] {
                    let there = convert_unit(x, rule.from, rule.to, category);
                    let back = convert_unit(there, rule.to, rule.from, category);
                    assert_relative_eq!(back, x, max_relative = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_direct_and_inverse_lookup() {
        let p = UnitCategory::Pressure;
        assert_relative_eq!(convert_unit(10.0, "kPa", "Pa", p), 10_000.0, max_relative = 1e-12);
        // Only kPa -> Pa is stored; the reverse is derived
        assert_relative_eq!(convert_unit(10_000.0, "Pa", "kPa", p), 10.0, max_relative = 1e-12);
        assert_relative_eq!(
            convert_unit(1.0, "in", "mm", UnitCategory::Diameter),
            25.4,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            convert_unit(1.0, "cP", "Pa·s", UnitCategory::DynamicViscosity),
            0.001,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            convert_unit(36.0, "m3/h", "m3/s", UnitCategory::FlowRate),
            0.01,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_offset_rule() {
        let table = [ConversionFactor {
            from: "C",
            to: "F",
            factor: 1.8,
            offset: 32.0,
        }];
        let f = convert_with_table(100.0, "C", "F", &table, "temperature");
        assert_relative_eq!(f, 212.0, max_relative = 1e-12);
        let c = convert_with_table(212.0, "F", "C", &table, "temperature");
        assert_relative_eq!(c, 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_unknown_units_pass_through() {
        let x = 7.25;
        assert_eq!(convert_unit(x, "unknown1", "unknown2", UnitCategory::Length), x);
        // Units that exist, but in another category
        assert_eq!(convert_unit(x, "kPa", "Pa", UnitCategory::Length), x);
        assert_eq!(convert_unit_by_key(x, "m", "ft", "no-such-category"), x);
    }

    #[test]
    fn test_category_keys() {
        for category in UnitCategory::ALL {
            assert_eq!(UnitCategory::from_key(category.key()), Some(category));
            assert!(category.has_unit(category.base_unit()));
        }
        assert_eq!(UnitCategory::from_key("temperature"), None);
        let json = serde_json::to_string(&UnitCategory::KinematicViscosity).unwrap();
        assert_eq!(json, "\"kinematicViscosity\"");
    }

    #[test]
    fn test_every_option_reaches_base() {
        // Every selectable unit must convert to base through a stored rule
        for category in UnitCategory::ALL {
            let base = category.base_unit();
            for option in category.options().iter().filter(|o| o.value != base) {
                let stored = category.factors().iter().any(|c| {
                    (c.from == option.value && c.to == base) || (c.from == base && c.to == option.value)
                });
                assert!(stored, "{} has no rule to {}", option.value, base);
            }
        }
    }
}
