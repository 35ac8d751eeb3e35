//! # Results and Display Units
//!
//! A calculation produces a [`ResultMap`]: an ordered mapping from a
//! human-readable label to a number (in the SI unit named by the label) or a
//! categorical string. Numeric results can be shown in another unit through
//! the result tables below, which are separate from the input tables because
//! result base units differ (head loss is metres of water column, not a
//! generic length).
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::results::{format_result_value, labels};
//!
//! // 100 m of water column expressed in kPa
//! assert_eq!(format_result_value(labels::HEAD_LOSS, 100.0, Some("kPa")), "980,665");
//!
//! // No target unit: formatted as-is
//! assert_eq!(format_result_value(labels::HEAD_LOSS, 0.0000007582, None), "0,000000758");
//! ```

use serde::{Deserialize, Serialize};

use crate::format::{format_number_with, NumberLocale};
use crate::ordered_map::OrderedMap;
use crate::units::{convert_with_table, ConversionFactor, UnitOption};

/// Result labels produced by the calculations.
pub mod labels {
    pub const HEAD_LOSS: &str = "Perda de Carga (m)";
    pub const FLOW_RATE: &str = "Vazão (m³/s)";
    pub const PRESSURE_LOSS: &str = "Perda de Pressão (Pa)";
    pub const FRICTION_FACTOR: &str = "Fator de Atrito (f)";
    pub const SHAFT_POWER_W: &str = "Potência de Eixo (W)";
    pub const SHAFT_POWER_KW: &str = "Potência de Eixo (kW)";
    pub const VELOCITY: &str = "Velocidade (m/s)";
    pub const REYNOLDS_NUMBER: &str = "Número de Reynolds";
    pub const FLOW_REGIME: &str = "Regime de Fluxo";
    /// Key of the single entry returned for an unknown calculation
    pub const NOT_IMPLEMENTED_KEY: &str = "resultado";
    pub const NOT_IMPLEMENTED: &str = "Cálculo não implementado";
}

// ============================================================================
// Result Values
// ============================================================================

/// A single result: numeric (SI) or categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Text(String),
}

impl ResultValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResultValue::Number(v) => Some(*v),
            ResultValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResultValue::Number(_) => None,
            ResultValue::Text(s) => Some(s),
        }
    }
}

impl From<f64> for ResultValue {
    fn from(value: f64) -> Self {
        ResultValue::Number(value)
    }
}

impl From<String> for ResultValue {
    fn from(value: String) -> Self {
        ResultValue::Text(value)
    }
}

impl From<&str> for ResultValue {
    fn from(value: &str) -> Self {
        ResultValue::Text(value.to_string())
    }
}

/// Ordered label → value mapping.
///
/// Serializes as a JSON object whose key order is the insertion order.
pub type ResultMap = OrderedMap<ResultValue>;

impl OrderedMap<ResultValue> {
    /// Numeric value under `label`, if present and numeric.
    pub fn number(&self, label: &str) -> Option<f64> {
        self.get(label).and_then(ResultValue::as_number)
    }

    /// Text value under `label`, if present and categorical.
    pub fn text(&self, label: &str) -> Option<&str> {
        self.get(label).and_then(ResultValue::as_text)
    }

    /// Replace every `NaN` or infinite number with `0`.
    ///
    /// JSON has no representation for them, so a map holding one would not
    /// survive a save and reload.
    pub fn zero_non_finite(mut self) -> Self {
        for value in self.values_mut() {
            if let ResultValue::Number(v) = value {
                if !v.is_finite() {
                    *v = 0.0;
                }
            }
        }
        self
    }
}

// ============================================================================
// Result Unit Tables
// ============================================================================

/// Display units available for one numeric result label.
#[derive(Debug, Clone, Copy)]
pub struct ResultUnitTable {
    pub label: &'static str,
    /// Unit the formula produces
    pub base_unit: &'static str,
    /// Rules from `base_unit` to each display unit
    pub factors: &'static [ConversionFactor],
    /// Selectable units, base first
    pub options: &'static [UnitOption],
}

const fn opt(label: &'static str, value: &'static str) -> UnitOption {
    UnitOption::new(label, value)
}

const RESULT_TABLES: &[ResultUnitTable] = &[
    ResultUnitTable {
        label: labels::HEAD_LOSS,
        base_unit: "mH2O",
        factors: &[
            ConversionFactor::linear("mH2O", "psi", 1.42233),
            ConversionFactor::linear("mH2O", "kPa", 9.80665),
            ConversionFactor::linear("mH2O", "bar", 0.0980665),
            ConversionFactor::linear("mH2O", "ftH2O", 3.28084),
        ],
        options: &[
            opt("m", "mH2O"),
            opt("psi", "psi"),
            opt("kPa", "kPa"),
            opt("bar", "bar"),
            opt("ft", "ftH2O"),
        ],
    },
    ResultUnitTable {
        label: labels::SHAFT_POWER_W,
        base_unit: "W",
        factors: &[
            ConversionFactor::linear("W", "kW", 0.001),
            ConversionFactor::linear("W", "hp (mecânico)", 1.0 / 745.7),
        ],
        options: &[opt("W", "W"), opt("kW", "kW"), opt("hp (mec)", "hp (mecânico)")],
    },
    ResultUnitTable {
        label: labels::SHAFT_POWER_KW,
        base_unit: "kW",
        factors: &[
            ConversionFactor::linear("kW", "W", 1000.0),
            ConversionFactor::linear("kW", "hp (mecânico)", 1000.0 / 745.7),
        ],
        options: &[opt("kW", "kW"), opt("W", "W"), opt("hp (mec)", "hp (mecânico)")],
    },
    ResultUnitTable {
        label: labels::FLOW_RATE,
        base_unit: "m3/s",
        factors: &[
            ConversionFactor::linear("m3/s", "L/s", 1000.0),
            ConversionFactor::linear("m3/s", "GPM_US", 15850.32),
            ConversionFactor::linear("m3/s", "m3/h", 3600.0),
        ],
        options: crate::units::FLOW_RATE_UNITS,
    },
    ResultUnitTable {
        label: labels::VELOCITY,
        base_unit: "m/s",
        factors: &[
            ConversionFactor::linear("m/s", "km/h", 3.6),
            ConversionFactor::linear("m/s", "ft/s", 3.28084),
        ],
        options: crate::units::VELOCITY_UNITS,
    },
    ResultUnitTable {
        label: labels::PRESSURE_LOSS,
        base_unit: "Pa",
        factors: &[
            ConversionFactor::linear("Pa", "kPa", 0.001),
            ConversionFactor::linear("Pa", "bar", 1e-5),
            ConversionFactor::linear("Pa", "psi", 1.0 / 6894.76),
            ConversionFactor::linear("Pa", "mH2O", 1.0 / 9806.65),
        ],
        options: &[
            opt("Pa", "Pa"),
            opt("kPa", "kPa"),
            opt("bar", "bar"),
            opt("psi", "psi"),
            opt("mH2O", "mH2O"),
        ],
    },
];

/// Display-unit table registered for `label`, if any.
pub fn result_unit_table(label: &str) -> Option<&'static ResultUnitTable> {
    RESULT_TABLES.iter().find(|t| t.label == label)
}

/// Selectable display units for `label`. Empty for categorical results.
pub fn result_unit_options(label: &str) -> &'static [UnitOption] {
    result_unit_table(label).map(|t| t.options).unwrap_or(&[])
}

// ============================================================================
// Formatting
// ============================================================================

/// Convert a numeric result from its base unit to `target_unit`.
///
/// Returns `base_value` unchanged when no target is given, when the label has
/// no table, or when the table has no rule for the target.
pub fn convert_result_value(label: &str, base_value: f64, target_unit: Option<&str>) -> f64 {
    match (target_unit, result_unit_table(label)) {
        (Some(target), Some(table)) => {
            convert_with_table(base_value, table.base_unit, target, table.factors, table.label)
        }
        _ => base_value,
    }
}

/// Convert to `target_unit` and render with the default locale.
pub fn format_result_value(label: &str, base_value: f64, target_unit: Option<&str>) -> String {
    format_result_value_with(label, base_value, target_unit, &NumberLocale::default())
}

/// Convert to `target_unit` and render with `locale`.
pub fn format_result_value_with(
    label: &str,
    base_value: f64,
    target_unit: Option<&str>,
    locale: &NumberLocale,
) -> String {
    format_number_with(convert_result_value(label, base_value, target_unit), locale)
}

/// Render any result value; categorical values pass through untouched.
pub fn display_result(
    label: &str,
    value: &ResultValue,
    target_unit: Option<&str>,
    locale: &NumberLocale,
) -> String {
    match value {
        ResultValue::Number(v) => format_result_value_with(label, *v, target_unit, locale),
        ResultValue::Text(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_result_map_keeps_insertion_order() {
        let map = ResultMap::new()
            .with(labels::SHAFT_POWER_W, 2943.0)
            .with(labels::SHAFT_POWER_KW, 2.943)
            .with(labels::FLOW_REGIME, "Laminar (Re < 2300)");

        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, [labels::SHAFT_POWER_W, labels::SHAFT_POWER_KW, labels::FLOW_REGIME]);
        assert_eq!(map.number(labels::SHAFT_POWER_KW), Some(2.943));
        assert_eq!(map.text(labels::FLOW_REGIME), Some("Laminar (Re < 2300)"));
        assert_eq!(map.number(labels::FLOW_REGIME), None);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = ResultMap::new().with("a", 1.0).with("b", 2.0);
        map.insert("a", 3.0);
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next(), Some(("a", &ResultValue::Number(3.0))));
    }

    #[test]
    fn test_result_map_json() {
        let map = ResultMap::new()
            .with(labels::REYNOLDS_NUMBER, 50000.0)
            .with(labels::FLOW_REGIME, "Turbulento (Re > 4000)");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"{"Número de Reynolds":50000.0,"Regime de Fluxo":"Turbulento (Re > 4000)"}"#
        );
        let roundtrip: ResultMap = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, map);
    }

    #[test]
    fn test_non_finite_numbers_become_zero() {
        let map = ResultMap::new()
            .with(labels::FLOW_RATE, f64::INFINITY)
            .with(labels::VELOCITY, f64::NAN)
            .with(labels::FRICTION_FACTOR, "0.02 (assumido)")
            .zero_non_finite();
        assert_eq!(map.number(labels::FLOW_RATE), Some(0.0));
        assert_eq!(map.number(labels::VELOCITY), Some(0.0));
        assert_eq!(map.text(labels::FRICTION_FACTOR), Some("0.02 (assumido)"));

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(serde_json::from_str::<ResultMap>(&json).unwrap(), map);
    }

    #[test]
    fn test_head_loss_display_units() {
        let h = 0.992;
        assert_relative_eq!(convert_result_value(labels::HEAD_LOSS, h, Some("mH2O")), h);
        assert_relative_eq!(
            convert_result_value(labels::HEAD_LOSS, h, Some("kPa")),
            h * 9.80665,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            convert_result_value(labels::HEAD_LOSS, h, Some("ftH2O")),
            h * 3.28084,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_power_and_pressure_display_units() {
        assert_eq!(format_result_value(labels::SHAFT_POWER_W, 2943.0, Some("kW")), "2,943");
        assert_eq!(format_result_value(labels::SHAFT_POWER_KW, 1.0, Some("W")), "1.000,000");
        assert_eq!(format_result_value(labels::PRESSURE_LOSS, 150_000.0, Some("bar")), "1,500");
        assert_eq!(format_result_value(labels::FLOW_RATE, 0.01, Some("L/s")), "10,000");
    }

    #[test]
    fn test_unconvertible_targets_fall_back_to_base() {
        // Unknown target unit
        assert_eq!(format_result_value(labels::VELOCITY, 2.5, Some("mph")), "2,500");
        // Label without a table
        assert_eq!(format_result_value(labels::REYNOLDS_NUMBER, 50000.0, Some("kPa")), "50.000,000");
        // No target
        assert_eq!(format_result_value(labels::VELOCITY, 2.5, None), "2,500");
    }

    #[test]
    fn test_categorical_passthrough() {
        let value = ResultValue::from("0.02 (assumido)");
        let shown = display_result(labels::FRICTION_FACTOR, &value, Some("kPa"), &NumberLocale::PT_BR);
        assert_eq!(shown, "0.02 (assumido)");
        assert!(result_unit_options(labels::FLOW_REGIME).is_empty());
    }

    #[test]
    fn test_options_start_with_base_unit() {
        for table in RESULT_TABLES {
            assert_eq!(table.options[0].value, table.base_unit, "{}", table.label);
            for option in table.options.iter().skip(1) {
                assert!(
                    table.factors.iter().any(|f| f.to == option.value),
                    "{} has no rule for {}",
                    table.label,
                    option.value
                );
            }
        }
    }
}
