//! # Input Validation
//!
//! Checks a form before it reaches the engine. The engine itself accepts
//! anything and degrades to zero, so this is where a user gets told that a
//! field is empty, not a number, or out of range.
//!
//! Rules per field kind:
//!
//! | Kind          | Rule    |
//! |---------------|---------|
//! | `numeric`     | `> 0`   |
//! | `percentage`  | `> 0`   |
//! | `coefficient` | `>= 0`  |
//!
//! A value that overflows once converted to its base unit is rejected too.

use std::collections::HashMap;

use crate::calculations::{normalize_value, try_parse_input};
use crate::errors::{HydroError, HydroResult};
use crate::fields::{CalculationField, FieldKind};

/// Validate one raw value against its field.
pub fn validate_field(field: &CalculationField, raw: Option<&str>) -> HydroResult<f64> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(HydroError::missing_field(field.name)),
    };

    let value = try_parse_input(raw)
        .ok_or_else(|| HydroError::invalid_input(field.name, raw, "Not a valid number"))?;

    match field.kind {
        FieldKind::Numeric | FieldKind::Percentage if value <= 0.0 => Err(
            HydroError::invalid_input(field.name, raw, "Must be greater than zero"),
        ),
        FieldKind::Coefficient if value < 0.0 => Err(HydroError::invalid_input(
            field.name,
            raw,
            "Must not be negative",
        )),
        _ => Ok(value),
    }
}

/// [`validate_field`], then check the value stays finite in `selected_unit`
/// converted to the field's base unit.
pub fn validate_field_in_unit(
    field: &CalculationField,
    raw: Option<&str>,
    selected_unit: Option<&str>,
) -> HydroResult<f64> {
    let value = validate_field(field, raw)?;
    let raw = raw.unwrap_or_default();
    if normalize_value(field, raw, selected_unit).is_finite() {
        Ok(value)
    } else {
        Err(HydroError::invalid_input(field.name, raw.trim(), "Value out of range"))
    }
}

/// Validate every field in its default input unit, returning the first failure.
pub fn validate_inputs(
    fields: &[CalculationField],
    raw_inputs: &HashMap<String, String>,
) -> HydroResult<()> {
    validate_inputs_in_units(fields, raw_inputs, &HashMap::new())
}

/// Validate every field in the units the user selected, returning the first
/// failure.
pub fn validate_inputs_in_units(
    fields: &[CalculationField],
    raw_inputs: &HashMap<String, String>,
    selected_units: &HashMap<String, String>,
) -> HydroResult<()> {
    for field in fields {
        validate_field_in_unit(
            field,
            raw_inputs.get(field.name).map(String::as_str),
            selected_units.get(field.name).map(String::as_str),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::fields_for;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_form() {
        let inputs = raw(&[("flowRate", "10"), ("pipeDiameter", "50,5"), ("lossCoefficient", "0")]);
        assert!(validate_inputs(fields_for("head-loss"), &inputs).is_ok());
    }

    #[test]
    fn test_missing_and_empty() {
        let inputs = raw(&[("flowRate", "10"), ("pipeDiameter", "  ")]);
        let err = validate_inputs(fields_for("head-loss"), &inputs).unwrap_err();
        assert_eq!(err, HydroError::missing_field("pipeDiameter"));
    }

    #[test]
    fn test_not_a_number() {
        let inputs = raw(&[("flowRate", "dez")]);
        let err = validate_inputs(fields_for("flow-velocity"), &inputs).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_positivity_rules() {
        let fields = fields_for("pump-power");
        // Efficiency is a percentage: zero rejected
        assert!(validate_field(&fields[3], Some("0")).is_err());
        assert_eq!(validate_field(&fields[3], Some("75")), Ok(75.0));
        // Numeric: negative rejected
        assert!(validate_field(&fields[1], Some("-2")).is_err());

        let k = fields_for("head-loss")[2];
        assert_eq!(validate_field(&k, Some("0")), Ok(0.0));
        assert!(validate_field(&k, Some("-0.1")).is_err());
    }

    #[test]
    fn test_overflow_after_conversion() {
        let pressure = fields_for("pipe-flow")[0];
        assert!(validate_field(&pressure, Some("1e308")).is_ok());
        // Already in the base unit: fine
        assert!(validate_field_in_unit(&pressure, Some("1e308"), Some("Pa")).is_ok());
        let err = validate_field_in_unit(&pressure, Some("1e308"), Some("bar")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let inputs = raw(&[
            ("pressureDifference", "1e308"),
            ("pipeLength", "100"),
            ("pipeDiameter", "50"),
            ("fluidViscosity", "1"),
        ]);
        // Default unit is kPa
        assert!(validate_inputs(fields_for("pipe-flow"), &inputs).is_err());
        let units = raw(&[("pressureDifference", "Pa")]);
        assert!(validate_inputs_in_units(fields_for("pipe-flow"), &inputs, &units).is_ok());
    }
}
