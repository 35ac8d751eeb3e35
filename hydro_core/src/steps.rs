//! # Calculation Steps
//!
//! Step-by-step explanation of a computation: known values, intermediate
//! quantities and the final result. Steps are generated from the same
//! normalized inputs the formulas use, so they always agree with the
//! [`ResultMap`](crate::results::ResultMap).

use serde::{Deserialize, Serialize};

use crate::format::format_number;

/// One line of a worked calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationStep {
    /// 1-based position
    pub step: u32,
    pub description: String,
    /// Symbolic formula, e.g. `V = Q / A`
    pub formula: String,
    /// Formula with the numbers substituted
    pub calculation: String,
    pub result: String,
}

impl CalculationStep {
    pub fn new(
        step: u32,
        description: impl Into<String>,
        formula: impl Into<String>,
        calculation: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        CalculationStep {
            step,
            description: description.into(),
            formula: formula.into(),
            calculation: calculation.into(),
            result: result.into(),
        }
    }
}

/// `value unit`, formatted with the default locale.
pub(crate) fn quantity(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        format_number(value)
    } else {
        format!("{} {}", format_number(value), unit)
    }
}

/// Description shared by every calculation's first step.
pub(crate) const KNOWN_VALUES: &str = "Identificar os valores conhecidos";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity() {
        assert_eq!(quantity(0.05, "m"), "0,050 m");
        assert_eq!(quantity(0.75, ""), "0,750");
    }

    #[test]
    fn test_step_serialization() {
        let step = CalculationStep::new(2, "Calcular a área", "A = π·D²/4", "A = π·0,050²/4", "0,00196 m²");
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.starts_with("{\"step\":2,"));
        let roundtrip: CalculationStep = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, step);
    }
}
