//! # Flow Velocity
//!
//! Mean velocity through a cross-section of known area, `V = Q / A`.
//! A non-positive area yields `0`.

use crate::fields::CalculationField;
use crate::results::{labels, ResultMap};
use crate::steps::{quantity, CalculationStep, KNOWN_VALUES};
use crate::units::UnitCategory;

use super::{guarded_div, NormalizedInputs};

pub const FIELDS: &[CalculationField] = &[
    CalculationField::numeric("flowRate", "Vazão (Q)", UnitCategory::FlowRate, "m3/s", "L/s")
        .with_placeholder("Ex: 20"),
    CalculationField::numeric("pipeArea", "Área da Seção (A)", UnitCategory::Area, "m2", "cm2")
        .with_placeholder("Ex: 78.5"),
];

pub fn calculate(inputs: &NormalizedInputs) -> ResultMap {
    let velocity = guarded_div(inputs.get("flowRate"), inputs.get("pipeArea"));
    ResultMap::new().with(labels::VELOCITY, velocity)
}

pub fn steps(inputs: &NormalizedInputs) -> Vec<CalculationStep> {
    let q = inputs.get("flowRate");
    let a = inputs.get("pipeArea");
    let velocity = guarded_div(q, a);

    vec![
        CalculationStep::new(
            1,
            KNOWN_VALUES,
            "V = Q/A",
            format!("Q = {}, A = {}", quantity(q, "m³/s"), quantity(a, "m²")),
            "Valores identificados e convertidos",
        ),
        CalculationStep::new(
            2,
            "Calcular a velocidade do fluxo",
            "V = Q/A",
            format!("V = {} / {}", quantity(q, ""), quantity(a, "")),
            quantity(velocity, "m/s"),
        ),
        CalculationStep::new(
            3,
            "Converter para km/h",
            "V_kmh = V·3,6",
            format!("V_kmh = {}·3,6", quantity(velocity, "")),
            quantity(velocity * 3.6, "km/h"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_velocity() {
        // 20 L/s through 78.5 cm²
        let inputs = NormalizedInputs::new()
            .with("flowRate", 0.02)
            .with("pipeArea", 0.00785);
        let v = calculate(&inputs).number(labels::VELOCITY).unwrap();
        assert_relative_eq!(v, 0.02 / 0.00785, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_area_gives_zero_not_nan() {
        let inputs = NormalizedInputs::new()
            .with("flowRate", 0.02)
            .with("pipeArea", 0.0);
        let v = calculate(&inputs).number(labels::VELOCITY).unwrap();
        assert_eq!(v, 0.0);
        assert!(!v.is_nan());
    }

    #[test]
    fn test_steps() {
        let inputs = NormalizedInputs::new()
            .with("flowRate", 0.01)
            .with("pipeArea", 0.004);
        let steps = steps(&inputs);
        assert_eq!(steps[1].result, "2,500 m/s");
        assert_eq!(steps[2].result, "9,000 km/h");
    }
}
